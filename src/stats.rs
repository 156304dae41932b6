/// Statistics report for display code.
///
/// Bundles the four descriptive figures of a numeric column. Each figure is a
/// `Statistic`, rendered as text by `figures()` and `Display`, or as JSON
/// numbers (or `null` when undefined) by `to_json()`.

use crate::column::{Column, Statistic};
use crate::error::{FrameError, Result};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub column: String,
    /// Number of non-null values the figures were computed from.
    pub count: usize,
    pub mean: Statistic,
    pub min: Statistic,
    pub max: Statistic,
    pub std_dev: Statistic,
}

impl StatisticsReport {
    /// Fails with `NotNumeric` unless every non-null value of `column` is a number.
    pub fn from_column(name: &str, column: &Column) -> Result<Self> {
        if !column.is_numeric() {
            return Err(FrameError::NotNumeric(name.to_string()));
        }
        Ok(StatisticsReport {
            column: name.to_string(),
            count: column.count(),
            mean: column.mean(),
            min: column.min(),
            max: column.max(),
            std_dev: column.std_dev(),
        })
    }

    /// The four figures as `(label, text)` pairs, undefined ones as `NaN`.
    pub fn figures(&self) -> [(&'static str, String); 4] {
        [
            ("mean", self.mean.to_string()),
            ("min", self.min.to_string()),
            ("max", self.max.to_string()),
            ("std_dev", self.std_dev.to_string()),
        ]
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics for column '{}' ({} values):", self.column, self.count)?;
        for (label, value) in self.figures() {
            writeln!(f, "  {:<8} {}", format!("{}:", label), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnValue;

    #[test]
    fn test_report_figures() {
        let column: Column = vec![1, 2, 3, 4, 5].into_iter().collect();
        let report = StatisticsReport::from_column("n", &column).unwrap();
        let figures = report.figures();
        assert_eq!(figures[0], ("mean", "3.0".to_string()));
        assert_eq!(figures[1], ("min", "1.0".to_string()));
        assert_eq!(figures[2], ("max", "5.0".to_string()));
        assert!(figures[3].1.starts_with("1.5811"));
    }

    #[test]
    fn test_report_undefined() {
        let column = Column::new(vec![ColumnValue::Null, ColumnValue::Int32(4)]);
        let report = StatisticsReport::from_column("n", &column).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.figures()[3], ("std_dev", "NaN".to_string()));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["mean"], serde_json::json!(4.0));
        assert!(json["std_dev"].is_null());
    }

    #[test]
    fn test_report_not_numeric() {
        let column = Column::from_strings(["25", "30"]);
        assert!(matches!(
            StatisticsReport::from_column("Age", &column),
            Err(FrameError::NotNumeric(name)) if name == "Age"
        ));
    }

    #[test]
    fn test_report_display() {
        let column: Column = vec![10, 20].into_iter().collect();
        let text = StatisticsReport::from_column("Age", &column).unwrap().to_string();
        assert!(text.starts_with("Statistics for column 'Age' (2 values):\n"));
        assert!(text.contains("  mean:    15.0\n"));
    }
}

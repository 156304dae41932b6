/// TabFrame Column Implementation
///
/// A Column is a fixed-length, random-access sequence of values. Elements are
/// individually typed through `ColumnValue`, so a column may mix nulls with
/// values of one logical kind (or, for string data read from text, hold
/// strings that only later get detected as numbers).
///
/// Descriptive statistics are computed over the non-null numeric elements and
/// reported as a `Statistic`, which keeps "no result" distinct from a NaN that
/// was actually stored in the column.

use serde::Serialize;
use std::fmt::{self, Debug, Display};

/// Column value enum to support multiple types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Bool(bool),
    Null,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// True for the integer and floating-point variants.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnValue::Int32(_)
                | ColumnValue::Int64(_)
                | ColumnValue::Float32(_)
                | ColumnValue::Float64(_)
        )
    }

    /// Widen a numeric value to f64. Strings are not parsed here.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Int32(n) => Some(*n as f64),
            ColumnValue::Int64(n) => Some(*n as f64),
            ColumnValue::Float32(f) => Some(*f as f64),
            ColumnValue::Float64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ColumnValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int32(v) => Some(*v as i64),
            ColumnValue::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            ColumnValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ColumnValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Short name of the variant, used in type-mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnValue::Int32(_) => "int32",
            ColumnValue::Int64(_) => "int64",
            ColumnValue::Float32(_) => "float32",
            ColumnValue::Float64(_) => "float64",
            ColumnValue::String(_) => "string",
            ColumnValue::Bool(_) => "bool",
            ColumnValue::Null => "null",
        }
    }
}

/// String representation used for index labels and rendering.
///
/// Integral floats keep a trailing `.0` so that `3.0` and `3` stay
/// distinguishable as labels; nulls print as `null`.
impl Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Int32(n) => write!(f, "{}", n),
            ColumnValue::Int64(n) => write!(f, "{}", n),
            ColumnValue::Float32(v) if v.fract() != 0.0 => write!(f, "{}", v),
            ColumnValue::Float32(v) => write_float(f, *v as f64),
            ColumnValue::Float64(v) => write_float(f, *v),
            ColumnValue::String(s) => f.write_str(s),
            ColumnValue::Bool(b) => write!(f, "{}", b),
            ColumnValue::Null => f.write_str("null"),
        }
    }
}

fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        write!(f, "{:.1}", v)
    } else {
        write!(f, "{}", v)
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        ColumnValue::Int32(v)
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Int64(v)
    }
}

impl From<f32> for ColumnValue {
    fn from(v: f32) -> Self {
        ColumnValue::Float32(v)
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Float64(v)
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Bool(v)
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        ColumnValue::String(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::String(v.to_string())
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ColumnValue::Null, Into::into)
    }
}

/// Result of a descriptive statistic.
///
/// `Undefined` stands for "no numeric input to compute from" (empty,
/// all-null or non-numeric column, or fewer than two values for a standard
/// deviation). Serializes as a JSON number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Statistic {
    Value(f64),
    Undefined,
}

impl Statistic {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Statistic::Value(v) => Some(*v),
            Statistic::Undefined => None,
        }
    }

    /// Collapse to the NaN sentinel convention.
    pub fn to_f64_or_nan(&self) -> f64 {
        self.as_f64().unwrap_or(f64::NAN)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Statistic::Undefined)
    }
}

impl Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Value(v) => write_float(f, *v),
            Statistic::Undefined => f.write_str("NaN"),
        }
    }
}

/// A single column of a table.
#[derive(Clone, PartialEq, Default)]
pub struct Column {
    values: Vec<ColumnValue>,
}

impl Column {
    pub fn new(values: Vec<ColumnValue>) -> Self {
        Column { values }
    }

    /// Build a string column from anything string-like.
    pub fn from_strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values
            .into_iter()
            .map(|s| ColumnValue::String(s.into()))
            .collect()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Column {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Copy the elements at `positions`, in that order. Out-of-range positions are skipped.
    pub(crate) fn take(&self, positions: &[usize]) -> Column {
        positions
            .iter()
            .filter_map(|&p| self.values.get(p).cloned())
            .collect()
    }

    /// Appends during ingestion only; a table's columns are otherwise fixed-length.
    pub(crate) fn push(&mut self, value: ColumnValue) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[ColumnValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&ColumnValue> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnValue> {
        self.values.iter()
    }

    /// Number of non-null elements.
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    /// True iff every non-null element is numeric. Vacuously true for empty
    /// and all-null columns.
    pub fn is_numeric(&self) -> bool {
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .all(ColumnValue::is_numeric)
    }

    /// Non-null elements as f64, in order. Empty when the column is not numeric.
    pub fn numeric_values(&self) -> Vec<f64> {
        if !self.is_numeric() {
            return Vec::new();
        }
        self.values.iter().filter_map(ColumnValue::to_f64).collect()
    }

    pub fn sum(&self) -> Statistic {
        let values = self.numeric_values();
        if values.is_empty() {
            return Statistic::Undefined;
        }
        Statistic::Value(values.iter().sum())
    }

    /// Arithmetic mean of the numeric values.
    pub fn mean(&self) -> Statistic {
        let values = self.numeric_values();
        if values.is_empty() {
            return Statistic::Undefined;
        }
        Statistic::Value(values.iter().sum::<f64>() / values.len() as f64)
    }

    pub fn min(&self) -> Statistic {
        self.numeric_values()
            .into_iter()
            .reduce(f64::min)
            .map_or(Statistic::Undefined, Statistic::Value)
    }

    pub fn max(&self) -> Statistic {
        self.numeric_values()
            .into_iter()
            .reduce(f64::max)
            .map_or(Statistic::Undefined, Statistic::Value)
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn std_dev(&self) -> Statistic {
        let values = self.numeric_values();
        let n = values.len();
        if n < 2 {
            return Statistic::Undefined;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Statistic::Value((squares / (n - 1) as f64).sqrt())
    }

    /// Detect numbers stored as text.
    ///
    /// Every non-null element must be numeric already or a string that parses
    /// as a number. If all textual elements parse as `i64` they become
    /// `Int64`, otherwise (all parse as `f64`) they become `Float64`. Blank
    /// strings become null. Returns `None` when some element is not a number.
    pub fn to_numeric(&self) -> Option<Column> {
        let mut all_integers = true;
        for value in &self.values {
            match value {
                ColumnValue::String(s) => {
                    let s = s.trim();
                    if s.is_empty() {
                        continue;
                    }
                    if s.parse::<i64>().is_err() {
                        all_integers = false;
                        s.parse::<f64>().ok()?;
                    }
                }
                ColumnValue::Bool(_) => return None,
                _ => {}
            }
        }

        let converted = self
            .values
            .iter()
            .map(|value| match value {
                ColumnValue::String(s) => {
                    let s = s.trim();
                    if s.is_empty() {
                        ColumnValue::Null
                    } else if all_integers {
                        s.parse::<i64>().map_or(ColumnValue::Null, ColumnValue::Int64)
                    } else {
                        s.parse::<f64>().map_or(ColumnValue::Null, ColumnValue::Float64)
                    }
                }
                other => other.clone(),
            })
            .collect();
        Some(converted)
    }
}

impl<T: Into<ColumnValue>> FromIterator<T> for Column {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Column {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Column {
    type Item = &'a ColumnValue;
    type IntoIter = std::slice::Iter<'a, ColumnValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Column {{ len: {}, numeric: {} }}",
            self.len(),
            self.is_numeric()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[Option<i32>]) -> Column {
        values.iter().copied().collect()
    }

    #[test]
    fn test_column_basic() {
        let col = Column::from_strings(["A", "B", "C"]);
        assert_eq!(col.len(), 3);
        assert_eq!(col.get(0).unwrap().as_string(), Some("A"));
        assert_eq!(col.get(2).unwrap().as_string(), Some("C"));
        assert!(col.get(3).is_none());
    }

    #[test]
    fn test_is_numeric() {
        let mixed: Column = vec![ColumnValue::Int32(1), ColumnValue::Float64(2.5), ColumnValue::Int64(3)]
            .into_iter()
            .collect();
        assert!(mixed.is_numeric());
        assert!(!Column::from_strings(["a", "b", "c"]).is_numeric());
        assert!(numbers(&[None, Some(2), None, Some(4)]).is_numeric());
        assert!(Column::default().is_numeric());
        assert!(numbers(&[None, None]).is_numeric());
    }

    #[test]
    fn test_numeric_values_skip_nulls() {
        let col = numbers(&[None, Some(2), None, Some(4)]);
        assert_eq!(col.numeric_values(), vec![2.0, 4.0]);
        assert!(Column::from_strings(["a"]).numeric_values().is_empty());
        assert!(Column::default().numeric_values().is_empty());
    }

    #[test]
    fn test_statistics() {
        let col = numbers(&[Some(1), Some(2), Some(3), Some(4), Some(5)]);
        assert_eq!(col.mean(), Statistic::Value(3.0));
        assert_eq!(col.min(), Statistic::Value(1.0));
        assert_eq!(col.max(), Statistic::Value(5.0));
        let std = col.std_dev().as_f64().unwrap();
        assert!((std - 1.5811).abs() < 0.0001);
    }

    #[test]
    fn test_statistics_with_nulls() {
        assert_eq!(numbers(&[None, Some(2), None, Some(4)]).mean(), Statistic::Value(3.0));
        assert_eq!(numbers(&[None, Some(7), None, Some(2)]).min(), Statistic::Value(2.0));
        assert_eq!(numbers(&[None, Some(7), None, Some(2)]).max(), Statistic::Value(7.0));
        let std = numbers(&[None, Some(1), Some(2), None, Some(3)]).std_dev();
        assert!((std.as_f64().unwrap() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_statistics_negative_values() {
        let col = numbers(&[Some(-5), Some(-10), Some(-15)]);
        assert_eq!(col.mean(), Statistic::Value(-10.0));
        assert!((col.std_dev().as_f64().unwrap() - 5.0).abs() < 0.0001);
        let col = numbers(&[Some(-5), Some(2), Some(-3), Some(4)]);
        assert_eq!(col.min(), Statistic::Value(-5.0));
        assert_eq!(col.max(), Statistic::Value(4.0));
    }

    #[test]
    fn test_statistics_undefined() {
        let text = Column::from_strings(["a", "b", "c"]);
        let empty = Column::default();
        let nulls = numbers(&[None, None, None]);
        for col in [&text, &empty, &nulls] {
            assert!(col.mean().is_undefined());
            assert!(col.min().is_undefined());
            assert!(col.max().is_undefined());
            assert!(col.std_dev().is_undefined());
        }
        assert!(numbers(&[Some(42)]).std_dev().is_undefined());
        assert_eq!(numbers(&[Some(10)]).mean(), Statistic::Value(10.0));
        assert!(empty.mean().to_f64_or_nan().is_nan());
    }

    #[test]
    fn test_stored_nan_is_a_value() {
        let col: Column = vec![f64::NAN, 1.0].into_iter().collect();
        assert!(!col.mean().is_undefined());
        assert!(col.mean().to_f64_or_nan().is_nan());
    }

    #[test]
    fn test_count_and_sum() {
        let col = numbers(&[None, Some(2), Some(5)]);
        assert_eq!(col.count(), 2);
        assert_eq!(col.sum(), Statistic::Value(7.0));
        assert!(Column::default().sum().is_undefined());
    }

    #[test]
    fn test_to_numeric() {
        let ints = Column::from_strings(["25", " 30", ""]).to_numeric().unwrap();
        assert_eq!(ints.values(), &[ColumnValue::Int64(25), ColumnValue::Int64(30), ColumnValue::Null]);

        let floats = Column::from_strings(["1", "2.5"]).to_numeric().unwrap();
        assert_eq!(floats.values(), &[ColumnValue::Float64(1.0), ColumnValue::Float64(2.5)]);

        assert!(Column::from_strings(["1", "two"]).to_numeric().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(ColumnValue::Int32(7).to_string(), "7");
        assert_eq!(ColumnValue::Float64(3.0).to_string(), "3.0");
        assert_eq!(ColumnValue::Float64(2.25).to_string(), "2.25");
        assert_eq!(ColumnValue::Null.to_string(), "null");
        assert_eq!(Statistic::Undefined.to_string(), "NaN");
        assert_eq!(Statistic::Value(22.0).to_string(), "22.0");
    }

    #[test]
    fn test_serialize_values() {
        let json = serde_json::to_string(&vec![
            ColumnValue::Int32(1),
            ColumnValue::String("a".to_string()),
            ColumnValue::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"a",null]"#);
        assert_eq!(serde_json::to_string(&Statistic::Undefined).unwrap(), "null");
    }
}

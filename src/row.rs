/// Row access for predicates.
///
/// A `Row` is a borrowed view of one row of a table. Lookups are by column
/// name and hand back the tagged `ColumnValue`, so predicates check types
/// explicitly through the typed accessors, which fail with
/// `FrameError::TypeMismatch` rather than panicking.

use crate::column::{Column, ColumnValue};
use crate::error::{FrameError, Result};
use crate::table::INDEX_COLUMN;
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Clone, Copy)]
pub struct Row<'a> {
    columns: &'a IndexMap<String, Column>,
    position: usize,
}

impl<'a> Row<'a> {
    pub(crate) fn new(columns: &'a IndexMap<String, Column>, position: usize) -> Self {
        Row { columns, position }
    }

    /// Position of this row in its table.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Value of the Index column for this row.
    pub fn label(&self) -> Option<&'a ColumnValue> {
        self.get(INDEX_COLUMN)
    }

    pub fn get(&self, column: &str) -> Option<&'a ColumnValue> {
        let columns: &'a IndexMap<String, Column> = self.columns;
        columns.get(column).and_then(|col| col.get(self.position))
    }

    pub fn value(&self, column: &str) -> Result<&'a ColumnValue> {
        self.get(column)
            .ok_or_else(|| FrameError::ColumnNotFound(column.to_string()))
    }

    /// Numeric cell widened to f64. Nulls and non-numeric cells are a type mismatch.
    pub fn number(&self, column: &str) -> Result<f64> {
        let value = self.value(column)?;
        value.to_f64().ok_or_else(|| mismatch(column, "number", value))
    }

    pub fn text(&self, column: &str) -> Result<&'a str> {
        let value = self.value(column)?;
        value.as_string().ok_or_else(|| mismatch(column, "string", value))
    }

    pub fn is_null(&self, column: &str) -> Result<bool> {
        Ok(self.value(column)?.is_null())
    }

    /// Cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ColumnValue)> + 'a {
        let columns: &'a IndexMap<String, Column> = self.columns;
        let position = self.position;
        columns
            .iter()
            .filter_map(move |(name, col)| col.get(position).map(|v| (name.as_str(), v)))
    }

    /// Owned copy of the row keyed by column name.
    pub fn to_map(&self) -> HashMap<String, ColumnValue> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

fn mismatch(column: &str, expected: &'static str, found: &ColumnValue) -> FrameError {
    FrameError::TypeMismatch {
        column: column.to_string(),
        expected,
        found: found.type_name().to_string(),
    }
}

impl std::fmt::Debug for Row<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::column::{Column, ColumnValue};
    use crate::error::FrameError;
    use crate::table::Table;

    fn table() -> Table {
        Table::new(vec![
            ("Nom", Column::from_strings(["Eva", "Rudy"])),
            ("Age", vec![Some(26), None].into_iter().collect::<Column>()),
        ])
        .unwrap()
    }

    #[test]
    fn test_typed_accessors() {
        let t = table();
        let row = t.row(0).unwrap();
        assert_eq!(row.position(), 0);
        assert_eq!(row.label(), Some(&ColumnValue::String("0".to_string())));
        assert_eq!(row.text("Nom").unwrap(), "Eva");
        assert_eq!(row.number("Age").unwrap(), 26.0);
        assert!(!row.is_null("Age").unwrap());
    }

    #[test]
    fn test_accessor_errors() {
        let t = table();
        let row = t.row(1).unwrap();
        assert!(row.is_null("Age").unwrap());
        assert!(matches!(
            row.number("Age"),
            Err(FrameError::TypeMismatch { expected: "number", .. })
        ));
        assert!(matches!(
            row.text("Age"),
            Err(FrameError::TypeMismatch { expected: "string", .. })
        ));
        assert!(matches!(row.value("Ville"), Err(FrameError::ColumnNotFound(_))));
        assert!(row.get("Ville").is_none());
    }

    #[test]
    fn test_iteration_order() {
        let t = table();
        let row = t.row(1).unwrap();
        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Index", "Nom", "Age"]);

        let map = row.to_map();
        assert_eq!(map["Nom"], ColumnValue::String("Rudy".to_string()));
        assert_eq!(map["Age"], ColumnValue::Null);
    }
}

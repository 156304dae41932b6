/// TabFrame Table Implementation
///
/// A Table is an ordered mapping from column name to `Column`. One column is
/// always named `"Index"` and always comes first; it labels the rows for
/// `loc`. Row-level transforms (`loc`, `iloc`, `filter`, ...) never touch the
/// source table: they copy the selected values into brand-new columns.
///
/// # Examples
///
/// ```
/// use tabframe::{Column, Table};
///
/// let table = Table::new(vec![
///     ("Nom", Column::from_strings(["Alice", "Bob", "Eva"])),
///     ("Age", vec![10, 20, 30].into_iter().collect::<Column>()),
/// ])
/// .unwrap();
///
/// // An Index column "0".."n-1" is synthesized and placed first.
/// assert_eq!(table.column_names(), vec!["Index", "Nom", "Age"]);
///
/// let picked = table.loc(["0", "2"]).unwrap();
/// assert_eq!(picked.len(), 2);
/// assert_eq!(picked.value(1, "Nom").unwrap().as_string(), Some("Eva"));
/// ```

use crate::column::{Column, ColumnValue};
use crate::csv::{self, CsvOptions};
use crate::error::{Axis, FrameError, Result};
use crate::expr;
use crate::render::{self, RowSelection};
use crate::row::Row;
use crate::stats::StatisticsReport;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::ops::Range;
use std::path::Path;

/// Name of the label column every table carries.
pub const INDEX_COLUMN: &str = "Index";

#[derive(Clone, PartialEq)]
pub struct Table {
    columns: IndexMap<String, Column>,
}

impl Table {
    /// Build a table from `(name, column)` pairs, keeping their order.
    ///
    /// Names must be distinct and all columns must have the same length.
    /// When no `"Index"` column is given, one holding `"0"`, `"1"`, ... is
    /// synthesized. `"Index"` always ends up first.
    pub fn new<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Column)>,
        K: Into<String>,
    {
        let mut columns: IndexMap<String, Column> = IndexMap::new();
        for (name, column) in pairs {
            let name: String = name.into();
            if columns.contains_key(&name) {
                return Err(FrameError::DuplicateColumn(name));
            }
            columns.insert(name, column);
        }

        if let Some(expected) = columns.values().next().map(Column::len) {
            for (name, column) in &columns {
                if column.len() != expected {
                    return Err(FrameError::LengthMismatch {
                        column: name.clone(),
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }

        Ok(Self::from_parts(columns))
    }

    /// Load a table from a delimited text file.
    pub fn from_csv_path<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<Self> {
        Self::new(csv::read_csv(path, options)?)
    }

    /// Load a table from delimited text already in memory.
    pub fn from_csv_str(text: &str, options: &CsvOptions) -> Result<Self> {
        Self::new(csv::parse_csv(text, options)?)
    }

    /// Columns are assumed to be of equal length here.
    fn from_parts(mut columns: IndexMap<String, Column>) -> Self {
        if !columns.contains_key(INDEX_COLUMN) {
            let rows = columns.values().next().map_or(0, Column::len);
            columns.insert(
                INDEX_COLUMN.to_string(),
                Column::from_strings((0..rows).map(|i| i.to_string())),
            );
        }
        let mut table = Table { columns };
        table.reindex_index_first();
        table
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.values().next().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Columns in order, Index first.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    pub fn index(&self) -> Result<&Column> {
        self.columns.get(INDEX_COLUMN).ok_or(FrameError::NoIndexColumn)
    }

    pub fn value(&self, row: usize, column: &str) -> Result<&ColumnValue> {
        let len = self.len();
        self.column(column)?
            .get(row)
            .ok_or_else(|| FrameError::OutOfBounds {
                axis: Axis::Rows,
                start: row,
                end: row.saturating_add(1),
                len,
            })
    }

    pub fn row(&self, position: usize) -> Result<Row<'_>> {
        if position >= self.len() {
            return Err(FrameError::OutOfBounds {
                axis: Axis::Rows,
                start: position,
                end: position.saturating_add(1),
                len: self.len(),
            });
        }
        Ok(Row::new(&self.columns, position))
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.len()).map(move |position| Row::new(&self.columns, position))
    }

    /// Move `"Index"` to the front, keeping the relative order of the other
    /// columns. No-op when there is no Index column.
    pub fn reindex_index_first(&mut self) {
        let position = match self.columns.get_index_of(INDEX_COLUMN) {
            None | Some(0) => return,
            Some(position) => position,
        };
        if let Some((name, index)) = self.columns.shift_remove_index(position) {
            let mut reordered = IndexMap::with_capacity(self.columns.len() + 1);
            reordered.insert(name, index);
            reordered.extend(self.columns.drain(..));
            self.columns = reordered;
        }
    }

    /// Replace the Index column with the values of `name`, removing `name`
    /// from the visible columns.
    ///
    /// The values must be pairwise distinct (null counts as a value). On
    /// error the table is left untouched.
    pub fn set_index(&mut self, name: &str) -> Result<()> {
        let column = self.column(name)?;
        if has_duplicates(column) {
            return Err(FrameError::DuplicateValues {
                column: name.to_string(),
            });
        }
        if name == INDEX_COLUMN {
            return Ok(());
        }

        if let Some(column) = self.columns.shift_remove(name) {
            self.columns.insert(INDEX_COLUMN.to_string(), column);
        }
        self.reindex_index_first();
        log::debug!("column '{}' is now the index", name);
        Ok(())
    }

    /// Rows whose Index label (its string form) is one of `labels`.
    ///
    /// Result rows keep the table's order, not the order of `labels`;
    /// unknown labels are ignored.
    pub fn loc<I, S>(&self, labels: I) -> Result<Table>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let index = self.index()?;
        let wanted: HashSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();

        let positions: Vec<usize> = index
            .iter()
            .enumerate()
            .filter(|(_, label)| wanted.contains(&label.to_string()))
            .map(|(position, _)| position)
            .collect();

        log::debug!("loc matched {} of {} labels", positions.len(), wanted.len());
        Ok(self.take_rows(&positions))
    }

    /// Rows `rows.start..rows.end`, across all columns.
    ///
    /// `cols` is only validated against the column count; every column
    /// appears in the output.
    pub fn iloc(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Table> {
        self.check_bounds(&rows, &cols)?;
        let positions: Vec<usize> = rows.collect();
        Ok(self.take_rows(&positions))
    }

    /// Stepped positional slice.
    ///
    /// Rows advance by `row_step` from `rows.start` while below `rows.end`.
    /// For each selected row, the whole row is emitted once per step of
    /// `cols` (advancing by `col_step`), so the column range sets how many
    /// times a row repeats rather than which columns are kept.
    pub fn iloc_step(
        &self,
        rows: Range<usize>,
        row_step: usize,
        cols: Range<usize>,
        col_step: usize,
    ) -> Result<Table> {
        self.check_bounds(&rows, &cols)?;
        if row_step == 0 {
            return Err(FrameError::InvalidStep { axis: Axis::Rows });
        }
        if col_step == 0 {
            return Err(FrameError::InvalidStep { axis: Axis::Columns });
        }

        let repeats = cols.step_by(col_step).count();
        let positions: Vec<usize> = rows
            .step_by(row_step)
            .flat_map(|position| std::iter::repeat(position).take(repeats))
            .collect();
        Ok(self.take_rows(&positions))
    }

    /// First `n` rows (all of them if `n` exceeds the row count).
    pub fn head(&self, n: usize) -> Table {
        let end = n.min(self.len());
        self.take_rows(&(0..end).collect::<Vec<_>>())
    }

    /// Last `n` rows.
    pub fn tail(&self, n: usize) -> Table {
        let len = self.len();
        let start = len - n.min(len);
        self.take_rows(&(start..len).collect::<Vec<_>>())
    }

    /// Keep the rows for which `predicate` returns true.
    ///
    /// The Index column is filtered like any other, so surviving rows keep
    /// their original labels.
    pub fn filter<F>(&self, predicate: F) -> Table
    where
        F: Fn(&Row<'_>) -> bool,
    {
        let positions: Vec<usize> = self
            .rows()
            .filter(|row| predicate(row))
            .map(|row| row.position())
            .collect();
        self.take_rows(&positions)
    }

    /// Like `filter`, for predicates that can fail (for example on a type
    /// mismatch reported by `Row::number`). The first error aborts the filter.
    pub fn try_filter<F>(&self, predicate: F) -> Result<Table>
    where
        F: Fn(&Row<'_>) -> Result<bool>,
    {
        let mut positions = Vec::new();
        for row in self.rows() {
            if predicate(&row)? {
                positions.push(row.position());
            }
        }
        Ok(self.take_rows(&positions))
    }

    /// Filter rows with a textual expression such as `Age > 23 AND Nom != 'Bob'`.
    ///
    /// # Example
    ///
    /// ```
    /// use tabframe::{Column, Table};
    ///
    /// let table = Table::new(vec![
    ///     ("Nom", Column::from_strings(["Justine", "Colin", "Eva"])),
    ///     ("Age", vec![21, 14, 26].into_iter().collect::<Column>()),
    /// ])
    /// .unwrap();
    ///
    /// let adults = table.filter_expr("Age >= 18").unwrap();
    /// assert_eq!(adults.len(), 2);
    /// ```
    pub fn filter_expr(&self, expression: &str) -> Result<Table> {
        let parsed = expr::parse_expr(expression)?;
        for name in parsed.columns() {
            self.column(name)?;
        }
        Ok(self.filter(|row| parsed.evaluate(row)))
    }

    /// Mean, min, max and sample standard deviation of a numeric column.
    pub fn statistics(&self, name: &str) -> Result<StatisticsReport> {
        StatisticsReport::from_column(name, self.column(name)?)
    }

    /// Fixed-width text block for the selected rows.
    pub fn render(&self, selection: RowSelection) -> String {
        render::render_table(self, selection)
    }

    fn check_bounds(&self, rows: &Range<usize>, cols: &Range<usize>) -> Result<()> {
        let len = self.len();
        if rows.end > len {
            return Err(FrameError::OutOfBounds {
                axis: Axis::Rows,
                start: rows.start,
                end: rows.end,
                len,
            });
        }
        let width = self.column_count();
        if cols.end > width {
            return Err(FrameError::OutOfBounds {
                axis: Axis::Columns,
                start: cols.start,
                end: cols.end,
                len: width,
            });
        }
        Ok(())
    }

    fn take_rows(&self, positions: &[usize]) -> Table {
        let columns: IndexMap<String, Column> = self
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), column.take(positions)))
            .collect();
        Self::from_parts(columns)
    }
}

/// Hashable identity of a value. Floats compare by bit pattern, so NaN
/// equals NaN and 0.0 differs from -0.0.
#[derive(PartialEq, Eq, Hash)]
enum ValueKey<'a> {
    Int32(i32),
    Int64(i64),
    Float32(u32),
    Float64(u64),
    Str(&'a str),
    Bool(bool),
    Null,
}

impl<'a> From<&'a ColumnValue> for ValueKey<'a> {
    fn from(value: &'a ColumnValue) -> Self {
        match value {
            ColumnValue::Int32(v) => ValueKey::Int32(*v),
            ColumnValue::Int64(v) => ValueKey::Int64(*v),
            ColumnValue::Float32(v) => ValueKey::Float32(v.to_bits()),
            ColumnValue::Float64(v) => ValueKey::Float64(v.to_bits()),
            ColumnValue::String(s) => ValueKey::Str(s),
            ColumnValue::Bool(b) => ValueKey::Bool(*b),
            ColumnValue::Null => ValueKey::Null,
        }
    }
}

fn has_duplicates(column: &Column) -> bool {
    let mut seen = HashSet::with_capacity(column.len());
    !column.iter().all(|value| seen.insert(ValueKey::from(value)))
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(RowSelection::All))
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Table {{ columns: {:?}, rows: {} }}",
            self.column_names(),
            self.len()
        )
    }
}

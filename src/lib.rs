/// TabFrame - In-Memory Labelled Tables
///
/// A small columnar table engine: named columns of tagged values, a string
/// `Index` column for label lookups, positional slicing, predicate and
/// expression filters, fixed-width rendering and descriptive statistics.
/// Tables are loaded from delimited text or built from columns directly.

pub mod error;
pub mod column;
pub mod row;
pub mod table;
pub mod expr;
pub mod stats;
pub mod render;
pub mod csv;

pub use error::{Axis, FrameError, Result};
pub use column::{Column, ColumnValue, Statistic};
pub use row::Row;
pub use table::{Table, INDEX_COLUMN};
pub use expr::{parse_expr, CompareOp, Expr, Literal};
pub use stats::StatisticsReport;
pub use render::RowSelection;
pub use crate::csv::CsvOptions;

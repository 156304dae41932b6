/// Delimited text loading.
///
/// Records are read with the `csv` crate. The first non-blank line is the
/// header, every further non-blank line is a record. Fields are split on the
/// delimiter as-is: quoting is off and nothing is trimmed. Values are kept
/// as strings unless `infer_numeric` is set.
///
/// The loader returns finished columns keyed by header name. A header that
/// matches `"Index"` case-insensitively becomes the Index column; without
/// one, labels `"0"`, `"1"`, ... are generated.

use crate::column::{Column, ColumnValue};
use crate::error::{FrameError, Result};
use crate::table::INDEX_COLUMN;
use ::csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: char,
    /// Convert non-Index columns whose values all parse as numbers.
    pub infer_numeric: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: ',',
            infer_numeric: false,
        }
    }
}

pub fn read_csv<P: AsRef<Path>>(path: P, options: &CsvOptions) -> Result<IndexMap<String, Column>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    log::debug!("read {} bytes from {}", text.len(), path.display());
    parse_csv(&text, options)
}

pub fn parse_csv(text: &str, options: &CsvOptions) -> Result<IndexMap<String, Column>> {
    let delimiter = u8::try_from(options.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            FrameError::MalformedInput(format!(
                "delimiter '{}' is not a single ASCII character",
                options.delimiter
            ))
        })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        // whitespace-only line
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        records.push(record);
    }

    let mut records = records.into_iter();
    let header = match records.next() {
        Some(record) => parse_header(&record)?,
        None => return Err(FrameError::MalformedInput("input is empty".to_string())),
    };

    let records: Vec<StringRecord> = records.collect();
    if records.is_empty() {
        return Err(FrameError::MalformedInput(
            "header line has no data lines after it".to_string(),
        ));
    }

    let mut columns: Vec<Column> = header
        .iter()
        .map(|_| Column::with_capacity(records.len()))
        .collect();

    for record in &records {
        if record.len() != header.len() {
            return Err(FrameError::MalformedInput(format!(
                "line {}: expected {} fields, found {}",
                record.position().map_or(0, |p| p.line()),
                header.len(),
                record.len()
            )));
        }
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            column.push(ColumnValue::String(field.to_string()));
        }
    }

    let mut table: IndexMap<String, Column> = IndexMap::with_capacity(header.len() + 1);
    for (name, column) in header.into_iter().zip(columns) {
        let column = if options.infer_numeric && name != INDEX_COLUMN {
            infer(&name, column)
        } else {
            column
        };
        table.insert(name, column);
    }

    if !table.contains_key(INDEX_COLUMN) {
        table.insert(
            INDEX_COLUMN.to_string(),
            Column::from_strings((0..records.len()).map(|i| i.to_string())),
        );
    }

    log::debug!(
        "parsed {} records into {} columns",
        records.len(),
        table.len()
    );
    Ok(table)
}

fn parse_header(record: &StringRecord) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for field in record.iter() {
        let name = if field.eq_ignore_ascii_case(INDEX_COLUMN) && field != INDEX_COLUMN {
            log::warn!("header '{}' treated as the {} column", field, INDEX_COLUMN);
            INDEX_COLUMN.to_string()
        } else {
            field.to_string()
        };
        if name.is_empty() {
            return Err(FrameError::MalformedInput(format!(
                "empty column name at position {}",
                names.len()
            )));
        }
        if names.contains(&name) {
            return Err(FrameError::MalformedInput(format!(
                "duplicate column name '{}'",
                name
            )));
        }
        names.push(name);
    }
    Ok(names)
}

fn infer(name: &str, column: Column) -> Column {
    if column.iter().all(|v| v.as_string().map_or(true, |s| s.trim().is_empty())) {
        return column;
    }
    match column.to_numeric() {
        Some(numeric) => {
            log::debug!("column '{}' detected as numeric", name);
            numeric
        }
        None => column,
    }
}

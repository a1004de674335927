use std::collections::HashMap;
use std::sync::Arc;

use crate::csv_reader::RawTable;
use crate::error::{IngestError, Result};
use crate::normalize::normalize_row;
use crate::value::Value;

/// One canonical row: a value for every column of its dataset.
///
/// A field missing from the source is stored as an explicit value (`Null`,
/// or an empty string for delimited text), never as an absent key.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Value stored under `column`, if the column exists.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// (column, value) pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Canonical rows plus their column list.
///
/// Built whole from one successful ingestion and never patched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Arc<[String]>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Normalize a decoded table into a dataset.
    ///
    /// Repeated header names collapse into one column at the first position;
    /// the last repeat's value wins. Fails with `EmptyResult` when there are
    /// no rows.
    pub fn from_raw(table: RawTable) -> Result<Self> {
        if table.rows.is_empty() {
            return Err(IngestError::EmptyResult);
        }

        let mut columns: Vec<String> = Vec::new();
        let mut slot_of: HashMap<&str, usize> = HashMap::new();
        let mut source_slots = Vec::with_capacity(table.headers.len());
        for header in &table.headers {
            let slot = *slot_of.entry(header.as_str()).or_insert_with(|| {
                columns.push(header.clone());
                columns.len() - 1
            });
            source_slots.push(slot);
        }
        let columns: Arc<[String]> = columns.into();

        let rows = table
            .rows
            .into_iter()
            .map(|raw| {
                let mut values = vec![Value::Null; columns.len()];
                for (value, &slot) in raw.into_iter().zip(source_slots.iter()) {
                    values[slot] = value;
                }
                normalize_row(&mut values);
                Row {
                    columns: Arc::clone(&columns),
                    values,
                }
            })
            .collect();

        Ok(Dataset { columns, rows })
    }

    /// Column list in first-row key order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Every value of one column, in row order. Empty if the column is unknown.
    pub fn column_values<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a Value> + 'a {
        let idx = self.column_index(column);
        self.rows
            .iter()
            .filter_map(move |row| idx.and_then(|i| row.get_at(i)))
    }
}

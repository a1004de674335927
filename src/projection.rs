// Bounded, sorted chart series derived from a dataset

use std::cmp::Ordering;

use crate::dataset::{Dataset, Row};
use crate::value::Value;

/// Hard cap on rows handed to any chart.
pub const MAX_DISPLAY_DATA: usize = 100;

/// Pie charts only take the leading entries of the series.
pub const PIE_SLICE_LIMIT: usize = 8;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// One point of a chart series. The whole source row is kept for context.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesEntry<'a> {
    pub row: &'a Row,
    pub x: &'a Value,
    pub y: f64,
}

/// Rows with a numeric Y, sorted by Y descending and capped at
/// `MAX_DISPLAY_DATA`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries<'a> {
    pub x_column: String,
    pub y_column: String,
    pub entries: Vec<SeriesEntry<'a>>,
}

impl<'a> ChartSeries<'a> {
    /// Leading entries used for pie rendering.
    pub fn pie_entries(&self) -> &[SeriesEntry<'a>] {
        &self.entries[..self.entries.len().min(PIE_SLICE_LIMIT)]
    }

    /// Entries to draw for a chart kind.
    pub fn entries_for(&self, kind: ChartKind) -> &[SeriesEntry<'a>] {
        match kind {
            ChartKind::Pie => self.pie_entries(),
            ChartKind::Bar | ChartKind::Line => &self.entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the chart series for a pair of columns.
///
/// Rows whose Y value is not a number are dropped, not zero-filled. The sort
/// is stable so equal Y values keep their dataset order. An unknown X column
/// yields `Null` x values.
pub fn project<'a>(dataset: &'a Dataset, x_column: &str, y_column: &str) -> ChartSeries<'a> {
    let x_idx = dataset.column_index(x_column);
    let y_idx = dataset.column_index(y_column);

    let mut entries: Vec<SeriesEntry<'a>> = match y_idx {
        Some(y_idx) => dataset
            .rows()
            .iter()
            .filter_map(|row| {
                let y = row.get_at(y_idx)?.as_number()?;
                let x = x_idx.and_then(|i| row.get_at(i)).unwrap_or(&NULL);
                Some(SeriesEntry { row, x, y })
            })
            .collect(),
        None => Vec::new(),
    };

    // -0 and 0 compare equal; values are always finite
    entries.sort_by(|a, b| b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal));
    entries.truncate(MAX_DISPLAY_DATA);

    ChartSeries {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        entries,
    }
}

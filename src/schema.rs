// Column list and default axis inference

use crate::dataset::Dataset;

/// Substrings that mark a numeric column as the preferred Y axis.
const PREFERRED_Y_HINTS: [&str; 6] = ["amount", "value", "total", "price", "cost", "sales"];

/// Chosen X and Y columns; `None` means nothing selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSelection {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// Default axes for a freshly loaded dataset.
///
/// X is the first column. Y is the first column whose first-row value is a
/// number and whose lowercased name contains a preferred hint, else the first
/// numeric column, else nothing.
pub fn infer_axes(dataset: &Dataset) -> AxisSelection {
    let Some(first) = dataset.rows().first() else {
        return AxisSelection::default();
    };

    let numeric: Vec<&str> = first
        .iter()
        .filter(|(_, value)| value.is_number())
        .map(|(column, _)| column)
        .collect();

    let y = numeric
        .iter()
        .find(|column| is_preferred_y(column))
        .or_else(|| numeric.first())
        .map(|column| column.to_string());

    AxisSelection {
        x: dataset.columns().first().cloned(),
        y,
    }
}

fn is_preferred_y(column: &str) -> bool {
    let lowered = column.to_lowercase();
    PREFERRED_Y_HINTS.iter().any(|hint| lowered.contains(hint))
}

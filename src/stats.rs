use crate::dataset::Dataset;
use crate::value::Value;

/// Count, min, max and mean over the numeric values of one column.
///
/// Computed over the whole dataset, not the bounded chart series, so the
/// figures can cover rows the chart does not show.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SummaryStatistics {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

pub fn summarize(dataset: &Dataset, column: &str) -> SummaryStatistics {
    summarize_values(dataset.column_values(column).filter_map(Value::as_number))
}

pub fn summarize_values(values: impl IntoIterator<Item = f64>) -> SummaryStatistics {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in values {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return SummaryStatistics::default();
    }

    // rounding in the sum can push the mean just outside [min, max]
    let mean = (sum / count as f64).clamp(min, max);

    SummaryStatistics {
        count,
        min: Some(min),
        max: Some(max),
        mean: Some(mean),
    }
}

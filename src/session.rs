// Coordinating state for one upload control and its chart/axis selectors

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::error::{IngestError, Result};
use crate::ingest::{self, FileKind};
use crate::projection::{self, ChartKind, ChartSeries};
use crate::schema::{self, AxisSelection};
use crate::stats::{self, SummaryStatistics};

/// Handle for one ingestion attempt. Only the most recent ticket may
/// complete; older ones are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
    pub file_name: String,
    pub kind: FileKind,
}

/// Owns the current dataset and the user's selections.
///
/// Axes, chart series and statistics are never stored: they are recomputed
/// from the dataset and selection on each call so they cannot drift.
#[derive(Debug)]
pub struct Session {
    dataset: Option<Arc<Dataset>>,
    axes: AxisSelection,
    chart_kind: ChartKind,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            dataset: None,
            axes: AxisSelection::default(),
            chart_kind: ChartKind::Bar,
            loading: false,
            error: None,
            generation: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an ingestion.
    ///
    /// Prior dataset, axes and error are cleared before anything else so
    /// stale data is never shown. An unsupported extension fails here,
    /// before any read.
    pub fn begin_upload(&mut self, file_name: &str) -> Result<UploadTicket> {
        self.generation += 1;
        self.dataset = None;
        self.axes = AxisSelection::default();
        self.error = None;
        self.loading = true;

        match FileKind::from_file_name(file_name) {
            Ok(kind) => Ok(UploadTicket {
                generation: self.generation,
                file_name: file_name.to_string(),
                kind,
            }),
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Finish an ingestion with the outcome of its read and decode.
    ///
    /// Returns `false` when the ticket is stale and the outcome was dropped.
    pub fn complete_upload(&mut self, ticket: &UploadTicket, outcome: Result<Dataset>) -> bool {
        if ticket.generation != self.generation {
            warn!(
                file = %ticket.file_name,
                "Discarding result of superseded upload"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                self.axes = schema::infer_axes(&dataset);
                info!(
                    file = %ticket.file_name,
                    rows = dataset.len(),
                    columns = dataset.columns().len(),
                    x = ?self.axes.x,
                    y = ?self.axes.y,
                    "Loaded dataset"
                );
                self.dataset = Some(dataset);
            }
            Err(err) => self.fail(&err),
        }
        true
    }

    /// Read, decode and install a file in one step.
    pub async fn upload(&mut self, path: &Path) -> Result<()> {
        let ticket = self.begin_upload(&ingest::file_name(path))?;
        let outcome = match ingest::read_file(path).await {
            Ok(bytes) => ingest::decode(ticket.kind, bytes),
            Err(err) => Err(err),
        };
        let failure = outcome.as_ref().err().cloned();
        self.complete_upload(&ticket, outcome);
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, err: &IngestError) {
        warn!(error = %err, "File ingestion failed");
        self.dataset = None;
        self.axes = AxisSelection::default();
        self.loading = false;
        self.error = Some(err.user_message());
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_deref()
    }

    /// Column list of the current dataset, empty when nothing is loaded.
    pub fn columns(&self) -> &[String] {
        self.dataset.as_deref().map(Dataset::columns).unwrap_or(&[])
    }

    pub fn axes(&self) -> &AxisSelection {
        &self.axes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn chart_kind(&self) -> ChartKind {
        self.chart_kind
    }

    pub fn set_chart_kind(&mut self, kind: ChartKind) {
        self.chart_kind = kind;
    }

    /// Override the X axis. The value is taken as given.
    pub fn set_x_column(&mut self, column: Option<String>) {
        self.axes.x = column;
    }

    /// Override the Y axis. A non-numeric column simply yields an empty series.
    pub fn set_y_column(&mut self, column: Option<String>) {
        self.axes.y = column;
    }

    /// Bounded chart series for the current selection.
    pub fn chart_series(&self) -> Option<ChartSeries<'_>> {
        let dataset = self.dataset.as_deref()?;
        let x = self.axes.x.as_deref()?;
        let y = self.axes.y.as_deref()?;
        Some(projection::project(dataset, x, y))
    }

    /// Statistics for the selected Y column over the full dataset.
    pub fn statistics(&self) -> Option<SummaryStatistics> {
        let dataset = self.dataset.as_deref()?;
        let y = self.axes.y.as_deref()?;
        Some(stats::summarize(dataset, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv(text: &str) -> Result<Dataset> {
        ingest::decode(FileKind::Csv, text.as_bytes().to_vec())
    }

    #[test]
    fn test_upload_flow_sets_defaults() {
        let mut session = Session::new();
        let ticket = session.begin_upload("sales.csv").unwrap();
        assert!(session.is_loading());

        assert!(session.complete_upload(&ticket, csv("Name,Amount\nA,10\nB,30\nC,20\n")));
        assert!(!session.is_loading());
        assert_eq!(session.error(), None);
        assert_eq!(session.columns(), &["Name".to_string(), "Amount".to_string()]);
        assert_eq!(session.axes().x.as_deref(), Some("Name"));
        assert_eq!(session.axes().y.as_deref(), Some("Amount"));

        let series = session.chart_series().unwrap();
        let ys: Vec<f64> = series.entries.iter().map(|e| e.y).collect();
        assert_eq!(ys, vec![30.0, 20.0, 10.0]);

        let stats = session.statistics().unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(20.0));
    }

    #[test]
    fn test_begin_upload_clears_previous_state() {
        let mut session = Session::new();
        let ticket = session.begin_upload("a.csv").unwrap();
        session.complete_upload(&ticket, csv("x,y\na,1\n"));
        assert!(session.dataset().is_some());

        session.begin_upload("b.csv").unwrap();
        assert!(session.dataset().is_none());
        assert!(session.columns().is_empty());
        assert_eq!(session.axes(), &AxisSelection::default());
        assert!(session.is_loading());
    }

    #[test]
    fn test_unsupported_extension_sets_error() {
        let mut session = Session::new();
        let err = session.begin_upload("notes.txt").unwrap_err();
        assert_eq!(err, IngestError::UnsupportedFileType("txt".to_string()));
        assert!(!session.is_loading());
        assert!(session.dataset().is_none());
        let msg = session.error().unwrap();
        assert!(msg.starts_with("Error processing file:"));
        assert!(msg.contains("txt"));
    }

    #[test]
    fn test_empty_input_message() {
        let mut session = Session::new();
        let ticket = session.begin_upload("empty.csv").unwrap();
        session.complete_upload(&ticket, csv(""));
        assert_eq!(session.error(), Some("Error processing file: File is empty"));
        assert!(session.dataset().is_none());
        assert!(!session.is_loading());
    }

    #[test]
    fn test_empty_result_message() {
        let mut session = Session::new();
        let ticket = session.begin_upload("header.csv").unwrap();
        session.complete_upload(&ticket, csv("a,b\n"));
        assert_eq!(session.error(), Some("No valid data found in file"));
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = Session::new();
        let first = session.begin_upload("first.csv").unwrap();
        let second = session.begin_upload("second.csv").unwrap();

        assert!(!session.complete_upload(&first, csv("old,v\na,1\n")));
        assert!(session.dataset().is_none());
        assert!(session.is_loading());

        assert!(session.complete_upload(&second, csv("new,v\nb,2\n")));
        assert_eq!(session.columns()[0], "new");
    }

    #[test]
    fn test_user_axis_override() {
        let mut session = Session::new();
        let ticket = session.begin_upload("d.csv").unwrap();
        session.complete_upload(&ticket, csv("name,units,price\na,1,9\nb,5,2\n"));
        assert_eq!(session.axes().y.as_deref(), Some("price"));

        session.set_y_column(Some("units".to_string()));
        let series = session.chart_series().unwrap();
        assert_eq!(series.entries[0].y, 5.0);
        assert_eq!(session.statistics().unwrap().max, Some(5.0));

        session.set_y_column(Some("name".to_string()));
        assert!(session.chart_series().unwrap().is_empty());
        assert_eq!(session.statistics().unwrap().count, 0);

        session.set_y_column(None);
        assert!(session.chart_series().is_none());
        assert!(session.statistics().is_none());
    }

    #[test]
    fn test_new_dataset_reruns_axis_inference() {
        let mut session = Session::new();
        let ticket = session.begin_upload("one.csv").unwrap();
        session.complete_upload(&ticket, csv("a,cost\nx,1\n"));
        session.set_y_column(Some("a".to_string()));

        let ticket = session.begin_upload("two.csv").unwrap();
        session.complete_upload(&ticket, csv("b,total\ny,2\n"));
        assert_eq!(session.axes().x.as_deref(), Some("b"));
        assert_eq!(session.axes().y.as_deref(), Some("total"));
    }

    #[test]
    fn test_chart_kind_selection() {
        let mut session = Session::new();
        assert_eq!(session.chart_kind(), ChartKind::Bar);
        session.set_chart_kind(ChartKind::Pie);
        assert_eq!(session.chart_kind(), ChartKind::Pie);
    }

    #[tokio::test]
    async fn test_upload_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "Region,Sales\nWest,5\nEast,7\n").unwrap();

        let mut session = Session::new();
        session.upload(file.path()).await.unwrap();
        assert_eq!(session.axes().y.as_deref(), Some("Sales"));
        assert_eq!(session.chart_series().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_read_failure() {
        let mut session = Session::new();
        let result = session.upload(Path::new("/nonexistent/dir/data.csv")).await;
        assert!(matches!(result, Err(IngestError::ReadFailure(_))));
        assert!(session
            .error()
            .unwrap()
            .starts_with("Error processing file: Failed to read file:"));
        assert!(!session.is_loading());
    }
}

// Library exports for sheetplot

pub mod error;
pub mod value;

// Ingestion
pub mod csv_reader;
pub mod spreadsheet;
pub mod normalize;
pub mod dataset;
pub mod ingest;

// Derivation
pub mod schema;
pub mod projection;
pub mod stats;
pub mod format;

// Presentation
pub mod palette;
pub mod graph;
pub mod session;

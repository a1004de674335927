// Ingestion error kinds and their user-visible messages

/// Prefix shown in front of every ingestion failure except an empty result
pub const ERROR_PREFIX: &str = "Error processing file:";

/// Shown verbatim when a file parses but yields no rows
pub const NO_DATA_MESSAGE: &str = "No valid data found in file";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    /// Extension is not one of csv, xlsx, xls
    #[error("Unsupported file type: .{0}")]
    UnsupportedFileType(String),

    /// Delimited text had no non-blank lines
    #[error("File is empty")]
    EmptyInput,

    /// Spreadsheet library rejected the content, or the workbook has no sheets
    #[error("Failed to decode spreadsheet: {0}")]
    DecodeError(String),

    /// The underlying read reported an error
    #[error("Failed to read file: {0}")]
    ReadFailure(String),

    /// Parsing succeeded but produced zero rows
    #[error("{}", NO_DATA_MESSAGE)]
    EmptyResult,
}

impl IngestError {
    /// The single message surfaced to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            IngestError::EmptyResult => NO_DATA_MESSAGE.to_string(),
            other => format!("{} {}", ERROR_PREFIX, other),
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::ReadFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefixes_failures() {
        let msg = IngestError::EmptyInput.user_message();
        assert_eq!(msg, "Error processing file: File is empty");

        let msg = IngestError::UnsupportedFileType("txt".to_string()).user_message();
        assert!(msg.starts_with("Error processing file:"));
        assert!(msg.contains(".txt"));
    }

    #[test]
    fn test_user_message_empty_result_is_literal() {
        assert_eq!(
            IngestError::EmptyResult.user_message(),
            "No valid data found in file"
        );
    }

    #[test]
    fn test_io_error_maps_to_read_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        match IngestError::from(io) {
            IngestError::ReadFailure(msg) => assert!(msg.contains("gone")),
            other => panic!("Expected ReadFailure, got {:?}", other),
        }
    }
}

use std::fs::File;
use std::io::BufReader;

/// Error types that can occur while building, running or restoring a network
///
/// # Variants
///
/// - `Configuration` - the provided configuration is invalid (non-positive dimension, empty layout, bad initializer or batch size)
/// - `ShapeMismatch` - an input or response vector length disagrees with the configured widths
/// - `CorruptDump` - a deserialized dump's weight shapes disagree with its declared layout
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    Configuration(String),
    ShapeMismatch(String),
    CorruptDump(String),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            NetworkError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            NetworkError::CorruptDump(msg) => write!(f, "Corrupt dump: {}", msg),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Input/Output error types that can occur during model serialization and file operations
///
/// # Variants
///
/// - `StdIoError` - Wraps standard I/O errors from file system operations (reading, writing, file access)
/// - `JsonError` - Wraps JSON serialization/deserialization errors when working with JSON data formats
#[derive(Debug)]
pub enum IoError {
    StdIoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl IoError {
    pub fn load_in_buf_reader(path: &str) -> Result<BufReader<File>, IoError> {
        let file = File::open(path).map_err(IoError::StdIoError)?;
        Ok(BufReader::new(file))
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::StdIoError(e) => write!(f, "IO error: {}", e),
            IoError::JsonError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for IoError {}

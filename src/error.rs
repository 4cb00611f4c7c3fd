//! Error types for archshape

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archshape
#[derive(Debug, Error)]
pub enum ArchShapeError {
    #[error("Malformed row {row} in {}: {field} = '{value}'", .file.display())]
    MalformedRow {
        file: PathBuf,
        row: u64,
        field: &'static str,
        value: String,
    },

    #[error("Malformed tag '{tag}': {reason}")]
    MalformedTag { tag: String, reason: String },

    #[error("{}, row {row}: {source}", .file.display())]
    AtRow {
        file: PathBuf,
        row: u64,
        #[source]
        source: Box<ArchShapeError>,
    },

    #[error("No datum row found in {}", .0.display())]
    MissingDatum(PathBuf),

    #[error("Expected exactly one datum row in {}, found {count}", .path.display())]
    MultipleDatums { path: PathBuf, count: usize },

    #[error("Output already exists: {}", .0.display())]
    OutputExists(PathBuf),

    #[error("Output would replace an input file: {}", .0.display())]
    ReplacesInput(PathBuf),

    #[error("Failed to write layer '{layer}': {reason}")]
    WriteTransaction { layer: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl ArchShapeError {
    /// Build a tag error
    pub fn malformed_tag(tag: &str, reason: impl Into<String>) -> Self {
        ArchShapeError::MalformedTag {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach the source file and row number to an error raised while resolving a record
    pub fn at_row(self, file: impl Into<PathBuf>, row: u64) -> Self {
        ArchShapeError::AtRow {
            file: file.into(),
            row,
            source: Box::new(self),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ArchShapeError::AtRow { source, .. } => source.exit_code(),
            ArchShapeError::MalformedRow { .. } | ArchShapeError::MalformedTag { .. } => 3,
            ArchShapeError::MissingDatum(_) | ArchShapeError::MultipleDatums { .. } => 4,
            ArchShapeError::OutputExists(_) | ArchShapeError::ReplacesInput(_) => 5,
            ArchShapeError::WriteTransaction { .. } => 6,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            ArchShapeError::AtRow { source, .. } => match source.as_ref() {
                ArchShapeError::MalformedTag { .. } => format!(
                    "{}\n\n\
                    Valid location tags:\n\
                    • Point: N12W4, S5E3\n\
                    • Line: N2-4W4 (one ranged axis)\n\
                    • Rectangle: N0-100E0-50 (both axes ranged)\n\
                    Each tag needs exactly one N/S and one E/W direction.",
                    self
                ),
                _ => self.to_string(),
            },
            ArchShapeError::MalformedTag { .. } => format!(
                "{}\n\n\
                Valid location tags:\n\
                • Point: N12W4, S5E3\n\
                • Line: N2-4W4 (one ranged axis)\n\
                • Rectangle: N0-100E0-50 (both axes ranged)",
                self
            ),
            ArchShapeError::MissingDatum(path) | ArchShapeError::MultipleDatums { path, .. } => {
                format!(
                    "{}\n\n\
                    The datum file must hold a header row and exactly one data row:\n\
                    latitude,longitude,label\n\
                    40.0,-90.0,Site datum\n\n\
                    File: {}",
                    self,
                    path.display()
                )
            }
            ArchShapeError::OutputExists(path) => format!(
                "{}\n\n\
                Suggestions:\n\
                • Pass --overwrite to replace existing layers\n\
                • Choose another directory with --output-dir\n\
                • Remove {} by hand",
                self,
                path.display()
            ),
            ArchShapeError::ReplacesInput(_) => format!(
                "{}\n\n\
                Suggestions:\n\
                • Choose another directory with --output-dir\n\
                • Rename the input so it does not match a layer file name",
                self
            ),
            _ => self.to_string(),
        }
    }
}

/// Result type using ArchShapeError
pub type Result<T> = std::result::Result<T, ArchShapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_tag_suggestions() {
        let err = ArchShapeError::malformed_tag("N5", "missing E/W direction");
        let msg = err.display_with_suggestions();
        assert!(msg.contains("Malformed tag 'N5'"));
        assert!(msg.contains("N0-100E0-50"));
    }

    #[test]
    fn test_at_row_keeps_inner_exit_code() {
        let err = ArchShapeError::malformed_tag("N5", "missing E/W direction").at_row("tags.csv", 7);
        assert_eq!(err.exit_code(), 3);
        let msg = err.to_string();
        assert!(msg.contains("tags.csv, row 7"));
        assert!(msg.contains("'N5'"));
        assert!(err.display_with_suggestions().contains("exactly one N/S"));
    }

    #[test]
    fn test_malformed_row_message() {
        let err = ArchShapeError::MalformedRow {
            file: PathBuf::from("datum.csv"),
            row: 2,
            field: "latitude",
            value: "forty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed row 2 in datum.csv: latitude = 'forty'"
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_datum_errors_show_expected_layout() {
        let err = ArchShapeError::MultipleDatums {
            path: PathBuf::from("datum.csv"),
            count: 2,
        };
        assert_eq!(err.exit_code(), 4);
        let msg = err.display_with_suggestions();
        assert!(msg.contains("found 2"));
        assert!(msg.contains("latitude,longitude,label"));
    }

    #[test]
    fn test_output_exists_suggestions() {
        let err = ArchShapeError::OutputExists(PathBuf::from("out/tagsLocation.geojson"));
        assert_eq!(err.exit_code(), 5);
        assert!(err.display_with_suggestions().contains("--overwrite"));
    }

    #[test]
    fn test_replaces_input_does_not_suggest_overwrite() {
        let err = ArchShapeError::ReplacesInput(PathBuf::from("tagsLocation.geojson"));
        assert_eq!(err.exit_code(), 5);
        let msg = err.display_with_suggestions();
        assert!(msg.contains("would replace an input file"));
        assert!(!msg.contains("--overwrite"));
    }

    #[test]
    fn test_other_errors_fallback() {
        let err = ArchShapeError::Config("bad key".to_string());
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.display_with_suggestions(), "Configuration error: bad key");
    }
}

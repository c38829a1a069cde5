use std::path::PathBuf;
use thiserror::Error;

/// The main error type for shotdiff operations.
#[derive(Debug, Error)]
pub enum ShotdiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("baseline not found: {0}")]
    BaselineNotFound(PathBuf),

    #[error("current not found: {0}")]
    CurrentNotFound(PathBuf),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "image sizes differ ({baseline_width}x{baseline_height} vs {current_width}x{current_height}). \
         Re-run with --resize to match baseline size."
    )]
    DimensionMismatch {
        baseline_width: u32,
        baseline_height: u32,
        current_width: u32,
        current_height: u32,
    },

    #[error("Failed to parse annotation spec from {path}: {source}")]
    SpecJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode report: {0}")]
    ReportEncode(#[source] serde_json::Error),

    #[error("annotation spec {path} has {count} unresolved anchor(s)")]
    UnresolvedAnchors { path: PathBuf, count: usize },
}

impl ShotdiffError {
    /// Returns true for errors caused by the caller's inputs rather than by
    /// artifact output.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::BaselineNotFound(_)
                | Self::CurrentNotFound(_)
                | Self::ImageDecode { .. }
                | Self::DimensionMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_mentions_resize() {
        let err = ShotdiffError::DimensionMismatch {
            baseline_width: 120,
            baseline_height: 80,
            current_width: 100,
            current_height: 80,
        };
        let msg = err.to_string();
        assert!(msg.contains("120x80 vs 100x80"));
        assert!(msg.contains("--resize"));
        assert!(err.is_input_error());
    }

    #[test]
    fn missing_files_name_the_path() {
        let err = ShotdiffError::BaselineNotFound(PathBuf::from("shots/base.png"));
        assert_eq!(err.to_string(), "baseline not found: shots/base.png");

        let err = ShotdiffError::CurrentNotFound(PathBuf::from("shots/cur.png"));
        assert!(err.to_string().starts_with("current not found"));
    }

    #[test]
    fn io_errors_are_not_input_errors() {
        let err = ShotdiffError::from(std::io::Error::other("disk full"));
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("disk full"));
    }
}

//! JSON reading and writing for annotation documents.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::model::AnnotationSpec;
use crate::artifact;
use crate::error::ShotdiffError;

/// Reads an annotation document from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not a valid document.
pub fn read_spec(path: &Path) -> Result<AnnotationSpec, ShotdiffError> {
    let file = File::open(path).map_err(ShotdiffError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| ShotdiffError::SpecJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes an annotation document as pretty JSON, creating parent directories.
///
/// The document is encoded in full before the file is touched.
pub fn write_spec(path: &Path, spec: &AnnotationSpec) -> Result<(), ShotdiffError> {
    artifact::write_json(path, spec)
}

/// Parses an annotation document from a JSON string.
pub fn from_spec_str(json: &str) -> Result<AnnotationSpec, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parses an annotation document from raw bytes.
pub fn from_spec_slice(bytes: &[u8]) -> Result<AnnotationSpec, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Encodes an annotation document as pretty JSON.
pub fn to_spec_string(spec: &AnnotationSpec) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(spec)
}

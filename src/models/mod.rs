use base64::{engine::general_purpose, Engine};
use std::fmt;
use std::fs;

use crate::error::AnalysisError;

/// An image read from disk, ready to travel inline in an inference request.
/// Built fresh for every call; nothing is cached between the two requests of
/// a run. Format support is whatever the endpoint accepts.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub mime_type: &'static str,
    data: Vec<u8>,
}

impl ImagePayload {
    pub fn from_path(path: &str) -> Result<Self, AnalysisError> {
        let data = fs::read(path).map_err(|source| AnalysisError::Decode {
            path: path.to_string(),
            source,
        })?;
        log::debug!("📊 Image file size: {} bytes", data.len());

        // MIME type from the file extension; the endpoint is the final
        // validator of the actual bytes.
        let mime_type = if path.ends_with(".png") {
            "image/png"
        } else if path.ends_with(".webp") {
            "image/webp"
        } else if path.ends_with(".jpg") || path.ends_with(".jpeg") {
            "image/jpeg"
        } else {
            "image/jpeg" // default
        };

        Ok(Self { mime_type, data })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(mime_type: &'static str, data: Vec<u8>) -> Self {
        Self { mime_type, data }
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }
}

/// The model's macro estimate, passed through verbatim. No structural parsing
/// into protein/carb/fat/calorie fields is performed; callers get opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroReport(String);

impl MacroReport {
    pub fn new(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacroReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Macros(MacroReport),
    NotFood,
}

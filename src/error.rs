//! Error types for the markdown-extractor service.
//!
//! Two error types mirror the two parties involved in a conversion:
//!
//! * [`ConvertError`] — the request cannot be served: bad upload, converter
//!   not ready, conversion failed or ran past its deadline. Returned from
//!   [`crate::convert::convert_upload`] and mapped to an HTTP status by the
//!   server layer.
//!
//! * [`ConverterError`] — the external converter itself failed. Always
//!   wrapped in [`ConvertError::ConversionFailed`] before it reaches a client.

use crate::format::FileType;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a single conversion request can fail.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Client errors ─────────────────────────────────────────────────────
    /// The filename's extension is not in the allow-list.
    #[error("Unsupported file type: {extension}. Allowed: {allowed}")]
    UnsupportedFileType { extension: String, allowed: String },

    /// The multipart body carried no `file` part.
    #[error("No file uploaded")]
    MissingFile,

    /// The multipart body could not be read.
    #[error("Failed to read upload: {0}")]
    InvalidUpload(String),

    /// The upload exceeded the configured size limit.
    #[error("File too large: uploads are limited to {limit_bytes} bytes")]
    PayloadTooLarge { limit_bytes: usize },

    // ── Dependency errors ─────────────────────────────────────────────────
    /// The converter failed to initialise at start-up.
    #[error("Document converter not initialized: {reason}")]
    ConverterUnavailable { reason: String },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The converter ran and reported a failure.
    #[error("Conversion failed: {0}")]
    ConversionFailed(#[from] ConverterError),

    /// The converter did not finish before the deadline for this file type.
    #[error("Conversion timed out after {secs}s for {file_type} file")]
    Timeout { file_type: FileType, secs: u64 },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Local I/O around the conversion failed (temp file creation etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// True for errors caused by the request itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFileType { .. }
                | Self::MissingFile
                | Self::InvalidUpload(_)
                | Self::PayloadTooLarge { .. }
        )
    }

    /// Optional remediation hint returned next to the error detail.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Timeout { file_type, .. } if file_type.is_image() => Some(
                "Try a smaller file or a lower resolution image; OCR time grows with pixel count.",
            ),
            Self::Timeout { .. } => {
                Some("Try a smaller file, or split the document into fewer pages.")
            }
            Self::PayloadTooLarge { .. } => Some("Try a smaller file."),
            Self::ConversionFailed(_) => {
                Some("Check that the file is not corrupt or password protected.")
            }
            _ => None,
        }
    }
}

/// Failures reported by a [`crate::converter::DocumentConverter`].
#[derive(Debug, Clone, Error)]
pub enum ConverterError {
    /// The converter program could not be started.
    #[error("failed to start '{program}': {detail}")]
    Spawn { program: String, detail: String },

    /// The converter program exited unsuccessfully.
    #[error("converter exited with {status}: {stderr}")]
    Exited { status: String, stderr: String },

    /// The converter finished but left nothing usable behind.
    #[error("converter produced no output for '{path}'")]
    NoOutput { path: PathBuf },

    /// The converter rejected the input.
    #[error("{0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_display_lists_allowed() {
        let e = ConvertError::UnsupportedFileType {
            extension: ".xyz".into(),
            allowed: crate::format::allowed_extensions_list(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Unsupported file type: .xyz"), "got: {msg}");
        assert!(msg.contains(".pdf"));
        assert!(e.is_client_error());
        assert!(e.suggestion().is_none());
    }

    #[test]
    fn conversion_failed_wraps_converter_text() {
        let e: ConvertError = ConverterError::Failed("broken xref table".into()).into();
        assert_eq!(e.to_string(), "Conversion failed: broken xref table");
        assert!(!e.is_client_error());
        assert!(e.suggestion().is_some());
    }

    #[test]
    fn image_timeout_suggests_lower_resolution() {
        let e = ConvertError::Timeout {
            file_type: FileType::Png,
            secs: 120,
        };
        assert!(e.to_string().contains("120s"));
        assert!(e.to_string().contains(".png"));
        assert!(e.suggestion().unwrap().contains("lower resolution"));
    }

    #[test]
    fn document_timeout_suggests_smaller_file() {
        let e = ConvertError::Timeout {
            file_type: FileType::Pdf,
            secs: 240,
        };
        assert!(e.suggestion().unwrap().contains("smaller file"));
    }

    #[test]
    fn exited_display() {
        let e = ConverterError::Exited {
            status: "exit status: 2".into(),
            stderr: "no such file".into(),
        };
        assert_eq!(e.to_string(), "converter exited with exit status: 2: no such file");
    }
}

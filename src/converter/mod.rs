//! The external document converter and the handle the service holds to it.
//!
//! The service never looks inside a document. It hands a file path to a
//! [`DocumentConverter`] and receives Markdown plus whatever metadata the
//! converter could report. Two implementations ship with the crate:
//!
//! * [`DoclingCommand`] — runs the Docling CLI as a child process.
//! * test doubles in `tests/`, which implement the trait directly.
//!
//! ## Initialisation failure as a value
//!
//! Start-up may fail to find a working converter. Instead of a nullable
//! global, the router state carries a [`ConverterHandle`] which is either
//! `Ready` or `Unavailable { reason }`. Health checks and conversions read
//! the tag; nothing retries or re-initialises until the process restarts.

pub mod docling;
pub mod docling_json;

pub use docling::DoclingCommand;

use crate::error::{ConvertError, ConverterError};
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// What a converter hands back. Metadata the converter could not determine
/// is `None`; reading it never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedDocument {
    pub markdown: String,
    pub page_count: Option<u32>,
    pub title: Option<String>,
}

impl ConvertedDocument {
    /// A document with Markdown only and no metadata.
    pub fn from_markdown(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            ..Self::default()
        }
    }
}

/// A document-to-Markdown converter.
///
/// Implementations may fail on malformed input and may run for an unbounded
/// time; callers bound every call with a deadline and drop the future when
/// it expires, so implementations that own OS resources must release them
/// on drop.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    /// Convert the file at `path`. The extension of `path` matches the
    /// uploaded file's extension.
    async fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConverterError>;
}

/// The converter as seen by request handlers: ready, or failed at start-up.
#[derive(Clone)]
pub enum ConverterHandle {
    Ready(Arc<dyn DocumentConverter>),
    Unavailable { reason: String },
}

impl ConverterHandle {
    pub fn ready(converter: impl DocumentConverter + 'static) -> Self {
        Self::Ready(Arc::new(converter))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The converter, or the dependency-not-ready error.
    pub fn converter(&self) -> Result<&Arc<dyn DocumentConverter>, ConvertError> {
        match self {
            Self::Ready(c) => Ok(c),
            Self::Unavailable { reason } => Err(ConvertError::ConverterUnavailable {
                reason: reason.clone(),
            }),
        }
    }
}

impl fmt::Debug for ConverterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(_) => f.write_str("Ready(<dyn DocumentConverter>)"),
            Self::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl DocumentConverter for Echo {
        async fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConverterError> {
            Ok(ConvertedDocument::from_markdown(path.display().to_string()))
        }
    }

    #[test]
    fn unavailable_handle_reports_reason() {
        let handle = ConverterHandle::unavailable("docling not found on PATH");
        assert!(!handle.is_ready());
        let err = handle.converter().err().unwrap();
        assert!(matches!(err, ConvertError::ConverterUnavailable { .. }));
        assert!(err.to_string().contains("docling not found on PATH"));
    }

    #[tokio::test]
    async fn ready_handle_dispatches() {
        let handle = ConverterHandle::ready(Echo);
        assert!(handle.is_ready());
        let doc = handle
            .converter()
            .unwrap()
            .convert(Path::new("/tmp/a.pdf"))
            .await
            .unwrap();
        assert_eq!(doc.markdown, "/tmp/a.pdf");
        assert_eq!(doc.page_count, None);
    }

    #[test]
    fn debug_hides_trait_object() {
        let handle = ConverterHandle::ready(Echo);
        assert_eq!(format!("{handle:?}"), "Ready(<dyn DocumentConverter>)");
    }
}

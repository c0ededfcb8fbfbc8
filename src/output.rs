//! Response bodies returned by the service.

use crate::format::SupportedFormat;
use serde::{Deserialize, Serialize};

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Markdown Extractor API";

/// Best-effort document metadata. Absent fields serialise as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub pages: Option<u32>,
    pub title: Option<String>,
}

/// Body of a successful `POST /convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    pub filename: String,
    /// Dotted, lower-cased extension, e.g. `".pdf"`.
    pub file_type: String,
    pub markdown: String,
    pub metadata: DocumentMetadata,
    /// Character count of `markdown`.
    pub markdown_length: usize,
}

impl ConversionResult {
    /// Build a successful result; the length is always derived from
    /// `markdown` so the two cannot disagree.
    pub fn success(
        filename: impl Into<String>,
        file_type: impl Into<String>,
        markdown: String,
        metadata: DocumentMetadata,
    ) -> Self {
        let markdown_length = markdown.chars().count();
        Self {
            success: true,
            filename: filename.into(),
            file_type: file_type.into(),
            markdown,
            metadata,
            markdown_length,
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub version: String,
    pub model: String,
}

impl ServiceInfo {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: model.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub model: String,
    pub ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Body of `GET /supported-formats`.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedFormats {
    pub formats: &'static [SupportedFormat],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_chars_not_bytes() {
        let r = ConversionResult::success(
            "résumé.pdf",
            ".pdf",
            "# Résumé ✓".to_string(),
            DocumentMetadata::default(),
        );
        assert_eq!(r.markdown_length, 10);
        assert!(r.success);
    }

    #[test]
    fn absent_metadata_serialises_as_null() {
        let json = serde_json::to_value(DocumentMetadata::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "pages": null, "title": null }));
    }

    #[test]
    fn service_info_reports_crate_version() {
        let info = ServiceInfo::new("docling-q4_0");
        assert_eq!(info.service, SERVICE_NAME);
        assert_eq!(info.status, "running");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.model, "docling-q4_0");
    }

    #[test]
    fn healthy_status_omits_detail() {
        let h = HealthStatus {
            status: "healthy".into(),
            model: "docling".into(),
            ready: true,
            detail: None,
        };
        let json = serde_json::to_value(h).unwrap();
        assert!(json.get("detail").is_none());
    }
}

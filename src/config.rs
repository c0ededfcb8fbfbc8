//! Service configuration.
//!
//! Every knob lives in [`ServiceConfig`], built via [`ServiceConfigBuilder`].
//! The binary maps CLI flags and environment variables onto the builder;
//! tests use it directly to shrink timeouts and point the temp directory at a
//! scratch folder they can inspect.

use crate::error::ConvertError;
use crate::format::FileType;
use std::path::PathBuf;
use std::time::Duration;

/// Default model path, matching the container image layout.
pub const DEFAULT_MODEL_PATH: &str = "/models/docling-q4_0.gguf";

/// Configuration for the conversion service.
///
/// # Example
/// ```rust
/// use markdown_extractor::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .model_name("docling-q8_0")
///     .image_timeout_secs(60)
///     .build()
///     .unwrap();
/// assert_eq!(config.image_timeout_secs, 60);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Model file handed to the converter. Opaque to the service.
    pub model_path: String,

    /// Identifier reported by `/` and `/health`. Default: "docling".
    pub model_name: String,

    /// Deadline for PDF, Word, text and HTML conversions. Default: 240.
    ///
    /// Stays under the 300 s request timeout the client scripts and the
    /// reverse proxy use, so the server gives up first and still answers
    /// with a structured error.
    pub document_timeout_secs: u64,

    /// Deadline for raster images. Default: 120.
    ///
    /// OCR dominates conversion time for images and scales with pixel count.
    pub image_timeout_secs: u64,

    /// Largest accepted request body in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,

    /// Directory for scoped temporary files. `None` uses the system default.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: DEFAULT_MODEL_PATH.to_string(),
            model_name: "docling".to_string(),
            document_timeout_secs: 240,
            image_timeout_secs: 120,
            max_upload_bytes: 50 * 1024 * 1024,
            temp_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Create a new builder for `ServiceConfig`.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder {
            config: Self::default(),
        }
    }

    /// Deadline applied to a conversion of `file_type`.
    pub fn timeout_for(&self, file_type: FileType) -> Duration {
        if file_type.is_image() {
            Duration::from_secs(self.image_timeout_secs)
        } else {
            Duration::from_secs(self.document_timeout_secs)
        }
    }
}

/// Builder for [`ServiceConfig`].
#[derive(Debug)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn model_path(mut self, path: impl Into<String>) -> Self {
        self.config.model_path = path.into();
        self
    }

    pub fn model_name(mut self, name: impl Into<String>) -> Self {
        self.config.model_name = name.into();
        self
    }

    pub fn document_timeout_secs(mut self, secs: u64) -> Self {
        self.config.document_timeout_secs = secs;
        self
    }

    pub fn image_timeout_secs(mut self, secs: u64) -> Self {
        self.config.image_timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    pub fn max_upload_mb(mut self, mb: usize) -> Self {
        self.config.max_upload_bytes = mb.saturating_mul(1024 * 1024);
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServiceConfig, ConvertError> {
        let c = &self.config;
        if c.document_timeout_secs == 0 || c.image_timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "timeouts must be at least 1 second".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(ConvertError::InvalidConfig(
                "upload limit must be at least 1 byte".into(),
            ));
        }
        if c.model_name.trim().is_empty() {
            return Err(ConvertError::InvalidConfig("model name must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ServiceConfig::default();
        assert_eq!(c.model_path, DEFAULT_MODEL_PATH);
        assert_eq!(c.document_timeout_secs, 240);
        assert_eq!(c.image_timeout_secs, 120);
        assert_eq!(c.max_upload_bytes, 52_428_800);
        assert!(c.temp_dir.is_none());
    }

    #[test]
    fn images_get_the_shorter_deadline() {
        let c = ServiceConfig::builder()
            .document_timeout_secs(300)
            .image_timeout_secs(30)
            .build()
            .unwrap();
        assert_eq!(c.timeout_for(FileType::Tiff), Duration::from_secs(30));
        assert_eq!(c.timeout_for(FileType::Docx), Duration::from_secs(300));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = ServiceConfig::builder().image_timeout_secs(0).build();
        assert!(err.is_err());
    }

    #[test]
    fn zero_upload_limit_rejected() {
        assert!(ServiceConfig::builder().max_upload_bytes(0).build().is_err());
    }

    #[test]
    fn upload_limit_in_megabytes() {
        let c = ServiceConfig::builder().max_upload_mb(2).build().unwrap();
        assert_eq!(c.max_upload_bytes, 2 * 1024 * 1024);
    }
}

//! # markdown-extractor
//!
//! An HTTP service that converts uploaded documents (PDF, Word, images,
//! text, HTML) to Markdown by delegating to Docling.
//!
//! The service does not parse documents itself. It validates the upload,
//! stores it in a scoped temporary file, runs the external converter under a
//! deadline, and shapes the outcome into JSON.
//!
//! ## Request Flow
//!
//! ```text
//! POST /convert (multipart "file")
//!  │
//!  ├─ 1. Validate  extension in {pdf, docx, doc, png, jpg, jpeg, tiff, txt, html}
//!  ├─ 2. Persist   bytes → NamedTempFile with the same suffix
//!  ├─ 3. Convert   DocumentConverter::convert(path) under a deadline
//!  │               (images 120 s, documents 240 s by default)
//!  ├─ 4. Cleanup   temp file removed on every path, timeout included
//!  └─ 5. Respond   markdown + metadata + markdown_length, or {detail}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use markdown_extractor::{create_router, AppState, DoclingCommand, ServiceConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServiceConfig::builder().model_name("docling-q4_0").build()?;
//!     let converter = DoclingCommand::new("docling", config.model_path.clone())
//!         .initialize(Duration::from_secs(30))
//!         .await;
//!     let router = create_router(AppState::new(converter, config));
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `markdown-extractor` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod converter;
pub mod error;
pub mod format;
pub mod output;
pub mod postprocess;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ServiceConfig, ServiceConfigBuilder};
pub use convert::convert_upload;
pub use converter::{ConvertedDocument, ConverterHandle, DoclingCommand, DocumentConverter};
pub use error::{ConvertError, ConverterError};
pub use format::{FileType, SupportedFormat, SUPPORTED_FORMATS};
pub use output::{ConversionResult, DocumentMetadata, HealthStatus, ServiceInfo};
pub use server::{create_router, AppState};

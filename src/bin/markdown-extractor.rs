//! Server binary for markdown-extractor.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to `ServiceConfig`, probes the Docling CLI and serves HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use markdown_extractor::{create_router, AppState, DoclingCommand, ServiceConfig};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"ENDPOINTS:
  GET  /                   Service name, version and model
  GET  /health             Converter readiness (503 when not initialized)
  GET  /supported-formats  Accepted extensions
  POST /convert            multipart/form-data with a "file" field

EXAMPLES:
  # Serve on the default port
  markdown-extractor

  # Custom model and shorter image deadline
  MODEL_PATH=/models/docling-q8_0.gguf MODEL_NAME=docling-q8_0 \
    markdown-extractor --image-timeout 60

  # Convert a file
  curl -F file=@report.pdf http://localhost:5000/convert
"#;

/// Convert uploaded documents to Markdown over HTTP using Docling.
#[derive(Parser, Debug)]
#[command(
    name = "markdown-extractor",
    version,
    about = "Convert documents (PDF, DOCX, images) to Markdown over HTTP using Docling",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Model file passed through to the converter.
    #[arg(long, env = "MODEL_PATH", default_value = markdown_extractor::config::DEFAULT_MODEL_PATH)]
    model_path: String,

    /// Model identifier reported by `/` and `/health`.
    #[arg(long, env = "MODEL_NAME", default_value = "docling")]
    model_name: String,

    /// Docling executable.
    #[arg(long, env = "DOCLING_BIN", default_value = "docling")]
    converter_program: String,

    /// Seconds to wait for `docling --version` at start-up.
    #[arg(long, env = "DOCLING_PROBE_TIMEOUT_SECS", default_value_t = 60)]
    probe_timeout: u64,

    /// Conversion deadline for documents, in seconds.
    #[arg(long, env = "DOCUMENT_TIMEOUT_SECS", default_value_t = 240)]
    document_timeout: u64,

    /// Conversion deadline for images, in seconds.
    #[arg(long, env = "IMAGE_TIMEOUT_SECS", default_value_t = 120)]
    image_timeout: u64,

    /// Largest accepted upload, in MiB.
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = 50)]
    max_upload_mb: usize,

    /// Directory for temporary upload files.
    #[arg(long, env = "TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// Log format: text or json.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let default_filter = if cli.verbose {
        "debug"
    } else {
        "info,tower_http=debug"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    match cli.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    tracing::info!(model_path = %config.model_path, "Initializing Docling with model");

    // ── Converter start-up ───────────────────────────────────────────────
    // A failed probe does not stop the server: /health answers 503 until
    // the process is restarted with a working converter.
    let converter = DoclingCommand::new(&cli.converter_program, config.model_path.clone())
        .initialize(Duration::from_secs(cli.probe_timeout))
        .await;

    let router = create_router(AppState::new(converter, config));

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", cli.host, cli.port))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shut down");
    Ok(())
}

/// Map CLI args to `ServiceConfig`.
fn build_config(cli: &Cli) -> Result<ServiceConfig> {
    let mut builder = ServiceConfig::builder()
        .model_path(cli.model_path.clone())
        .model_name(cli.model_name.clone())
        .document_timeout_secs(cli.document_timeout)
        .image_timeout_secs(cli.image_timeout)
        .max_upload_mb(cli.max_upload_mb);

    if let Some(ref dir) = cli.temp_dir {
        builder = builder.temp_dir(dir.clone());
    }

    builder.build().context("Invalid configuration")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_to_config() {
        let cli = Cli::parse_from(["markdown-extractor"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.image_timeout_secs, 120);
        assert_eq!(config.document_timeout_secs, 240);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "markdown-extractor",
            "--model-name",
            "docling-q8_0",
            "--image-timeout",
            "30",
            "--temp-dir",
            "/var/tmp/uploads",
            "--log-format",
            "json",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.model_name, "docling-q8_0");
        assert_eq!(config.image_timeout_secs, 30);
        assert_eq!(config.temp_dir, Some(PathBuf::from("/var/tmp/uploads")));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cli = Cli::parse_from(["markdown-extractor", "--document-timeout", "0"]);
        assert!(build_config(&cli).is_err());
    }
}

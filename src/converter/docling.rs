//! Docling CLI backend.
//!
//! Runs `docling [args] --to md --to json --output <dir> <input>` and reads
//! the exports back. The child is spawned with `kill_on_drop`, so when the
//! service drops a conversion at its deadline the process goes with it, and
//! the output directory (a [`tempfile::TempDir`] next to the input) is
//! removed on every exit path.
//!
//! Markdown is taken from the first export that can be read:
//! 1. the `<stem>.md` export, even when empty;
//! 2. the `text` items of the `<stem>.json` export, joined with blank lines.
//!
//! Only a run that leaves neither export behind is an error.

use super::{docling_json, ConvertedDocument, DocumentConverter, ConverterHandle};
use crate::error::ConverterError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Longest stderr tail carried into an error message.
const MAX_STDERR_CHARS: usize = 500;

/// Converter that shells out to the Docling command-line tool.
#[derive(Debug, Clone)]
pub struct DoclingCommand {
    program: String,
    args: Vec<String>,
    model_path: String,
}

impl DoclingCommand {
    /// `program` is looked up on `PATH` unless it is a path.
    pub fn new(program: impl Into<String>, model_path: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            model_path: model_path.into(),
        }
    }

    /// Arguments placed before the conversion arguments, e.g. a script path
    /// when `program` is an interpreter.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .env("MODEL_PATH", &self.model_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Run `program --version` and return its first output line.
    pub async fn probe(&self, timeout: Duration) -> Result<String, ConverterError> {
        let mut cmd = self.command();
        cmd.arg("--version");

        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| {
                ConverterError::Failed(format!(
                    "'{} --version' did not answer within {}s",
                    self.program,
                    timeout.as_secs()
                ))
            })?
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(ConverterError::Exited {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        Ok(version)
    }

    /// Probe the program and wrap the outcome in a [`ConverterHandle`].
    pub async fn initialize(self, timeout: Duration) -> ConverterHandle {
        match self.probe(timeout).await {
            Ok(version) => {
                info!(program = %self.program, version = %version, "Docling converter initialized successfully");
                ConverterHandle::ready(self)
            }
            Err(e) => {
                tracing::error!(program = %self.program, error = %e, "Failed to initialize Docling");
                ConverterHandle::unavailable(e.to_string())
            }
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> ConverterError {
        ConverterError::Spawn {
            program: self.program.clone(),
            detail: e.to_string(),
        }
    }
}

#[async_trait]
impl DocumentConverter for DoclingCommand {
    async fn convert(&self, path: &Path) -> Result<ConvertedDocument, ConverterError> {
        let out_dir = match path.parent() {
            Some(parent) => tempfile::Builder::new()
                .prefix(".docling-")
                .tempdir_in(parent),
            None => tempfile::Builder::new().prefix(".docling-").tempdir(),
        }
        .map_err(|e| ConverterError::Failed(format!("failed to create output directory: {e}")))?;

        let mut cmd = self.command();
        cmd.args(["--to", "md", "--to", "json", "--output"])
            .arg(out_dir.path())
            .arg(path);

        debug!(input = %path.display(), output = %out_dir.path().display(), "Running docling");
        let output = cmd.output().await.map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(ConverterError::Exited {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let json = match find_export(out_dir.path(), &stem, "json").await {
            Some(p) => tokio::fs::read(&p)
                .await
                .ok()
                .and_then(|bytes| docling_json::parse(&bytes)),
            None => None,
        };
        if json.is_none() {
            debug!("No usable JSON export; metadata will be empty");
        }

        let exported = match find_export(out_dir.path(), &stem, "md").await {
            Some(p) => match tokio::fs::read_to_string(&p).await {
                Ok(md) => Some(md),
                Err(e) => {
                    warn!(error = %e, "Markdown export unreadable, falling back to text items");
                    None
                }
            },
            None => None,
        };
        // A blank page exports an empty document, which is still a result.
        let markdown = match (exported, json.as_ref()) {
            (Some(md), _) => md,
            (None, Some(doc)) => docling_json::texts_as_markdown(doc).unwrap_or_default(),
            (None, None) => {
                return Err(ConverterError::NoOutput {
                    path: path.to_path_buf(),
                })
            }
        };

        Ok(ConvertedDocument {
            markdown,
            page_count: json.as_ref().and_then(docling_json::page_count),
            title: json.as_ref().and_then(docling_json::title),
        })
    }
}

/// `<dir>/<stem>.<ext>`, or the first file in `dir` with extension `ext`.
async fn find_export(dir: &Path, stem: &str, ext: &str) -> Option<PathBuf> {
    let expected = dir.join(format!("{stem}.{ext}"));
    if tokio::fs::metadata(&expected).await.is_ok() {
        return Some(expected);
    }

    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let p = entry.path();
        if p.extension().and_then(|e| e.to_str()) == Some(ext) {
            return Some(p);
        }
    }
    None
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let count = text.chars().count();
    if count <= MAX_STDERR_CHARS {
        text.to_string()
    } else {
        let tail: String = text.chars().skip(count - MAX_STDERR_CHARS).collect();
        format!("\u{2026}{tail}")
    }
}

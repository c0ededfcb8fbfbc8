//! The Convert operation: one uploaded file in, one Markdown result out.
//!
//! ```text
//! upload ──▶ validate ──▶ temp file ──▶ converter (deadline) ──▶ cleanup ──▶ result
//!           (extension)   (scoped)      (drop on timeout)       (always)
//! ```
//!
//! The temporary file is a [`tempfile::NamedTempFile`] owned by this
//! function's future. It is closed explicitly once the converter returns or
//! times out, and removed by `Drop` on any other exit path, including the
//! request future itself being dropped.

use crate::config::ServiceConfig;
use crate::converter::ConverterHandle;
use crate::error::ConvertError;
use crate::format::{self, FileType};
use crate::output::{ConversionResult, DocumentMetadata};
use crate::postprocess;
use std::time::Instant;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// Validate `filename`, convert `bytes` and shape the result.
///
/// # Errors
/// - [`ConvertError::ConverterUnavailable`] if start-up failed
/// - [`ConvertError::UnsupportedFileType`] for extensions outside the
///   allow-list; the converter is not called
/// - [`ConvertError::ConversionFailed`] when the converter reports an error
/// - [`ConvertError::Timeout`] when the converter misses its deadline
/// - [`ConvertError::Internal`] when the temporary file cannot be written
pub async fn convert_upload(
    handle: &ConverterHandle,
    config: &ServiceConfig,
    filename: &str,
    bytes: &[u8],
) -> Result<ConversionResult, ConvertError> {
    let converter = handle.converter()?;
    let file_type = detect_file_type(filename)?;
    info!(filename, file_type = %file_type, bytes = bytes.len(), "Processing file");

    let tmp = write_temp_file(config, file_type, bytes).await?;
    debug!(path = %tmp.path().display(), "Saved to temporary file");

    let deadline = config.timeout_for(file_type);
    let started = Instant::now();
    let outcome = tokio::time::timeout(deadline, converter.convert(tmp.path())).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let tmp_path = tmp.path().to_path_buf();
    match tmp.close() {
        Ok(()) => debug!(path = %tmp_path.display(), "Cleaned up temporary file"),
        Err(e) => warn!(path = %tmp_path.display(), error = %e, "Failed to remove temporary file"),
    }

    let document = match outcome {
        Ok(Ok(doc)) => doc,
        Ok(Err(e)) => {
            error!(filename, elapsed_ms, error = %e, "Conversion failed");
            return Err(ConvertError::ConversionFailed(e));
        }
        Err(_) => {
            error!(filename, elapsed_ms, timeout_secs = deadline.as_secs(), "Conversion timed out");
            return Err(ConvertError::Timeout {
                file_type,
                secs: deadline.as_secs(),
            });
        }
    };

    let markdown = postprocess::clean_markdown(&document.markdown);
    let metadata = DocumentMetadata {
        pages: document.page_count,
        title: document.title,
    };
    let result = ConversionResult::success(filename, file_type.dotted(), markdown, metadata);

    info!(
        filename,
        elapsed_ms,
        markdown_length = result.markdown_length,
        "Conversion successful"
    );
    Ok(result)
}

/// Map a filename to an accepted [`FileType`].
pub fn detect_file_type(filename: &str) -> Result<FileType, ConvertError> {
    let extension = format::dotted_extension(filename);
    FileType::from_extension(extension.trim_start_matches('.')).ok_or_else(|| {
        warn!(filename, extension = %extension, "Unsupported file type");
        ConvertError::UnsupportedFileType {
            extension,
            allowed: format::allowed_extensions_list(),
        }
    })
}

/// Write `bytes` to a fresh temporary file whose suffix is the upload's
/// extension; converters pick their input format from it.
///
/// The `NamedTempFile` owns the path; the bytes are written through a cloned
/// handle on tokio's blocking pool.
async fn write_temp_file(
    config: &ServiceConfig,
    file_type: FileType,
    bytes: &[u8],
) -> Result<NamedTempFile, ConvertError> {
    let suffix = file_type.dotted();
    let mut builder = tempfile::Builder::new();
    builder.prefix("upload-").suffix(&suffix);

    let tmp = match config.temp_dir {
        Some(ref dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| ConvertError::Internal(format!("tempfile: {e}")))?;

    let handle = tmp
        .as_file()
        .try_clone()
        .map_err(|e| ConvertError::Internal(format!("tempfile: {e}")))?;
    let mut file = tokio::fs::File::from_std(handle);
    file.write_all(bytes)
        .await
        .map_err(|e| ConvertError::Internal(format!("tempfile write: {e}")))?;
    file.flush()
        .await
        .map_err(|e| ConvertError::Internal(format!("tempfile write: {e}")))?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_case_insensitively() {
        assert_eq!(detect_file_type("Scan.JPEG").unwrap(), FileType::Jpeg);
        assert_eq!(detect_file_type("a.b.docx").unwrap(), FileType::Docx);
    }

    #[test]
    fn rejects_unknown_and_missing_extensions() {
        for name in ["notes.xyz", "README", "archive.tar.gz", ""] {
            let err = detect_file_type(name).unwrap_err();
            assert!(
                matches!(err, ConvertError::UnsupportedFileType { .. }),
                "{name}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn temp_file_keeps_extension_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::builder().temp_dir(dir.path()).build().unwrap();
        let tmp = write_temp_file(&config, FileType::Html, b"<p>hi</p>")
            .await
            .unwrap();
        assert_eq!(tmp.path().parent().unwrap(), dir.path());
        assert_eq!(tmp.path().extension().unwrap(), "html");
        assert_eq!(std::fs::read(tmp.path()).unwrap(), b"<p>hi</p>");
        let path = tmp.path().to_path_buf();
        drop(tmp);
        assert!(!path.exists());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn large_upload_is_written_completely() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::builder().temp_dir(dir.path()).build().unwrap();
        let bytes: Vec<u8> = (0..8 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        let tmp = write_temp_file(&config, FileType::Pdf, &bytes).await.unwrap();
        assert_eq!(std::fs::read(tmp.path()).unwrap(), bytes);
    }

    #[tokio::test]
    async fn unavailable_converter_is_reported_before_validation() {
        let handle = ConverterHandle::unavailable("probe failed");
        let err = convert_upload(&handle, &ServiceConfig::default(), "x.xyz", b"")
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::ConverterUnavailable { .. }));
    }
}

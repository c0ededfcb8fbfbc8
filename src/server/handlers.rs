use crate::convert::convert_upload;
use crate::error::ConvertError;
use crate::format::SUPPORTED_FORMATS;
use crate::output::{ConversionResult, HealthStatus, ServiceInfo, SupportedFormats};
use crate::server::error::ApiError;
use crate::server::state::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo::new(state.config.model_name.clone()))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let model = state.config.model_name.clone();
    match state.converter.converter() {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "healthy".to_string(),
                model,
                ready: true,
                detail: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "unavailable".to_string(),
                model,
                ready: false,
                detail: Some(e.to_string()),
            }),
        ),
    }
}

pub async fn supported_formats() -> Json<SupportedFormats> {
    Json(SupportedFormats {
        formats: &SUPPORTED_FORMATS,
    })
}

#[tracing::instrument(skip(state, multipart))]
pub async fn convert(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ConversionResult>, ApiError> {
    // Refuse before reading the body when there is nothing to convert with.
    state.converter.converter()?;
    let mut multipart =
        multipart.map_err(|rej| ApiError(ConvertError::InvalidUpload(rej.body_text())))?;

    let limit = state.config.max_upload_bytes;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::from_multipart(e, limit))?;
        tracing::debug!(filename = %filename, bytes = data.len(), "File data received");
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        tracing::warn!("Convert request with no file");
        return Err(ConvertError::MissingFile.into());
    };

    let result = convert_upload(&state.converter, &state.config, &filename, &data).await?;
    Ok(Json(result))
}

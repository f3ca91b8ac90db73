use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::error;
use crate::api::auth::Caller;
use crate::api::{AppState, MAX_UPLOAD_BYTES};
use crate::errors::GatewayError;
use crate::moderation::{ImageUpload, ModerationVerdict};

const FILE_FIELD: &str = "file";

pub async fn moderate_image(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    mut multipart: Multipart,
) -> Result<Json<ModerationVerdict>, GatewayError> {
    state.log_usage(&caller.token, "/moderate");

    let upload = read_upload(&mut multipart).await?;
    let verdict = state.engine.moderate(&upload).await.map_err(|e| {
        error!(provider = state.engine.provider_name(), error = %e, "Moderation failed");
        GatewayError::Processing(e.to_string())
    })?;

    Ok(Json(verdict))
}

async fn read_upload(multipart: &mut Multipart) -> Result<ImageUpload, GatewayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;
        return Ok(ImageUpload::new(bytes, filename));
    }

    Err(GatewayError::InvalidRequest(format!("Missing '{}' field", FILE_FIELD)))
}

fn multipart_error(context: &str, e: MultipartError) -> GatewayError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(format!("limit is {} bytes", MAX_UPLOAD_BYTES))
    } else {
        GatewayError::InvalidRequest(format!("{}: {}", context, e.body_text()))
    }
}

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::sessions::load_session;
use crate::error::ApiError;
use crate::server::AppState;

/// Render the session and download it as PNG
///
/// The grid is recomputed from the source image on every request.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/image.png",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Rendering error"),
    ),
    tag = "Image"
)]
pub async fn handle_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let session = load_session(&state, &id).await?;
    let png_bytes = state.pipeline.render_png_blocking(session).await?;

    tracing::info!(session_id = %id, png_size = png_bytes.len(), "Image rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_LENGTH, png_bytes.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", state.config.download_filename),
            ),
        ],
        png_bytes,
    )
        .into_response())
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use grid_quant::Rgb;
use serde::Deserialize;
use utoipa::ToSchema;

use super::sessions::{session_response, SessionResponse};
use crate::error::{ApiError, ParameterError};
use crate::server::AppState;
use crate::services::{SessionId, SessionStore};

/// New color for one palette entry
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetColorRequest {
    /// Hex color, `#rrggbb` or `#rgb`
    pub color: String,
}

/// Replace one palette color
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/palette/{index}",
    params(
        ("id" = String, Path, description = "Session id"),
        ("index" = usize, Path, description = "Zero-based palette index"),
    ),
    request_body = SetColorRequest,
    responses(
        (status = 200, description = "Updated session state", body = SessionResponse),
        (status = 400, description = "Bad color or index out of range"),
        (status = 404, description = "Session not found"),
    ),
    tag = "Palette"
)]
pub async fn set_palette_color(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    body: Result<Json<SetColorRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let color: Rgb = request.color.parse().map_err(ParameterError::from)?;

    let session = state
        .sessions
        .modify(&SessionId::new(id.as_str()), move |session| {
            Ok(session.set_override(index, color)?)
        })
        .await?;

    tracing::debug!(session_id = %id, index, color = %color, "Palette color set");

    Ok(Json(session_response(session, &state.config).await?))
}

/// Reset the palette to the colors derived from the image
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}/palette",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session state with derived palette", body = SessionResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "Palette"
)]
pub async fn reset_palette(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state
        .sessions
        .modify(&SessionId::new(id.as_str()), |session| {
            session.reset_palette();
            Ok(())
        })
        .await?;

    tracing::debug!(session_id = %id, "Palette reset");

    Ok(Json(session_response(session, &state.config).await?))
}

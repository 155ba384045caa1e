use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::models::{
    AppConfig, DitherMode, GridSpec, InputBounds, PaletteMode, RenderOptions, ResampleFilter,
    SessionSettings,
};
use crate::server::AppState;
use crate::services::{
    quantizer, run_blocking, PixelArtPipeline, Session, SessionId, SessionStore,
};

/// Query parameters for creating a session
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateSessionParams {
    /// Grid columns
    pub width: Option<u32>,
    /// Grid rows
    pub height: Option<u32>,
    /// Number of palette colors
    pub colors: Option<u32>,
    /// `custom` (editable palette) or `auto`
    pub mode: Option<PaletteMode>,
}

/// Partial settings update; omitted fields keep their value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSettingsRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub colors: Option<u32>,
    pub outline: Option<bool>,
    pub resample: Option<ResampleFilter>,
    pub dither: Option<DitherMode>,
    pub mode: Option<PaletteMode>,
}

/// Session state as seen by clients
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    /// Session identifier used in all other endpoints
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub colors: u32,
    pub mode: PaletteMode,
    pub outline: bool,
    pub resample: ResampleFilter,
    /// Dithering that will actually be applied
    pub dither: DitherMode,
    /// Current palette as lowercase `#rrggbb`
    pub palette: Vec<String>,
    /// Palette indices that carry a user edit
    pub overridden: Vec<usize>,
    /// Size of the rendered PNG in pixels
    pub output_width: u32,
    pub output_height: u32,
    /// Accepted ranges for the current mode
    pub bounds: InputBounds,
}

/// Build the response for a session snapshot.
///
/// Custom mode shows the editable palette with overrides; auto mode shows
/// the derived palette it renders with.
pub(crate) async fn session_response(
    session: Session,
    config: &AppConfig,
) -> Result<SessionResponse, ApiError> {
    let settings = *session.settings();
    let overridden = session
        .overrides()
        .keys()
        .copied()
        .filter(|&i| i < settings.color_count as usize)
        .collect();
    let id = session.id().to_string();

    let palette = PixelArtPipeline::current_palette_blocking(session).await?;

    let (output_width, output_height) = config.layout.output_size(settings.grid);

    Ok(SessionResponse {
        id,
        width: settings.grid.width,
        height: settings.grid.height,
        colors: settings.color_count,
        mode: settings.options.palette_mode,
        outline: settings.options.outline,
        resample: settings.options.resample,
        dither: settings.options.effective_dither().into(),
        palette: palette.to_hex(),
        overridden,
        output_width,
        output_height,
        bounds: config.bounds_for(settings.options.palette_mode),
    })
}

/// Look up a session snapshot or fail with 404.
pub(crate) async fn load_session(state: &AppState, id: &str) -> Result<Session, ApiError> {
    state
        .sessions
        .get(&SessionId::new(id))
        .await?
        .ok_or(ApiError::SessionNotFound)
}

/// Upload an image and start a session
///
/// The request body is the raw image file (JPEG, PNG or TIFF). Grid size,
/// color count and palette mode come from the query string and fall back to
/// the configured defaults.
#[utoipa::path(
    post,
    path = "/api/sessions",
    params(CreateSessionParams),
    request_body(content = Vec<u8>, description = "Image file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Session created", body = SessionResponse),
        (status = 400, description = "Invalid parameter or undecodable image"),
        (status = 413, description = "Upload too large"),
    ),
    tag = "Sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    params: Result<Query<CreateSessionParams>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let config = state.config.clone();
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let bytes = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge {
                max: config.max_upload_bytes,
            }
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("empty upload".to_string()));
    }

    let mode = params.mode.unwrap_or(config.render.palette_mode);
    let grid = GridSpec::new(
        params.width.unwrap_or(config.defaults.width),
        params.height.unwrap_or(config.defaults.height),
    )?;
    let options = RenderOptions {
        palette_mode: mode,
        ..config.render
    };
    let settings = SessionSettings::new(
        grid,
        params.colors.unwrap_or(config.defaults.colors),
        options,
    );
    settings.validate(&config.bounds_for(mode))?;

    let upload_len = bytes.len();
    let max_dimension = config.max_image_dimension;
    let source = run_blocking(move || quantizer::decode_image(&bytes, max_dimension)).await?;

    let session = Session::new(SessionId::generate(), Arc::new(source), settings);
    state.sessions.insert(session.clone()).await?;

    tracing::info!(
        session_id = %session.id(),
        upload_bytes = upload_len,
        grid_width = grid.width,
        grid_height = grid.height,
        colors = settings.color_count,
        mode = %mode,
        "Session created"
    );

    let response = session_response(session, &config).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get session settings and current palette
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found"),
    ),
    tag = "Sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    Ok(Json(session_response(session, &state.config).await?))
}

/// Change grid size, color count or render options
///
/// Palette edits are kept. Edits past a reduced color count are hidden and
/// come back when the count grows again.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/settings",
    params(("id" = String, Path, description = "Session id")),
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Updated session state", body = SessionResponse),
        (status = 400, description = "Invalid parameter"),
        (status = 404, description = "Session not found"),
    ),
    tag = "Sessions"
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let config = state.config.clone();

    let session = state
        .sessions
        .modify(&SessionId::new(id.as_str()), move |session| {
            let current = *session.settings();
            let grid = GridSpec::new(
                request.width.unwrap_or(current.grid.width),
                request.height.unwrap_or(current.grid.height),
            )?;
            let options = RenderOptions {
                outline: request.outline.unwrap_or(current.options.outline),
                resample: request.resample.unwrap_or(current.options.resample),
                dither: request.dither.or(current.options.dither),
                palette_mode: request.mode.unwrap_or(current.options.palette_mode),
            };
            let settings = SessionSettings::new(
                grid,
                request.colors.unwrap_or(current.color_count),
                options,
            );
            settings.validate(&config.bounds_for(options.palette_mode))?;
            session.update_settings(settings);
            Ok(())
        })
        .await?;
    let settings = *session.settings();

    tracing::debug!(session_id = %session.id(), ?settings, "Session settings updated");

    Ok(Json(session_response(session, &state.config).await?))
}

/// End a session
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 204, description = "Session removed"),
        (status = 404, description = "Session not found"),
    ),
    tag = "Sessions"
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&SessionId::new(id.as_str())).await? {
        tracing::info!(session_id = %id, "Session removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound)
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grid_quant::{PaletteError, ParseColorError};
use serde_json::json;
use thiserror::Error;

/// A request or CLI argument outside what the renderer accepts.
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("{name} must be at least 1")]
    Zero { name: &'static str },

    #[error("{name} must be between {min} and {max} (got {value})")]
    OutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("grid has {actual} cells, expected {expected}")]
    CellCount { expected: usize, actual: usize },

    #[error("palette index {index} out of range (palette has {len} colors)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{given} palette colors given but only {colors} requested")]
    PaletteTooLong { given: usize, colors: u32 },

    #[error("invalid palette: {0}")]
    Palette(#[from] PaletteError),

    #[error("invalid color: {0}")]
    Color(#[from] ParseColorError),

    #[error("unknown {name} '{value}' (expected {expected})")]
    UnknownOption {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("Label text error: {0}")]
    Text(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Failure anywhere between uploaded bytes and encoded PNG.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found")]
    SessionNotFound,

    #[error("Not found")]
    NotFound,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("Invalid image: {0}")]
    Decode(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload exceeds {max} bytes")]
    PayloadTooLarge { max: usize },

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Decode(e) => ApiError::Decode(e.to_string()),
            PipelineError::InvalidParameter(e) => ApiError::InvalidParameter(e),
            PipelineError::Render(e) => ApiError::Render(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::SessionNotFound | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidParameter(_) | ApiError::Decode(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

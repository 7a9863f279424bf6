use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Body returned for every failure on the model side of the relay.
pub const MODEL_FAILURE_MESSAGE: &str = "Failed to get prediction from model";

/// Body returned when the relay itself is at fault.
pub const INTERNAL_FAILURE_MESSAGE: &str = "Internal server error";

/// Failures while serving a single prediction request.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("No file uploaded")]
    MissingUpload,
    #[error("Invalid upload: {0}")]
    Upload(String),
    #[error("Upload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("Uploaded file is not a valid image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("decoded pixels do not fit the image dimensions: {0}")]
    ImageShape(#[from] ndarray::ShapeError),
    #[error("model server unreachable: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("model server answered HTTP {0}")]
    UpstreamStatus(u16),
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
    #[error("model returned {actual} scores, expected {expected}")]
    PredictionWidth { expected: usize, actual: usize },
    #[error("Internal server error")]
    Blocking,
}

impl RelayError {
    /// Whether the failure happened on the model server side of the relay.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RelayError::Upstream(_)
                | RelayError::UpstreamStatus(_)
                | RelayError::MalformedResponse(_)
                | RelayError::PredictionWidth { .. }
        )
    }

    /// Whether the failure is a broken invariant inside the relay.
    pub fn is_internal(&self) -> bool {
        matches!(self, RelayError::ImageShape(_) | RelayError::Blocking)
    }

    /// Message exposed to clients. Upstream and internal details stay in the logs.
    pub fn public_message(&self) -> String {
        if self.is_upstream() {
            MODEL_FAILURE_MESSAGE.to_string()
        } else if self.is_internal() {
            INTERNAL_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingUpload | RelayError::Upload(_) | RelayError::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::ImageShape(_) | RelayError::Blocking => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.public_message(),
        })
    }
}

/// Startup configuration problems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    InvalidVar { name: &'static str, value: String },
    #[error("model endpoint must not be empty")]
    EmptyEndpoint,
    #[error("at least one class label is required")]
    EmptyLabels,
    #[error("class label at position {0} is blank")]
    BlankLabel(usize),
    #[error("class label {0:?} appears more than once")]
    DuplicateLabel(String),
    #[error("{labels} class labels configured but the model outputs {outputs} scores")]
    WidthMismatch { labels: usize, outputs: usize },
}

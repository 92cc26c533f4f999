use crate::domain::error::DomainError;
use crate::infrastructure::config::ApiMode;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

const REDACTED: &str = "Internal server error";

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::BadGateway(_) => "bad_gateway",
            ApiError::Internal(_) => "internal",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error");
                REDACTED.to_string()
            }
            ApiError::BadGateway(detail) => {
                error!(error = %detail, status = %status, "Upstream failure");
                detail.clone()
            }
            other => {
                warn!(error = %other, kind = other.kind(), status = %status, "Request rejected");
                other.to_string()
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message,
        })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::from_ref(&err)
    }
}

impl ApiError {
    fn from_ref(err: &DomainError) -> Self {
        match err {
            DomainError::UserNotFound | DomainError::PasswordIncorrect => {
                ApiError::Validation(err.to_string())
            }
            DomainError::NotOwner => ApiError::Forbidden(err.to_string()),
            DomainError::PlaceNotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::Validation(msg) => ApiError::Validation(msg.clone()),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            DomainError::Download(_) => ApiError::BadGateway(err.to_string()),
            DomainError::Internal(msg) => ApiError::Internal(msg.clone()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(domain) => ApiError::from_ref(domain),
            None => ApiError::Internal(format!("{:#}", err)),
        }
    }
}

/// Reports a failure in-band under the compat contract: `describe(err)` as a
/// bare JSON string with `status`. The hardened contract uses the envelope.
pub fn in_band<F>(
    mode: &ApiMode,
    status: StatusCode,
    err: anyhow::Error,
    describe: F,
) -> Result<HttpResponse, ApiError>
where
    F: FnOnce(&anyhow::Error) -> String,
{
    if mode.is_hardened() {
        return Err(err.into());
    }
    let message = describe(&err);
    warn!(status = %status, message = %message, "Request failed in-band");
    Ok(HttpResponse::build(status).json(message))
}

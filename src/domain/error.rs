use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found in DB")]
    UserNotFound,
    #[error("Password incorrect for the current user")]
    PasswordIncorrect,
    #[error("Place not found: {0}")]
    PlaceNotFound(String),
    #[error("Not authorized to make changes")]
    NotOwner,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Download failed: {0}")]
    Download(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

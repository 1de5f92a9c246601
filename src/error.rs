use serde::ser::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThumbnailError {
    #[error("Failed to generate thumbnail: {0}")]
    Decode(String),
    #[error("Failed to convert thumbnail: {0}")]
    Encode(String),
    #[error("No media found in album")]
    NoMediaFound,
}

impl ThumbnailError {
    /// Human-readable summary without the library message.
    pub fn summary(&self) -> &'static str {
        match self {
            ThumbnailError::Decode(_) => "Failed to generate thumbnail",
            ThumbnailError::Encode(_) => "Failed to convert thumbnail",
            ThumbnailError::NoMediaFound => "No media found in album",
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ThumbnailError::Decode(msg) | ThumbnailError::Encode(msg) => Some(msg),
            ThumbnailError::NoMediaFound => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MethodError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Invalid media type: {0}")]
    InvalidType(String),
    #[error("Could not locate {0} directory")]
    Directory(&'static str),
    #[error("Could not locate {0} directory")]
    Path(&'static str),
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),
    #[error("Method not implemented: {0}")]
    NotImplemented(String),
    /// The host failed to run or answer the call.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MethodError {
    pub fn code(&self) -> &'static str {
        match self {
            MethodError::InvalidArguments(_) => "INVALID_ARGUMENTS",
            MethodError::InvalidType(_) => "INVALID_TYPE",
            MethodError::Directory(_) => "DIRECTORY_ERROR",
            MethodError::Path(_) => "PATH_ERROR",
            MethodError::Thumbnail(_) => "THUMBNAIL_ERROR",
            MethodError::NotImplemented(_) => "NOT_IMPLEMENTED",
            MethodError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn message(&self) -> String {
        match self {
            MethodError::Thumbnail(e) => e.summary().to_string(),
            other => other.to_string(),
        }
    }

    pub fn details(&self) -> Option<ErrorDetails<'_>> {
        match self {
            MethodError::Thumbnail(e) => e.detail().map(|message| ErrorDetails { message }),
            _ => None,
        }
    }
}

#[derive(Debug, serde::Serialize, PartialEq, Eq)]
pub struct ErrorDetails<'a> {
    pub message: &'a str,
}

#[derive(serde::Serialize)]
struct ErrorPayload<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<ErrorDetails<'a>>,
}

// Wire shape: {code, message, details?: {message}}
impl Serialize for MethodError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ErrorPayload {
            code: self.code(),
            message: self.message(),
            details: self.details(),
        }
        .serialize(serializer)
    }
}

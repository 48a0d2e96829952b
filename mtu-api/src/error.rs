use anyhow::{anyhow, Context};
use serde_json::json;

/// Message shown to users when the server did not give a usable one
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, please try again";

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not found")]
    NotFound,

    #[error("Comment content must not be empty")]
    InvalidContent,

    #[error("Exactly one content item must be referenced")]
    InvalidTarget,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidContent => StatusCode::BAD_REQUEST,
            Error::InvalidTarget => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Human-readable message, suitable for showing in an alert
    pub fn message(&self) -> String {
        match self {
            Error::Unknown(msg) if msg.trim().is_empty() => String::from(GENERIC_ERROR_MESSAGE),
            Error::Unknown(msg) => msg.clone(),
            Error::Unauthorized => String::from("Please log in first"),
            Error::PermissionDenied => String::from("You are not allowed to do this"),
            Error::NotFound => String::from("This item no longer exists"),
            Error::InvalidContent => String::from("Comment content must not be empty"),
            Error::InvalidTarget => String::from("Invalid content reference"),
            Error::NullByteInString(_) => String::from("Text contains an invalid character"),
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        let message = self.message();
        serde_json::to_vec(&match self {
            Error::Unknown(_) => json!({
                "message": message,
                "type": "unknown",
            }),
            Error::Unauthorized => json!({
                "message": message,
                "type": "unauthorized",
            }),
            Error::PermissionDenied => json!({
                "message": message,
                "type": "permission-denied",
            }),
            Error::NotFound => json!({
                "message": message,
                "type": "not-found",
            }),
            Error::InvalidContent => json!({
                "message": message,
                "type": "invalid-content",
            }),
            Error::InvalidTarget => json!({
                "message": message,
                "type": "invalid-target",
            }),
            Error::NullByteInString(s) => json!({
                "message": message,
                "type": "null-byte",
                "string": s,
            }),
        })
        .expect("serializing error contents")
    }

    /// Parses an error body returned by the server.
    ///
    /// Bodies without a known `type` tag are treated as `Unknown`, carrying
    /// their `error` or `message` string when there is one.
    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        if !data.is_object() {
            return Err(anyhow!("error contents is not an object"));
        }
        let message = || {
            String::from(
                data.get("error")
                    .or_else(|| data.get("message"))
                    .and_then(|msg| msg.as_str())
                    .unwrap_or(""),
            )
        };
        Ok(match data.get("type").and_then(|t| t.as_str()) {
            Some("unauthorized") => Error::Unauthorized,
            Some("permission-denied") => Error::PermissionDenied,
            Some("not-found") => Error::NotFound,
            Some("invalid-content") => Error::InvalidContent,
            Some("invalid-target") => Error::InvalidTarget,
            Some("null-byte") => Error::NullByteInString(String::from(
                data.get("string")
                    .and_then(|s| s.as_str())
                    .ok_or_else(|| anyhow!("error is a null-byte-in-string without a string"))?,
            )),
            Some("unknown") | None => Error::Unknown(message()),
            Some(t) => return Err(anyhow!("error contents has unknown type {t:?}")),
        })
    }
}

use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend url `{url}`: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Local(#[from] StoreError),
}

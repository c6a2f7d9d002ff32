use thiserror::Error;

use crate::config::REPLY_KEY_LIMIT;

/// Transport failures while calling a source
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("source returned status {0}")]
    Status(u16),

    #[error("source returned an empty body")]
    EmptyBody,
}

/// Why a source reply failed validation
#[derive(Debug, Error)]
pub enum InvalidReply {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply is not a JSON object")]
    NotAnObject,

    #[error("reply carries {0} top-level keys, limit is {REPLY_KEY_LIMIT}")]
    TooManyKeys(usize),

    #[error("required key `{0}` is missing")]
    MissingKey(&'static str),

    #[error("key `{0}` must be a string")]
    NotAString(&'static str),
}

use thiserror::Error;

/// Remote error codes with a dedicated local meaning.
/// Every other code is carried through as `PlaidError::Remote`.
pub mod remote_code {
    pub const BAD_ACCESS_TOKEN: i64 = 1105;
    pub const INSTITUTION_DOWN: i64 = 1300;
    pub const ITEM_NOT_FOUND:   i64 = 1600;
}

#[derive(Error, Debug)]
pub enum PlaidError {
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("JSON decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Institution is down")]
    InstitutionDown,

    #[error("Bad access token")]
    BadAccessToken,

    #[error("Item not found")]
    ItemNotFound,

    #[error("Remote error {code}: {}", .message.as_deref().unwrap_or("no message"))]
    Remote { code: i64, message: Option<String> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid auth state: expected {expected}, was {actual}")]
    InvalidAuthState { expected: &'static str, actual: &'static str },

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl PlaidError {
    /// Translate a remote `code`/`message` pair. Only the code decides the variant.
    pub fn from_remote(code: i64, message: Option<String>) -> Self {
        match code {
            remote_code::INSTITUTION_DOWN => Self::InstitutionDown,
            remote_code::BAD_ACCESS_TOKEN => Self::BadAccessToken,
            remote_code::ITEM_NOT_FOUND   => Self::ItemNotFound,
            _ => Self::Remote { code, message },
        }
    }

    /// True for errors reported by the remote service rather than produced locally.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::InstitutionDown | Self::BadAccessToken | Self::ItemNotFound | Self::Remote { .. }
        )
    }
}

impl From<serde_json::Error> for PlaidError {
    fn from(e: serde_json::Error) -> Self {
        Self::DecodingFailed(e.to_string())
    }
}

pub type PlaidResult<T> = Result<T, PlaidError>;

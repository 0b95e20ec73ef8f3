use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrexError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("unknown resource: {0}")]
    UnknownResource(String),

    #[error("brex api returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("brex api request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    DataShape(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid template '{pattern}': {reason}")]
    InvalidTemplate { pattern: String, reason: String },
}

/// Coarse classification used by the protocol layer to pick an error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Upstream,
    DataShape,
    Config,
}

impl BrexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnknownResource(_) => ErrorKind::NotFound,
            Self::Upstream { status: 404, .. } => ErrorKind::NotFound,
            Self::Upstream { .. } | Self::Http(_) => ErrorKind::Upstream,
            Self::DataShape(_) => ErrorKind::DataShape,
            Self::Config(_) | Self::InvalidTemplate { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, BrexError>;

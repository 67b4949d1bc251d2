use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("invalid locale '{0}', expected one of: en, cn, mm, th")]
    InvalidLocale(String),

    #[error("invalid URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request was superseded by a newer one, or its owner went away.
    #[error("request cancelled")]
    Cancelled,

    #[error("cart item '{0}' not found")]
    CartItemNotFound(u64),

    #[error("{0}")]
    Other(String),
}

impl StorefrontError {
    /// Whether this error represents intentional supersession rather than failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StorefrontError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;

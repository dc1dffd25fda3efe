use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvgtintError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Resource error: {0}")]
    Resource(String),

    #[error("Logging setup error: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SvgtintError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SvgtintError::Config(msg.into())
    }

    pub fn resource<S: Into<String>>(msg: S) -> Self {
        SvgtintError::Resource(msg.into())
    }

    pub fn logging<S: Into<String>>(msg: S) -> Self {
        SvgtintError::Logging(msg.into())
    }
}

/// Result type alias for svgtint operations
pub type SvgtintResult<T> = Result<T, SvgtintError>;

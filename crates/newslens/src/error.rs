use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewslensError {
    #[error("Index error: {0}")]
    Index(#[from] crate::client::IndexError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Init Logging error: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, NewslensError>;

pub type SlideshowResult<T> = Result<T, SlideshowError>;

/// Failures at the fallible edges: configuration and fragment fetches.
/// Nothing on the page-facing path ever surfaces one of these.
#[derive(thiserror::Error, Debug)]
pub enum SlideshowError {
    #[error("config error: {0}")]
    Config(String),

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SlideshowError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }
}

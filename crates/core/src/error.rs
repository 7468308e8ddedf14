use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnpaError {
    #[error("Missing pipeline option: {0}")]
    MissingOption(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidOption {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Window duration must be non-negative, got {0}s")]
    NegativeDuration(i64),

    #[error("Window [{start_time}s, +{duration}s) overflows epoch milliseconds")]
    WindowOverflow { start_time: i64, duration: i64 },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, EnpaError>;

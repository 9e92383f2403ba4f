use dash_domain::WindowError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Free plan limit reached: {current} of {limit} active events")]
    QuotaExceeded { limit: usize, current: usize },
    #[error("Invalid window: {0}")]
    InvalidWindow(String),
}

impl From<WindowError> for CoreError {
    fn from(err: WindowError) -> Self {
        CoreError::InvalidWindow(err.to_string())
    }
}

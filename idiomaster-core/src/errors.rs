use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("parse error: {0}")]
    Parse(&'static str),
    #[error("storage error: {0}")]
    Storage(&'static str),
}

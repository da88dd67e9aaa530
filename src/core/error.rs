use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum KmerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("sequence of length {len} is shorter than k = {k}")]
    InvalidLength { len: usize, k: usize },

    #[error("index {index} is outside the profile of {size} k-mers")]
    InvalidIndex { index: usize, size: usize },

    #[error("invalid alphabet usage: {0}")]
    InvalidAlphabet(String),

    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("malformed record #{record}: {reason}")]
    Parse { record: u64, reason: String },

    #[error("record source failed: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, KmerError>;

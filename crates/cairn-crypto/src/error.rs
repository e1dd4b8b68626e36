/// Errors from codec operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The input is not a valid zlib stream.
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// The compressor failed to write its output.
    #[error("compression failed: {0}")]
    CompressionFailed(String),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

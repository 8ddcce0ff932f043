/// Errors that can occur while composing, encoding, or decoding an imsg.
#[derive(Debug, thiserror::Error)]
pub enum ImsgError {
    /// The payload plus the header would exceed the maximum message size.
    #[error("payload too large ({size} bytes, max {max})")]
    DataTooLarge { size: usize, max: usize },

    /// A decoded header declared a total length outside the valid range.
    #[error("message length ({length} bytes) out of bounds ({min} - {max} bytes)")]
    LengthOutOfBounds { length: u16, min: u16, max: u16 },

    /// The source ended before the payload promised by the header was read.
    #[error("insufficient data (expected {expected} bytes, read {read})")]
    InsufficientData { expected: usize, read: usize },

    /// An I/O error occurred on the underlying byte source or sink.
    #[error("imsg I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImsgError>;

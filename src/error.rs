use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The field or the engine was set up with unusable parameters.
    Configuration,
    /// Caller supplied input that cannot be shared or combined.
    Validation,
    /// Not enough distinct shares to attempt a reconstruction.
    InsufficientShares,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("field width must be between {min} and {max} bits, got {bits}")]
    UnsupportedBits { bits: u32, min: u8, max: u8 },
    #[error("polynomial {polynomial} is not primitive for GF(2^{bits}): generator cycle has length {cycle}")]
    NotPrimitive { bits: u8, polynomial: u32, cycle: usize },
    #[error("padding must be a multiple of no more than {max} bits, got {multiple}")]
    PaddingTooLarge { multiple: usize, max: usize },
    #[error("share id radix must be between 2 and 36, got {0}")]
    UnsupportedRadix(u32),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("share id must be an integer between 1 and {max}, inclusive, got {id}")]
    ShareIdOutOfRange { id: u32, max: u32 },
    #[error("invalid hex character {0:?}")]
    InvalidHex(char),
    #[error("invalid binary character {0:?}")]
    InvalidBinary(char),
    #[error("threshold must be between 2 and the number of shares ({num_shares}), got {threshold}")]
    InvalidThreshold { threshold: u32, num_shares: u32 },
    #[error("number of shares must be between 2 and {max}, got {num_shares}")]
    ShareCountOutOfRange { num_shares: u32, max: u32 },
    #[error("{value} is not an element of a field with largest element {max}")]
    NotAnElement { value: u32, max: u32 },
    #[error("got {xs} sample positions but {ys} sample values")]
    PointCountMismatch { xs: usize, ys: usize },
    #[error("malformed share {0:?}")]
    MalformedShare(String),
    #[error("mixed shares: expected {expected}-bit shares, found {found}-bit")]
    MixedBits { expected: u8, found: u8 },
    #[error("conflicting shares for id {0}")]
    DuplicateShare(u32),
    #[error("shares carry a different number of chunks")]
    InconsistentShares,
    #[error("reconstructed secret is not valid UTF-8")]
    InvalidUtf8,
    #[error("secret must not be empty")]
    EmptySecret,
    #[error("random secrets must be between 2 and 65536 bits, got {0}")]
    RandomBits(usize),

    #[error("not enough shares: need at least 2 distinct shares, got {0}")]
    InsufficientShares(usize),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedBits { .. }
            | Error::NotPrimitive { .. }
            | Error::PaddingTooLarge { .. }
            | Error::UnsupportedRadix(_)
            | Error::InvalidSettings(_) => ErrorKind::Configuration,
            Error::InsufficientShares(_) => ErrorKind::InsufficientShares,
            _ => ErrorKind::Validation,
        }
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(_: std::string::FromUtf8Error) -> Self {
        Error::InvalidUtf8
    }
}

impl From<json::Error> for Error {
    fn from(err: json::Error) -> Self {
        Error::InvalidSettings(err.to_string())
    }
}

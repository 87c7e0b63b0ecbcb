use thiserror::Error;

/// Error type for BER encoding/decoding operations
///
/// Every decode-path function returns one of these to its immediate caller.
/// A partially built packet is never returned alongside an error.
#[derive(Error, Debug)]
pub enum BerError {
    /// Transport read or write failure, propagated verbatim
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Declared length exceeds the bytes that are actually available
    #[error("Truncated input: need {needed} bytes, have {available}")]
    TruncatedInput { needed: usize, available: usize },

    /// Long-form length with zero length bytes, or length bytes that cannot be decoded
    #[error("Malformed length: {0}")]
    MalformedLength(String),

    /// High-tag-number form (tag bits all set) or a tag number above 30
    #[error("Unsupported tag: 0x{0:02X}")]
    UnsupportedTag(u8),

    /// Declared content length is larger than the configured maximum
    #[error("Length {length} exceeds limit of {max} bytes")]
    LengthExceedsLimit { length: usize, max: usize },

    /// Constructed packets nested deeper than the configured maximum
    #[error("Nesting exceeds maximum depth of {max}")]
    NestingTooDeep { max: usize },

    #[error("Timeout")]
    Timeout,
}

impl BerError {
    /// Check whether the error describes a malformed message rather than a transport failure
    ///
    /// The directory-protocol layer aborts the single operation on a malformed
    /// message; transport errors usually tear down the whole connection.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            BerError::TruncatedInput { .. }
                | BerError::MalformedLength(_)
                | BerError::UnsupportedTag(_)
                | BerError::LengthExceedsLimit { .. }
                | BerError::NestingTooDeep { .. }
        )
    }

    /// Shorthand for [`BerError::TruncatedInput`]
    pub fn truncated(needed: usize, available: usize) -> Self {
        BerError::TruncatedInput { needed, available }
    }
}

/// Result type alias for BER operations
pub type BerResult<T> = Result<T, BerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_classification() {
        assert!(BerError::truncated(4, 2).is_malformed());
        assert!(BerError::MalformedLength("x".to_string()).is_malformed());
        assert!(BerError::UnsupportedTag(0x1F).is_malformed());
        assert!(!BerError::Timeout.is_malformed());

        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        assert!(!BerError::from(io).is_malformed());
    }

    #[test]
    fn test_error_display() {
        let err = BerError::truncated(10, 3);
        assert_eq!(err.to_string(), "Truncated input: need 10 bytes, have 3");
        assert_eq!(BerError::UnsupportedTag(0x1F).to_string(), "Unsupported tag: 0x1F");
    }
}

//! FormKey errors.

/// A FormKey error.
#[derive(Debug)]
pub enum Error {
    /// A process-wide key was configured with zero bytes.
    EmptyKey,
    /// A required input was missing or empty.
    MissingField(&'static str),
    /// The input was not valid URL-safe base64.
    Encoding(base64ct::Error),
    /// The decoded input has the wrong length.
    InvalidLength {
        /// The expected length in bytes.
        expected: usize,
        /// The found length in bytes.
        found: usize,
    },
    /// Bincode serialization/deserialization error.
    Bincode(bincode::Error),
    /// Opaque symmetric encryption error.
    Symmetric,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "key material must not be empty"),
            Self::MissingField(field) => write!(f, "missing or empty field: {field}"),
            Self::Encoding(e) => write!(f, "base64 decoding error: {e}"),
            Self::InvalidLength { expected, found } => {
                write!(f, "wrong length, expected: {expected}, found: {found}")
            }
            Self::Bincode(e) => write!(f, "Bincode error: {e}"),
            Self::Symmetric => write!(f, "symmetric encryption operation error"),
        }
    }
}

impl Error {
    /// Whether the error was caused by caller input rather than by the system.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MissingField(_) | Self::Encoding(_) | Self::InvalidLength { .. }
        )
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Self::Bincode(e)
    }
}

impl From<base64ct::Error> for Error {
    fn from(e: base64ct::Error) -> Self {
        Self::Encoding(e)
    }
}

impl From<aead::Error> for Error {
    fn from(_: aead::Error) -> Self {
        Self::Symmetric
    }
}

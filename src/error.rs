//! Error handling for the NTRU engine.
//!
//! A single descriptive error type covers parameter violations, codec
//! failures and decryption-integrity failures. Recoverable conditions
//! (non-invertible candidates, rejection-sampling restarts) never surface
//! here; the engine retries them internally.

pub type Result<T> = std::result::Result<T, NtruError>;

/// Library-wide error carrying a descriptive message.
///
/// Decryption failures deliberately collapse into one opaque message so the
/// error cannot be used as a padding oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NtruError(pub String);

impl std::fmt::Display for NtruError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NtruError {}

impl From<std::io::Error> for NtruError {
    fn from(e: std::io::Error) -> Self {
        NtruError(format!("i/o failure: {}", e))
    }
}

macro_rules! ntru_err {
    ($($arg:tt)*) => {
        $crate::error::NtruError(format!($($arg)*))
    };
}

pub(crate) use ntru_err;

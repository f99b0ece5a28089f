/// Errors returned by share generation, reconstruction and the text codec.
///
/// Every variant describes a caller input problem; none of them is fatal.
/// Reconstructing from fewer shares than the threshold is *not* an error: it
/// yields a field element unrelated to the secret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("threshold must be at least 2, got {threshold}")]
    ThresholdTooSmall { threshold: usize },

    #[error("threshold {threshold} exceeds the {shares} shares requested, the secret would be irrecoverable")]
    ThresholdExceedsShares { threshold: usize, shares: u64 },

    #[error("{shares} shares do not fit in the field 2^{exponent} - 1")]
    TooManyShares { shares: u64, exponent: u32 },

    #[error("2^{0} - 1 is not a supported Mersenne prime")]
    UnsupportedField(u32),

    #[error("secret is not an element of the field 2^{exponent} - 1")]
    SecretOutOfRange { exponent: u32 },

    #[error("at least {required} shares are required, got {got}")]
    InsufficientShares { required: usize, got: usize },

    #[error("duplicate share identifier x = {0}")]
    DuplicateShare(u64),

    #[error("share identifier x = {0} is not a non-zero field element")]
    InvalidShare(u64),

    #[error("only {issued} of the {threshold} shares needed were issued, the secret is unrecoverable")]
    Unrecoverable { issued: u64, threshold: usize },

    #[error("malformed share: {0}")]
    MalformedShare(&'static str),

    #[error("text starting with a NUL byte cannot be encoded losslessly")]
    Unencodable,

    #[error("recovered value is not valid UTF-8 text")]
    Decoding,
}

impl Error {
    /// Whether the error rejects the sharing parameters themselves rather
    /// than the shares handed in.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::ThresholdTooSmall { .. }
                | Error::ThresholdExceedsShares { .. }
                | Error::TooManyShares { .. }
                | Error::UnsupportedField(_)
                | Error::SecretOutOfRange { .. }
        )
    }
}

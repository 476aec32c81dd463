use thiserror::Error;

#[derive(Debug, Error)]
pub enum EciesError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "Key derivation produces {kdf_digest_length} bytes, not enough envelope key material for a {cipher_key_length}-byte cipher key and MAC key"
    )]
    InsufficientKeyMaterial {
        cipher_key_length: usize,
        kdf_digest_length: usize,
    },

    #[error("KDF input too large: {what} is {length} bytes")]
    KdfInputTooLarge { what: &'static str, length: usize },

    /// Reserved for key generation failures. `OsRng`-backed generation on
    /// the supported curves is infallible, so nothing raises this today.
    #[error("Ephemeral key generation failed: {0}")]
    KeyGen(String),

    #[error("ECDH key agreement failed: {0}")]
    Agreement(String),

    #[error("Invalid ephemeral public key: {0}")]
    InvalidPoint(String),

    #[error("Encoded ephemeral key length mismatch: expected {expected} bytes, got {actual}")]
    EncodingLengthMismatch { expected: usize, actual: usize },

    #[error("Digest error: {0}")]
    Digest(String),

    #[error("Symmetric cipher overflowed the body region: needed {needed} bytes, capacity {capacity}")]
    CipherOverflow { needed: usize, capacity: usize },

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("MAC tag verification failed")]
    MacMismatch,

    #[error("Allocation failed: {0}")]
    AllocationFailure(String),
}

/// Coarse category of an [`EciesError`], for callers that branch on the kind
/// of failure rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    InsufficientKeyMaterial,
    KdfInputTooLarge,
    KeyGen,
    Agreement,
    InvalidPoint,
    EncodingLengthMismatch,
    Digest,
    CipherOverflow,
    DecryptionFailed,
    MacMismatch,
    AllocationFailure,
}

impl EciesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::InsufficientKeyMaterial { .. } => ErrorKind::InsufficientKeyMaterial,
            Self::KdfInputTooLarge { .. } => ErrorKind::KdfInputTooLarge,
            Self::KeyGen(_) => ErrorKind::KeyGen,
            Self::Agreement(_) => ErrorKind::Agreement,
            Self::InvalidPoint(_) => ErrorKind::InvalidPoint,
            Self::EncodingLengthMismatch { .. } => ErrorKind::EncodingLengthMismatch,
            Self::Digest(_) => ErrorKind::Digest,
            Self::CipherOverflow { .. } => ErrorKind::CipherOverflow,
            Self::DecryptionFailed(_) => ErrorKind::DecryptionFailed,
            Self::MacMismatch => ErrorKind::MacMismatch,
            Self::AllocationFailure(_) => ErrorKind::AllocationFailure,
        }
    }
}

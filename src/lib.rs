mod agreement;
mod cipher;
pub mod context;
pub mod cryptogram;
pub mod ecies;
pub mod error;
pub mod kdf;
pub mod keys;
mod mac;
mod secret;
pub mod types;

pub use context::{EciesContext, SuiteConfig};
pub use cryptogram::Cryptogram;
pub use ecies::{decrypt, decrypt_bytes, encrypt};
pub use error::{EciesError, ErrorKind};
pub use keys::RecipientKey;
pub use types::{
    CipherSuite, Curve, HashAlgorithm, AES_BLOCK_LENGTH, AES_GCM_NONCE_LENGTH,
    AES_GCM_TAG_LENGTH, KDF_MAX_LENGTH,
};

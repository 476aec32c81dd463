//! Suite identifiers and the fixed lengths each one implies.

use serde::{Deserialize, Serialize};

/// AES block size in bytes.
pub const AES_BLOCK_LENGTH: usize = 16;

/// AES-GCM nonce length in bytes (96 bits).
pub const AES_GCM_NONCE_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// Upper bound on every KDF length input (output, shared secret, shared info).
/// Guards counter and length arithmetic; no real caller comes close.
pub const KDF_MAX_LENGTH: usize = 1 << 30;

/// Elliptic curves an [`EciesContext`](crate::EciesContext) can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    /// NIST P-256 (secp256r1)
    #[serde(rename = "p-256")]
    P256,
    /// NIST P-384 (secp384r1)
    #[serde(rename = "p-384")]
    P384,
}

impl Curve {
    /// Degree of the curve's field in bits.
    pub fn degree(self) -> usize {
        match self {
            Curve::P256 => 256,
            Curve::P384 => 384,
        }
    }

    /// Length of a raw ECDH shared secret: `ceil(degree / 8)`.
    pub fn shared_secret_length(self) -> usize {
        (self.degree() + 7) / 8
    }

    /// Length of a compressed SEC1 point: one tag byte plus the x coordinate.
    pub fn compressed_point_length(self) -> usize {
        1 + self.shared_secret_length()
    }
}

/// Hash functions used for the KDF and for HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "sha-256")]
    Sha256,
    #[serde(rename = "sha-384")]
    Sha384,
    #[serde(rename = "sha-512")]
    Sha512,
}

impl HashAlgorithm {
    /// Digest (and HMAC tag) length in bytes.
    pub fn output_length(self) -> usize {
        match self {
            HashAlgorithm::Sha256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 => 64,
        }
    }
}

/// Symmetric cipher used for the cryptogram body. Every suite runs with an
/// all-zero IV; safety rests on each envelope key being used exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherSuite {
    /// AES-128 in CBC mode with PKCS#7 padding.
    #[serde(rename = "aes-128-cbc")]
    Aes128Cbc,
    /// AES-256 in CBC mode with PKCS#7 padding.
    #[serde(rename = "aes-256-cbc")]
    Aes256Cbc,
    /// AES-128 in CTR mode (128-bit big-endian counter).
    #[serde(rename = "aes-128-ctr")]
    Aes128Ctr,
    /// AES-256 in CTR mode (128-bit big-endian counter).
    #[serde(rename = "aes-256-ctr")]
    Aes256Ctr,
    /// AES-256-GCM; the 16-byte tag is appended to the body.
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl CipherSuite {
    pub fn key_length(self) -> usize {
        match self {
            CipherSuite::Aes128Cbc | CipherSuite::Aes128Ctr => 16,
            CipherSuite::Aes256Cbc | CipherSuite::Aes256Ctr | CipherSuite::Aes256Gcm => 32,
        }
    }

    pub fn iv_length(self) -> usize {
        match self {
            CipherSuite::Aes256Gcm => AES_GCM_NONCE_LENGTH,
            _ => AES_BLOCK_LENGTH,
        }
    }

    /// Cipher block size as the body layout sees it; stream modes report 1.
    pub fn block_length(self) -> usize {
        match self {
            CipherSuite::Aes128Cbc | CipherSuite::Aes256Cbc => AES_BLOCK_LENGTH,
            CipherSuite::Aes128Ctr | CipherSuite::Aes256Ctr | CipherSuite::Aes256Gcm => 1,
        }
    }

    /// Whether the mode pads its input (CBC) or is length-preserving.
    pub fn is_padded(self) -> bool {
        self.block_length() > 1
    }

    /// Body region length for a plaintext of `plaintext_length` bytes.
    ///
    /// PKCS#7 always adds between 1 and `block_length` bytes, so a plaintext
    /// that is already a whole number of blocks gains one full block. Stream
    /// modes keep the length, plus the tag for GCM.
    pub fn body_length(self, plaintext_length: usize) -> usize {
        match self {
            CipherSuite::Aes128Cbc | CipherSuite::Aes256Cbc => {
                let block = self.block_length();
                plaintext_length + (block - plaintext_length % block)
            }
            CipherSuite::Aes128Ctr | CipherSuite::Aes256Ctr => plaintext_length,
            CipherSuite::Aes256Gcm => plaintext_length + AES_GCM_TAG_LENGTH,
        }
    }
}

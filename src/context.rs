//! Per-recipient ECIES context and the suite configuration it is built from.

use serde::{Deserialize, Serialize};

use crate::cryptogram::Cryptogram;
use crate::error::EciesError;
use crate::keys::RecipientKey;
use crate::types::{CipherSuite, Curve, HashAlgorithm};

/// Cipher suite selection, loadable from JSON.
///
/// ```json
/// { "curve": "p-256", "cipher": "aes-256-cbc", "mac_hash": "sha-512", "kdf_hash": "sha-512" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub curve: Curve,
    pub cipher: CipherSuite,
    pub mac_hash: HashAlgorithm,
    pub kdf_hash: HashAlgorithm,
    /// Bytes of envelope key material to derive. Defaults to the KDF hash
    /// output length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf_digest_length: Option<usize>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            curve: Curve::P256,
            cipher: CipherSuite::Aes256Cbc,
            mac_hash: HashAlgorithm::Sha512,
            kdf_hash: HashAlgorithm::Sha512,
            kdf_digest_length: None,
        }
    }
}

impl SuiteConfig {
    pub fn from_json(json: &str) -> Result<Self, EciesError> {
        serde_json::from_str(json)
            .map_err(|e| EciesError::InvalidArgument(format!("suite config: {}", e)))
    }
}

/// Everything needed to seal to, or open for, one recipient identity.
///
/// Immutable once built and safe to share across threads; every
/// encrypt/decrypt call creates its own primitive state.
#[derive(Debug, Clone)]
pub struct EciesContext {
    key: RecipientKey,
    cipher: CipherSuite,
    mac_hash: HashAlgorithm,
    kdf_hash: HashAlgorithm,
    envelope_key_length: usize,
    kdf_digest_length: usize,
}

impl EciesContext {
    /// Build a context for `key` under `config`.
    ///
    /// The key must be on `config.curve`. The envelope key length is the
    /// curve's compressed point length.
    pub fn new(key: RecipientKey, config: &SuiteConfig) -> Result<Self, EciesError> {
        if key.curve() != config.curve {
            return Err(EciesError::InvalidArgument(format!(
                "key is on {:?} but the suite expects {:?}",
                key.curve(),
                config.curve
            )));
        }
        Ok(Self {
            envelope_key_length: config.curve.compressed_point_length(),
            kdf_digest_length: config
                .kdf_digest_length
                .unwrap_or_else(|| config.kdf_hash.output_length()),
            key,
            cipher: config.cipher,
            mac_hash: config.mac_hash,
            kdf_hash: config.kdf_hash,
        })
    }

    /// Override the expected encoded ephemeral key length.
    pub fn with_envelope_key_length(mut self, length: usize) -> Self {
        self.envelope_key_length = length;
        self
    }

    /// Override how many bytes of envelope key material the KDF produces.
    pub fn with_kdf_digest_length(mut self, length: usize) -> Self {
        self.kdf_digest_length = length;
        self
    }

    pub fn key(&self) -> &RecipientKey {
        &self.key
    }

    pub fn curve(&self) -> Curve {
        self.key.curve()
    }

    pub fn cipher(&self) -> CipherSuite {
        self.cipher
    }

    pub fn mac_hash(&self) -> HashAlgorithm {
        self.mac_hash
    }

    pub fn kdf_hash(&self) -> HashAlgorithm {
        self.kdf_hash
    }

    pub fn envelope_key_length(&self) -> usize {
        self.envelope_key_length
    }

    pub fn kdf_digest_length(&self) -> usize {
        self.kdf_digest_length
    }

    /// MAC tag length, fixed by the MAC hash.
    pub fn mac_length(&self) -> usize {
        self.mac_hash.output_length()
    }

    /// Fail unless the KDF output covers both the cipher key and the MAC key.
    pub(crate) fn check_key_material(&self) -> Result<(), EciesError> {
        let cipher_key_length = self.cipher.key_length();
        if cipher_key_length * 2 > self.kdf_digest_length {
            return Err(EciesError::InsufficientKeyMaterial {
                cipher_key_length,
                kdf_digest_length: self.kdf_digest_length,
            });
        }
        Ok(())
    }

    /// Seal `plaintext` to this context's recipient.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Cryptogram, EciesError> {
        crate::ecies::encrypt(self, plaintext)
    }

    /// Open `cryptogram` with this context's private key.
    pub fn decrypt(&self, cryptogram: &Cryptogram) -> Result<Vec<u8>, EciesError> {
        crate::ecies::decrypt(self, cryptogram)
    }
}

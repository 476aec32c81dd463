//! Envelope key material: the per-message secret split into cipher and MAC keys.

use zeroize::Zeroizing;

use crate::error::EciesError;

/// KDF output for one encrypt or decrypt call.
///
/// Layout: `[cipher_key: k][mac_key: k][unused tail]` where `k` is the cipher
/// key length. The buffer is scrubbed when dropped, which covers normal
/// returns, `?` early returns and unwinding alike.
pub(crate) struct EnvelopeKey {
    material: Zeroizing<Vec<u8>>,
    key_length: usize,
}

impl EnvelopeKey {
    pub(crate) fn new(
        material: Zeroizing<Vec<u8>>,
        key_length: usize,
    ) -> Result<Self, EciesError> {
        if material.len() < key_length * 2 {
            return Err(EciesError::InsufficientKeyMaterial {
                cipher_key_length: key_length,
                kdf_digest_length: material.len(),
            });
        }
        Ok(Self {
            material,
            key_length,
        })
    }

    pub(crate) fn cipher_key(&self) -> &[u8] {
        &self.material[..self.key_length]
    }

    pub(crate) fn mac_key(&self) -> &[u8] {
        &self.material[self.key_length..self.key_length * 2]
    }
}

impl std::fmt::Debug for EnvelopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvelopeKey")
            .field("length", &self.material.len())
            .finish_non_exhaustive()
    }
}

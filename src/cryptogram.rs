//! Cryptogram container.
//!
//! Wire format: `[ephemeral public key: K][ciphertext body: B][MAC tag: M]`
//! where K is the context's envelope key length, M the MAC digest length and
//! B the remainder. Region bounds are fixed at allocation, and region bytes
//! can only be written inside the crate while a cryptogram is being built.

use std::ops::Range;

use crate::context::EciesContext;
use crate::error::EciesError;

/// One contiguous buffer split into key, body and MAC regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cryptogram {
    data: Vec<u8>,
    key_length: usize,
    body_length: usize,
    mac_length: usize,
}

impl Cryptogram {
    /// Allocate a zeroed cryptogram with the given region lengths.
    pub fn allocate(
        key_length: usize,
        mac_length: usize,
        body_length: usize,
    ) -> Result<Self, EciesError> {
        let total = key_length
            .checked_add(body_length)
            .and_then(|n| n.checked_add(mac_length))
            .ok_or_else(|| {
                EciesError::AllocationFailure("cryptogram length overflows usize".to_string())
            })?;

        let mut data = Vec::new();
        data.try_reserve_exact(total).map_err(|e| {
            EciesError::AllocationFailure(format!("cryptogram of {} bytes: {}", total, e))
        })?;
        data.resize(total, 0);

        Ok(Self {
            data,
            key_length,
            body_length,
            mac_length,
        })
    }

    /// Assemble a cryptogram from separately stored regions.
    pub fn from_parts(key: &[u8], body: &[u8], mac: &[u8]) -> Result<Self, EciesError> {
        let mut cryptogram = Self::allocate(key.len(), mac.len(), body.len())?;
        cryptogram.key_mut().copy_from_slice(key);
        cryptogram.body_mut().copy_from_slice(body);
        cryptogram.mac_mut().copy_from_slice(mac);
        Ok(cryptogram)
    }

    /// Parse a flat `key || body || mac` buffer using the context's key and
    /// MAC lengths. The body is whatever lies between them and must not be
    /// empty.
    pub fn from_bytes(context: &EciesContext, bytes: &[u8]) -> Result<Self, EciesError> {
        let key_length = context.envelope_key_length();
        let mac_length = context.mac_length();
        let overhead = key_length.checked_add(mac_length).ok_or_else(|| {
            EciesError::InvalidArgument("key and MAC lengths overflow usize".to_string())
        })?;
        if bytes.len() <= overhead {
            return Err(EciesError::InvalidArgument(format!(
                "cryptogram too short: {} bytes, need more than {}",
                bytes.len(),
                overhead
            )));
        }

        let body_length = bytes.len() - overhead;
        let mut cryptogram = Self::allocate(key_length, mac_length, body_length)?;
        cryptogram.data.copy_from_slice(bytes);
        Ok(cryptogram)
    }

    fn key_range(&self) -> Range<usize> {
        0..self.key_length
    }

    fn body_range(&self) -> Range<usize> {
        self.key_length..self.key_length + self.body_length
    }

    fn mac_range(&self) -> Range<usize> {
        let start = self.key_length + self.body_length;
        start..start + self.mac_length
    }

    pub fn key(&self) -> &[u8] {
        &self.data[self.key_range()]
    }

    pub fn body(&self) -> &[u8] {
        &self.data[self.body_range()]
    }

    pub fn mac(&self) -> &[u8] {
        &self.data[self.mac_range()]
    }

    pub(crate) fn key_mut(&mut self) -> &mut [u8] {
        let range = self.key_range();
        &mut self.data[range]
    }

    pub(crate) fn body_mut(&mut self) -> &mut [u8] {
        let range = self.body_range();
        &mut self.data[range]
    }

    pub(crate) fn mac_mut(&mut self) -> &mut [u8] {
        let range = self.mac_range();
        &mut self.data[range]
    }

    /// Split into read-only body and writable MAC regions at once, so the
    /// tag can be computed over the body straight into place.
    pub(crate) fn body_and_mac_mut(&mut self) -> (&[u8], &mut [u8]) {
        let (head, mac) = self.data.split_at_mut(self.key_length + self.body_length);
        (&head[self.key_length..], &mut mac[..self.mac_length])
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn body_length(&self) -> usize {
        self.body_length
    }

    pub fn mac_length(&self) -> usize {
        self.mac_length
    }

    pub fn total_length(&self) -> usize {
        self.data.len()
    }

    /// The flat serialized form: `key || body || mac`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl AsRef<[u8]> for Cryptogram {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

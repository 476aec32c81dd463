//! HMAC tag over the ciphertext body.
//!
//! The tag covers the body region only: never the ephemeral key bytes and
//! never the plaintext.

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

use crate::error::EciesError;
use crate::types::HashAlgorithm;

macro_rules! keyed {
    ($hash:ty, $key:expr) => {
        <Hmac<$hash> as Mac>::new_from_slice($key)
            .map_err(|e| EciesError::Digest(format!("HMAC init: {}", e)))?
    };
}

/// Compute the tag of `body` under `mac_key` and write it into `tag`.
///
/// `tag` must be exactly the hash's output length.
pub(crate) fn compute(
    hash: HashAlgorithm,
    mac_key: &[u8],
    body: &[u8],
    tag: &mut [u8],
) -> Result<(), EciesError> {
    let out = match hash {
        HashAlgorithm::Sha256 => {
            let mut mac = keyed!(Sha256, mac_key);
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha384 => {
            let mut mac = keyed!(Sha384, mac_key);
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
        HashAlgorithm::Sha512 => {
            let mut mac = keyed!(Sha512, mac_key);
            mac.update(body);
            mac.finalize().into_bytes().to_vec()
        }
    };

    if out.len() != tag.len() {
        return Err(EciesError::Digest(format!(
            "MAC length mismatch: produced {} bytes, region holds {}",
            out.len(),
            tag.len()
        )));
    }
    tag.copy_from_slice(&out);
    Ok(())
}

/// Recompute the tag of `body` and compare it with `expected` in constant
/// time. A length mismatch is a plain `false`.
pub(crate) fn verify(
    hash: HashAlgorithm,
    mac_key: &[u8],
    body: &[u8],
    expected: &[u8],
) -> Result<bool, EciesError> {
    let ok = match hash {
        HashAlgorithm::Sha256 => {
            let mut mac = keyed!(Sha256, mac_key);
            mac.update(body);
            mac.verify_slice(expected).is_ok()
        }
        HashAlgorithm::Sha384 => {
            let mut mac = keyed!(Sha384, mac_key);
            mac.update(body);
            mac.verify_slice(expected).is_ok()
        }
        HashAlgorithm::Sha512 => {
            let mut mac = keyed!(Sha512, mac_key);
            mac.update(body);
            mac.verify_slice(expected).is_ok()
        }
    };
    Ok(ok)
}

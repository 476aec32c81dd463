//! KDF2 key derivation (ANSI X9.63 / SECG, equivalent to ISO 18033-2 KDF2).
//!
//! Output = `H(Z || 1) || H(Z || 2) || ...` truncated to the requested length,
//! where each counter is a 32-bit big-endian integer followed by the shared
//! info string.

use sha2::{Digest, Sha256, Sha384, Sha512};
use zeroize::{Zeroize, Zeroizing};

use crate::error::EciesError;
use crate::types::{HashAlgorithm, KDF_MAX_LENGTH};

/// Stretch `shared_secret` and `shared_info` into `out_len` bytes.
///
/// # Arguments
/// * `out_len` - Number of bytes to produce (may be zero)
/// * `shared_secret` - Raw key agreement output (Z)
/// * `shared_info` - Optional context string, may be empty
/// * `hash` - Hash function driving the counter chain
///
/// # Returns
/// Exactly `out_len` bytes, scrubbed when dropped.
pub fn derive(
    out_len: usize,
    shared_secret: &[u8],
    shared_info: &[u8],
    hash: HashAlgorithm,
) -> Result<Zeroizing<Vec<u8>>, EciesError> {
    check_length("output length", out_len)?;
    check_length("shared secret", shared_secret.len())?;
    check_length("shared info", shared_info.len())?;

    let mut out = Zeroizing::new(Vec::new());
    out.try_reserve_exact(out_len).map_err(|e| {
        EciesError::AllocationFailure(format!("KDF output of {} bytes: {}", out_len, e))
    })?;
    out.resize(out_len, 0);
    match hash {
        HashAlgorithm::Sha256 => fill::<Sha256>(&mut out, shared_secret, shared_info),
        HashAlgorithm::Sha384 => fill::<Sha384>(&mut out, shared_secret, shared_info),
        HashAlgorithm::Sha512 => fill::<Sha512>(&mut out, shared_secret, shared_info),
    }
    Ok(out)
}

fn check_length(what: &'static str, length: usize) -> Result<(), EciesError> {
    if length > KDF_MAX_LENGTH {
        return Err(EciesError::KdfInputTooLarge { what, length });
    }
    Ok(())
}

fn fill<D: Digest>(out: &mut [u8], z: &[u8], info: &[u8]) {
    let digest_len = <D as Digest>::output_size();
    // Lengths are capped at 2^30, so the counter cannot wrap.
    let mut counter: u32 = 1;
    for chunk in out.chunks_mut(digest_len) {
        let mut hasher = D::new();
        hasher.update(z);
        hasher.update(counter.to_be_bytes());
        hasher.update(info);
        let mut block = hasher.finalize();
        chunk.copy_from_slice(&block[..chunk.len()]);
        block.as_mut_slice().zeroize();
        counter += 1;
    }
}

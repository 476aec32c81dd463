//! Symmetric encryption of the cryptogram body.
//!
//! Every suite runs with an all-zero IV. That is only sound because the
//! cipher key comes from a fresh ephemeral agreement on every call and is
//! never reused.

use aes::{Aes128, Aes256};
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};
use zeroize::Zeroizing;

use crate::error::EciesError;
use crate::types::{CipherSuite, AES_BLOCK_LENGTH, AES_GCM_TAG_LENGTH};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// All-zero IV, sliced to the suite's IV length.
const ZERO_IV: [u8; AES_BLOCK_LENGTH] = [0u8; AES_BLOCK_LENGTH];

/// Encrypt `plaintext` straight into the pre-allocated `body` region.
///
/// `body` must be exactly `suite.body_length(plaintext.len())` bytes; any
/// other region size is `CipherOverflow`.
pub(crate) fn encrypt(
    suite: CipherSuite,
    key: &[u8],
    plaintext: &[u8],
    body: &mut [u8],
) -> Result<(), EciesError> {
    check_key(suite, key)?;
    let needed = suite.body_length(plaintext.len());
    if needed != body.len() {
        return Err(EciesError::CipherOverflow {
            needed,
            capacity: body.len(),
        });
    }

    let iv = &ZERO_IV[..suite.iv_length()];
    match suite {
        CipherSuite::Aes128Cbc => cbc_encrypt::<Aes128CbcEnc>(key, iv, plaintext, body),
        CipherSuite::Aes256Cbc => cbc_encrypt::<Aes256CbcEnc>(key, iv, plaintext, body),
        CipherSuite::Aes128Ctr => ctr_apply::<Aes128Ctr>(key, iv, plaintext, body),
        CipherSuite::Aes256Ctr => ctr_apply::<Aes256Ctr>(key, iv, plaintext, body),
        CipherSuite::Aes256Gcm => gcm_encrypt(key, iv, plaintext, body),
    }
}

/// Decrypt a body region, returning the plaintext at its true length.
pub(crate) fn decrypt(
    suite: CipherSuite,
    key: &[u8],
    body: &[u8],
) -> Result<Vec<u8>, EciesError> {
    check_key(suite, key)?;
    let iv = &ZERO_IV[..suite.iv_length()];
    match suite {
        CipherSuite::Aes128Cbc => cbc_decrypt::<Aes128CbcDec>(key, iv, body),
        CipherSuite::Aes256Cbc => cbc_decrypt::<Aes256CbcDec>(key, iv, body),
        CipherSuite::Aes128Ctr | CipherSuite::Aes256Ctr => {
            let mut out = vec![0u8; body.len()];
            if suite == CipherSuite::Aes128Ctr {
                ctr_apply::<Aes128Ctr>(key, iv, body, &mut out)?;
            } else {
                ctr_apply::<Aes256Ctr>(key, iv, body, &mut out)?;
            }
            Ok(out)
        }
        CipherSuite::Aes256Gcm => gcm_decrypt(key, iv, body),
    }
}

fn check_key(suite: CipherSuite, key: &[u8]) -> Result<(), EciesError> {
    if key.len() != suite.key_length() {
        return Err(EciesError::InvalidArgument(format!(
            "{:?} needs a {}-byte key, got {}",
            suite,
            suite.key_length(),
            key.len()
        )));
    }
    Ok(())
}

fn init_error(e: impl std::fmt::Display) -> EciesError {
    EciesError::InvalidArgument(format!("cipher init: {}", e))
}

fn cbc_encrypt<M: KeyIvInit + BlockEncryptMut>(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
    body: &mut [u8],
) -> Result<(), EciesError> {
    let capacity = body.len();
    let mode = M::new_from_slices(key, iv).map_err(init_error)?;
    let written = mode
        .encrypt_padded_b2b_mut::<Pkcs7>(plaintext, body)
        .map_err(|_| EciesError::CipherOverflow {
            needed: plaintext.len() + AES_BLOCK_LENGTH,
            capacity,
        })?
        .len();
    if written != capacity {
        return Err(EciesError::CipherOverflow {
            needed: written,
            capacity,
        });
    }
    Ok(())
}

fn cbc_decrypt<M: KeyIvInit + BlockDecryptMut>(
    key: &[u8],
    iv: &[u8],
    body: &[u8],
) -> Result<Vec<u8>, EciesError> {
    if body.is_empty() || body.len() % AES_BLOCK_LENGTH != 0 {
        return Err(EciesError::InvalidArgument(format!(
            "CBC body must be a non-empty multiple of {} bytes, got {}",
            AES_BLOCK_LENGTH,
            body.len()
        )));
    }
    let mode = M::new_from_slices(key, iv).map_err(init_error)?;

    // Scrubbed if unpadding fails and the buffer is dropped here.
    let mut out = Zeroizing::new(vec![0u8; body.len()]);
    let length = mode
        .decrypt_padded_b2b_mut::<Pkcs7>(body, &mut out)
        .map_err(|e| EciesError::DecryptionFailed(format!("CBC finalize: {:?}", e)))?
        .len();

    let mut plaintext = std::mem::take(&mut *out);
    plaintext.truncate(length);
    Ok(plaintext)
}

fn ctr_apply<M: KeyIvInit + StreamCipher>(
    key: &[u8],
    iv: &[u8],
    input: &[u8],
    output: &mut [u8],
) -> Result<(), EciesError> {
    let mut mode = M::new_from_slices(key, iv).map_err(init_error)?;
    output.copy_from_slice(input);
    mode.apply_keystream(output);
    Ok(())
}

fn gcm_encrypt(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
    body: &mut [u8],
) -> Result<(), EciesError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(init_error)?;
    let (ciphertext, tag_region) = body.split_at_mut(plaintext.len());
    ciphertext.copy_from_slice(plaintext);
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(iv), b"", ciphertext)
        .map_err(|e| EciesError::InvalidArgument(format!("AES-GCM encrypt: {}", e)))?;
    tag_region.copy_from_slice(&tag);
    Ok(())
}

fn gcm_decrypt(key: &[u8], iv: &[u8], body: &[u8]) -> Result<Vec<u8>, EciesError> {
    if body.len() < AES_GCM_TAG_LENGTH {
        return Err(EciesError::InvalidArgument(format!(
            "AES-GCM body must hold a {}-byte tag, got {} bytes",
            AES_GCM_TAG_LENGTH,
            body.len()
        )));
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(init_error)?;
    let (ciphertext, tag) = body.split_at(body.len() - AES_GCM_TAG_LENGTH);

    let mut out = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(Nonce::from_slice(iv), b"", &mut out, Tag::from_slice(tag))
        .map_err(|e| EciesError::DecryptionFailed(format!("AES-GCM finalize: {}", e)))?;
    Ok(std::mem::take(&mut *out))
}

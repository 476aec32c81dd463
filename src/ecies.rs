//! ECIES encrypt/decrypt pipeline.
//!
//! Encrypt: agreement → key region, cipher(plaintext) → body region,
//!          HMAC(body) → mac region
//! Decrypt: agreement(key region) → verify HMAC(body) → decipher(body)

use tracing::{debug, warn};

use crate::agreement::{derive_for_decrypt, derive_for_encrypt};
use crate::cipher;
use crate::context::EciesContext;
use crate::cryptogram::Cryptogram;
use crate::error::EciesError;
use crate::mac;

/// Seal `plaintext` to the context's recipient.
///
/// # Returns
/// A fresh cryptogram laid out as `[ephemeral key][body][mac]`.
pub fn encrypt(context: &EciesContext, plaintext: &[u8]) -> Result<Cryptogram, EciesError> {
    if plaintext.is_empty() {
        return Err(EciesError::InvalidArgument(
            "plaintext must not be empty".to_string(),
        ));
    }
    context.check_key_material()?;

    let suite = context.cipher();
    let mut cryptogram = Cryptogram::allocate(
        context.envelope_key_length(),
        context.mac_length(),
        suite.body_length(plaintext.len()),
    )?;

    // Dropping the envelope key scrubs it, on every return below.
    let (envelope_key, ephemeral_public) = derive_for_encrypt(context)?;
    cryptogram.key_mut().copy_from_slice(&ephemeral_public);

    cipher::encrypt(
        suite,
        envelope_key.cipher_key(),
        plaintext,
        cryptogram.body_mut(),
    )?;

    let (body, tag) = cryptogram.body_and_mac_mut();
    mac::compute(context.mac_hash(), envelope_key.mac_key(), body, tag)?;

    debug!(
        plaintext_len = plaintext.len(),
        body_len = cryptogram.body_length(),
        total_len = cryptogram.total_length(),
        "Sealed cryptogram"
    );
    Ok(cryptogram)
}

/// Open `cryptogram` with the context's private key.
///
/// The MAC is checked before any decryption happens; on mismatch no
/// plaintext is produced.
///
/// # Returns
/// The plaintext at its true, unpadded length.
pub fn decrypt(context: &EciesContext, cryptogram: &Cryptogram) -> Result<Vec<u8>, EciesError> {
    if !context.key().has_private_key() {
        return Err(EciesError::InvalidArgument(
            "decryption requires the recipient private key".to_string(),
        ));
    }
    context.check_key_material()?;
    check_layout(context, cryptogram)?;

    let envelope_key = derive_for_decrypt(context, cryptogram.key())?;

    let valid = mac::verify(
        context.mac_hash(),
        envelope_key.mac_key(),
        cryptogram.body(),
        cryptogram.mac(),
    )?;
    if !valid {
        warn!(
            body_len = cryptogram.body_length(),
            "MAC verification failed; refusing to decrypt"
        );
        return Err(EciesError::MacMismatch);
    }

    let plaintext = cipher::decrypt(
        context.cipher(),
        envelope_key.cipher_key(),
        cryptogram.body(),
    )?;

    debug!(
        body_len = cryptogram.body_length(),
        plaintext_len = plaintext.len(),
        "Opened cryptogram"
    );
    Ok(plaintext)
}

/// Parse a flat `key || body || mac` buffer and decrypt it.
pub fn decrypt_bytes(context: &EciesContext, bytes: &[u8]) -> Result<Vec<u8>, EciesError> {
    let cryptogram = Cryptogram::from_bytes(context, bytes)?;
    decrypt(context, &cryptogram)
}

fn check_layout(context: &EciesContext, cryptogram: &Cryptogram) -> Result<(), EciesError> {
    if cryptogram.key_length() != context.envelope_key_length() {
        return Err(EciesError::InvalidArgument(format!(
            "ephemeral key region is {} bytes, expected {}",
            cryptogram.key_length(),
            context.envelope_key_length()
        )));
    }
    if cryptogram.mac_length() != context.mac_length() {
        return Err(EciesError::InvalidArgument(format!(
            "MAC region is {} bytes, expected {}",
            cryptogram.mac_length(),
            context.mac_length()
        )));
    }
    if cryptogram.body_length() == 0 {
        return Err(EciesError::InvalidArgument(
            "cryptogram body is empty".to_string(),
        ));
    }
    Ok(())
}

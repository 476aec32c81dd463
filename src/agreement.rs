//! Envelope key agreement: ephemeral ECDH followed by KDF2.
//!
//! Encrypt side: fresh ephemeral key on the recipient's curve, ECDH with the
//! recipient public key, KDF2 with empty shared info, compressed ephemeral
//! public key for the cryptogram.
//! Decrypt side: decode and validate the ephemeral point, ECDH with the
//! recipient private key, same KDF2 step.

use elliptic_curve::ecdh::{diffie_hellman, EphemeralSecret};
use elliptic_curve::rand_core::OsRng;
use elliptic_curve::sec1::{FromEncodedPoint, ModulusSize, ToEncodedPoint};
use elliptic_curve::{AffinePoint, CurveArithmetic, FieldBytesSize, PublicKey, SecretKey};
use tracing::warn;
use zeroize::Zeroizing;

use crate::context::EciesContext;
use crate::error::EciesError;
use crate::kdf;
use crate::keys::RecipientKey;
use crate::secret::EnvelopeKey;

/// Raw ECDH output, scrubbed on drop.
type SharedSecret = Zeroizing<Vec<u8>>;

/// Derive envelope key material for a new message.
///
/// # Returns
/// The envelope key and the compressed ephemeral public key, which is exactly
/// `context.envelope_key_length()` bytes.
pub(crate) fn derive_for_encrypt(
    context: &EciesContext,
) -> Result<(EnvelopeKey, Vec<u8>), EciesError> {
    let (shared, ephemeral_public) = match context.key() {
        RecipientKey::P256 { public, .. } => ephemeral_agreement(public),
        RecipientKey::P384 { public, .. } => ephemeral_agreement(public),
    };
    check_shared_length(context, &shared)?;

    let envelope_key = stretch(context, &shared)?;

    if ephemeral_public.len() != context.envelope_key_length() {
        return Err(EciesError::EncodingLengthMismatch {
            expected: context.envelope_key_length(),
            actual: ephemeral_public.len(),
        });
    }

    Ok((envelope_key, ephemeral_public))
}

/// Rebuild the envelope key material from a cryptogram's ephemeral key bytes.
pub(crate) fn derive_for_decrypt(
    context: &EciesContext,
    ephemeral_public: &[u8],
) -> Result<EnvelopeKey, EciesError> {
    let shared = match context.key() {
        RecipientKey::P256 {
            secret: Some(secret),
            ..
        } => recipient_agreement(secret, ephemeral_public)?,
        RecipientKey::P384 {
            secret: Some(secret),
            ..
        } => recipient_agreement(secret, ephemeral_public)?,
        _ => {
            return Err(EciesError::InvalidArgument(
                "decryption requires the recipient private key".to_string(),
            ))
        }
    };
    check_shared_length(context, &shared)?;

    stretch(context, &shared)
}

fn stretch(context: &EciesContext, shared: &[u8]) -> Result<EnvelopeKey, EciesError> {
    let material = kdf::derive(context.kdf_digest_length(), shared, &[], context.kdf_hash())?;
    EnvelopeKey::new(material, context.cipher().key_length())
}

fn check_shared_length(context: &EciesContext, shared: &[u8]) -> Result<(), EciesError> {
    let expected = context.curve().shared_secret_length();
    if shared.len() != expected {
        return Err(EciesError::Agreement(format!(
            "shared secret is {} bytes, expected {}",
            shared.len(),
            expected
        )));
    }
    Ok(())
}

/// Generate an ephemeral key on `C` and agree with the recipient.
fn ephemeral_agreement<C>(recipient: &PublicKey<C>) -> (SharedSecret, Vec<u8>)
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    let ephemeral = EphemeralSecret::<C>::random(&mut OsRng);
    let shared = ephemeral.diffie_hellman(recipient);
    let secret = Zeroizing::new(shared.raw_secret_bytes().to_vec());
    let encoded = ephemeral.public_key().to_encoded_point(true);
    (secret, encoded.as_bytes().to_vec())
}

/// Validate the sender's ephemeral point on `C` and agree with it.
fn recipient_agreement<C>(
    secret: &SecretKey<C>,
    ephemeral_public: &[u8],
) -> Result<SharedSecret, EciesError>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    // Rejects encodings that are malformed, off the curve, or the identity.
    let point = PublicKey::<C>::from_sec1_bytes(ephemeral_public).map_err(|e| {
        warn!(length = ephemeral_public.len(), "Rejected invalid ephemeral public key");
        EciesError::InvalidPoint(e.to_string())
    })?;
    let shared = diffie_hellman(secret.to_nonzero_scalar(), point.as_affine());
    Ok(Zeroizing::new(shared.raw_secret_bytes().to_vec()))
}

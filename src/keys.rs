//! Recipient EC keys for the supported curves.
//!
//! Only import from raw SEC1 bytes is provided; storage and long-term identity
//! formats belong to the caller.

use elliptic_curve::rand_core::OsRng;
use elliptic_curve::sec1::ToEncodedPoint;

use crate::error::EciesError;
use crate::types::Curve;

/// A recipient's key: the public half always, the private half only when the
/// holder is expected to decrypt.
#[derive(Clone)]
pub enum RecipientKey {
    P256 {
        public: p256::PublicKey,
        secret: Option<p256::SecretKey>,
    },
    P384 {
        public: p384::PublicKey,
        secret: Option<p384::SecretKey>,
    },
}

impl RecipientKey {
    /// Generate a fresh key pair. Intended for tests and ad-hoc identities.
    pub fn generate(curve: Curve) -> Self {
        match curve {
            Curve::P256 => {
                let secret = p256::SecretKey::random(&mut OsRng);
                RecipientKey::P256 {
                    public: secret.public_key(),
                    secret: Some(secret),
                }
            }
            Curve::P384 => {
                let secret = p384::SecretKey::random(&mut OsRng);
                RecipientKey::P384 {
                    public: secret.public_key(),
                    secret: Some(secret),
                }
            }
        }
    }

    /// Import a private key from its big-endian scalar bytes.
    pub fn from_secret_bytes(curve: Curve, bytes: &[u8]) -> Result<Self, EciesError> {
        let invalid = |e: elliptic_curve::Error| {
            EciesError::InvalidArgument(format!("invalid {curve:?} private key: {e}"))
        };
        match curve {
            Curve::P256 => {
                let secret = p256::SecretKey::from_slice(bytes).map_err(invalid)?;
                Ok(RecipientKey::P256 {
                    public: secret.public_key(),
                    secret: Some(secret),
                })
            }
            Curve::P384 => {
                let secret = p384::SecretKey::from_slice(bytes).map_err(invalid)?;
                Ok(RecipientKey::P384 {
                    public: secret.public_key(),
                    secret: Some(secret),
                })
            }
        }
    }

    /// Import a public key from SEC1 bytes (compressed or uncompressed).
    pub fn from_public_sec1(curve: Curve, bytes: &[u8]) -> Result<Self, EciesError> {
        let invalid = |e: elliptic_curve::Error| {
            EciesError::InvalidArgument(format!("invalid {curve:?} public key: {e}"))
        };
        match curve {
            Curve::P256 => Ok(RecipientKey::P256 {
                public: p256::PublicKey::from_sec1_bytes(bytes).map_err(invalid)?,
                secret: None,
            }),
            Curve::P384 => Ok(RecipientKey::P384 {
                public: p384::PublicKey::from_sec1_bytes(bytes).map_err(invalid)?,
                secret: None,
            }),
        }
    }

    pub fn curve(&self) -> Curve {
        match self {
            RecipientKey::P256 { .. } => Curve::P256,
            RecipientKey::P384 { .. } => Curve::P384,
        }
    }

    pub fn has_private_key(&self) -> bool {
        match self {
            RecipientKey::P256 { secret, .. } => secret.is_some(),
            RecipientKey::P384 { secret, .. } => secret.is_some(),
        }
    }

    /// The same key with the private half dropped, for handing to senders.
    pub fn public_only(&self) -> Self {
        match self {
            RecipientKey::P256 { public, .. } => RecipientKey::P256 {
                public: public.clone(),
                secret: None,
            },
            RecipientKey::P384 { public, .. } => RecipientKey::P384 {
                public: public.clone(),
                secret: None,
            },
        }
    }

    /// SEC1 encoding of the public key.
    pub fn public_key_sec1(&self, compress: bool) -> Vec<u8> {
        match self {
            RecipientKey::P256 { public, .. } => {
                public.to_encoded_point(compress).as_bytes().to_vec()
            }
            RecipientKey::P384 { public, .. } => {
                public.to_encoded_point(compress).as_bytes().to_vec()
            }
        }
    }
}

impl std::fmt::Debug for RecipientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipientKey")
            .field("curve", &self.curve())
            .field("has_private_key", &self.has_private_key())
            .finish()
    }
}

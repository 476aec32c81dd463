//! Integration tests for sealing and opening cryptograms across every suite.

use std::sync::Arc;
use std::thread;

use less_ecies::{
    decrypt, decrypt_bytes, encrypt, CipherSuite, Cryptogram, Curve, EciesContext, EciesError,
    ErrorKind, HashAlgorithm, RecipientKey, SuiteConfig,
};

// ============================================================================
// Helpers
// ============================================================================

const CIPHERS: [CipherSuite; 5] = [
    CipherSuite::Aes128Cbc,
    CipherSuite::Aes256Cbc,
    CipherSuite::Aes128Ctr,
    CipherSuite::Aes256Ctr,
    CipherSuite::Aes256Gcm,
];

const HASHES: [HashAlgorithm; 3] = [
    HashAlgorithm::Sha256,
    HashAlgorithm::Sha384,
    HashAlgorithm::Sha512,
];

fn suite(curve: Curve, cipher: CipherSuite, mac_hash: HashAlgorithm) -> SuiteConfig {
    SuiteConfig {
        curve,
        cipher,
        mac_hash,
        kdf_hash: HashAlgorithm::Sha512,
        kdf_digest_length: None,
    }
}

fn context(config: &SuiteConfig) -> EciesContext {
    EciesContext::new(RecipientKey::generate(config.curve), config).unwrap()
}

fn plaintext(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 + 3) as u8).collect()
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn every_suite_round_trips() {
    for curve in [Curve::P256, Curve::P384] {
        for cipher in CIPHERS {
            for mac_hash in HASHES {
                let ctx = context(&suite(curve, cipher, mac_hash));
                for len in [1, 15, 16, 17, 32, 33, 1000] {
                    let data = plaintext(len);
                    let cryptogram = encrypt(&ctx, &data).unwrap();
                    assert_eq!(
                        decrypt(&ctx, &cryptogram).unwrap(),
                        data,
                        "{:?} {:?} {:?} len {}",
                        curve,
                        cipher,
                        mac_hash,
                        len
                    );
                }
            }
        }
    }
}

#[test]
fn context_methods_match_free_functions() {
    let ctx = context(&SuiteConfig::default());
    let cryptogram = ctx.encrypt(b"method form").unwrap();
    assert_eq!(ctx.decrypt(&cryptogram).unwrap(), b"method form");
    assert_eq!(decrypt(&ctx, &cryptogram).unwrap(), b"method form");
}

#[test]
fn flat_bytes_round_trip() {
    for curve in [Curve::P256, Curve::P384] {
        let ctx = context(&suite(curve, CipherSuite::Aes256Cbc, HashAlgorithm::Sha384));
        let bytes = encrypt(&ctx, b"stored on disk").unwrap().into_bytes();
        assert_eq!(decrypt_bytes(&ctx, &bytes).unwrap(), b"stored on disk");
    }
}

#[test]
fn separately_stored_regions_round_trip() {
    let ctx = context(&SuiteConfig::default());
    let sealed = encrypt(&ctx, b"three columns").unwrap();
    let key = sealed.key().to_vec();
    let body = sealed.body().to_vec();
    let mac = sealed.mac().to_vec();

    let rebuilt = Cryptogram::from_parts(&key, &body, &mac).unwrap();
    assert_eq!(rebuilt, sealed);
    assert_eq!(decrypt(&ctx, &rebuilt).unwrap(), b"three columns");
}

#[test]
fn recipient_loaded_from_secret_bytes() {
    let secret = [0x42u8; 32];
    let recipient = RecipientKey::from_secret_bytes(Curve::P256, &secret).unwrap();
    let public = recipient.public_key_sec1(true);

    let sender_key = RecipientKey::from_public_sec1(Curve::P256, &public).unwrap();
    let sender = EciesContext::new(sender_key, &SuiteConfig::default()).unwrap();
    let cryptogram = encrypt(&sender, b"to a stored key").unwrap();

    let reloaded = RecipientKey::from_secret_bytes(Curve::P256, &secret).unwrap();
    let opener = EciesContext::new(reloaded, &SuiteConfig::default()).unwrap();
    assert_eq!(decrypt(&opener, &cryptogram).unwrap(), b"to a stored key");
}

#[test]
fn suite_loaded_from_json() {
    let config = SuiteConfig::from_json(
        r#"{"curve":"p-384","cipher":"aes-256-gcm","mac_hash":"sha-384","kdf_hash":"sha-384","kdf_digest_length":64}"#,
    )
    .unwrap();
    let ctx = context(&config);
    assert_eq!(ctx.kdf_digest_length(), 64);
    let cryptogram = encrypt(&ctx, b"configured").unwrap();
    assert_eq!(cryptogram.key_length(), 49);
    assert_eq!(cryptogram.mac_length(), 48);
    assert_eq!(decrypt(&ctx, &cryptogram).unwrap(), b"configured");
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn hello_world_layout() {
    let config = SuiteConfig {
        curve: Curve::P256,
        cipher: CipherSuite::Aes128Cbc,
        mac_hash: HashAlgorithm::Sha256,
        kdf_hash: HashAlgorithm::Sha512,
        kdf_digest_length: Some(64),
    };
    let ctx = context(&config);
    let cryptogram = encrypt(&ctx, b"hello world").unwrap();

    assert_eq!(cryptogram.key_length(), 33);
    assert_eq!(cryptogram.body_length(), 16);
    assert_eq!(cryptogram.mac_length(), 32);
    assert_eq!(cryptogram.total_length(), 33 + 16 + 32);
    assert_eq!(decrypt(&ctx, &cryptogram).unwrap(), b"hello world");
}

#[test]
fn body_lengths_per_suite() {
    let cases = [
        (CipherSuite::Aes128Cbc, 15, 16),
        (CipherSuite::Aes128Cbc, 16, 32),
        (CipherSuite::Aes256Cbc, 17, 32),
        (CipherSuite::Aes128Ctr, 17, 17),
        (CipherSuite::Aes256Ctr, 1, 1),
        (CipherSuite::Aes256Gcm, 17, 33),
    ];
    for (cipher, len, body) in cases {
        let ctx = context(&suite(Curve::P256, cipher, HashAlgorithm::Sha256));
        let cryptogram = encrypt(&ctx, &plaintext(len)).unwrap();
        assert_eq!(cryptogram.body_length(), body, "{:?} len {}", cipher, len);
        assert_eq!(
            cryptogram.total_length(),
            cryptogram.key_length() + body + cryptogram.mac_length()
        );
    }
}

#[test]
fn ephemeral_key_is_a_compressed_point() {
    for (curve, length) in [(Curve::P256, 33), (Curve::P384, 49)] {
        let ctx = context(&suite(curve, CipherSuite::Aes256Cbc, HashAlgorithm::Sha512));
        let cryptogram = encrypt(&ctx, b"x").unwrap();
        assert_eq!(cryptogram.key().len(), length);
        assert!(matches!(cryptogram.key()[0], 0x02 | 0x03));
    }
}

#[test]
fn same_plaintext_seals_differently_each_time() {
    let ctx = context(&SuiteConfig::default());
    let a = encrypt(&ctx, b"repeat").unwrap();
    let b = encrypt(&ctx, b"repeat").unwrap();
    assert_ne!(a.key(), b.key());
    assert_ne!(a.body(), b.body());
    assert_ne!(a.mac(), b.mac());
}

// ============================================================================
// Rejection
// ============================================================================

#[test]
fn every_flipped_bit_in_body_or_mac_is_detected() {
    let ctx = context(&suite(Curve::P256, CipherSuite::Aes128Cbc, HashAlgorithm::Sha256));
    let sealed = encrypt(&ctx, b"hello world").unwrap();
    let key_length = sealed.key_length();

    for bit in key_length * 8..sealed.total_length() * 8 {
        let mut bytes = sealed.as_bytes().to_vec();
        bytes[bit / 8] ^= 1 << (bit % 8);
        let err = decrypt_bytes(&ctx, &bytes).unwrap_err();
        assert!(
            matches!(err, EciesError::MacMismatch),
            "bit {} gave {:?}",
            bit,
            err
        );
    }
}

#[test]
fn tampered_ephemeral_key_never_decrypts() {
    let ctx = context(&SuiteConfig::default());
    let sealed = encrypt(&ctx, b"hello world").unwrap();

    // Byte 0 is the SEC1 sign prefix; see `sign_flipped_ephemeral_key_still_decrypts`.
    for byte in 1..sealed.key_length() {
        let mut bytes = sealed.as_bytes().to_vec();
        bytes[byte] ^= 0x01;
        let err = decrypt_bytes(&ctx, &bytes).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::InvalidPoint | ErrorKind::MacMismatch),
            "byte {} gave {:?}",
            byte,
            err
        );
    }
}

#[test]
fn sign_flipped_ephemeral_key_still_decrypts() {
    // 0x02 <-> 0x03 selects -P. ECDH keeps only the x coordinate of k·P, so
    // the envelope key is unchanged and the key region stays malleable.
    for curve in [Curve::P256, Curve::P384] {
        let ctx = context(&suite(curve, CipherSuite::Aes256Cbc, HashAlgorithm::Sha512));
        let sealed = encrypt(&ctx, b"hello world").unwrap();
        let mut bytes = sealed.as_bytes().to_vec();
        bytes[0] ^= 0x01;
        assert!(matches!(bytes[0], 0x02 | 0x03));
        assert_eq!(decrypt_bytes(&ctx, &bytes).unwrap(), b"hello world");
    }
}

#[test]
fn rebuilt_cryptogram_with_altered_body_is_rejected() {
    let ctx = context(&SuiteConfig::default());
    let sealed = encrypt(&ctx, b"hello world").unwrap();
    let mut body = sealed.body().to_vec();
    body[0] ^= 0x80;

    let altered = Cryptogram::from_parts(sealed.key(), &body, sealed.mac()).unwrap();
    assert_ne!(altered, sealed);
    assert!(matches!(
        decrypt(&ctx, &altered),
        Err(EciesError::MacMismatch)
    ));
    assert_eq!(decrypt(&ctx, &sealed).unwrap(), b"hello world");
}

#[test]
fn wrong_recipient_is_rejected() {
    let config = SuiteConfig::default();
    let alice = context(&config);
    let bob = context(&config);
    let cryptogram = encrypt(&alice, b"for alice").unwrap();
    assert!(matches!(
        decrypt(&bob, &cryptogram),
        Err(EciesError::MacMismatch)
    ));
}

#[test]
fn truncated_bytes_are_rejected() {
    let ctx = context(&SuiteConfig::default());
    let bytes = encrypt(&ctx, b"hello world").unwrap().into_bytes();
    let err = decrypt_bytes(&ctx, &bytes[..33 + 64]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let err = decrypt_bytes(&ctx, &bytes[..bytes.len() - 1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MacMismatch);
}

#[test]
fn insufficient_key_material_on_both_sides() {
    let config = SuiteConfig {
        cipher: CipherSuite::Aes256Cbc,
        kdf_hash: HashAlgorithm::Sha256,
        ..SuiteConfig::default()
    };
    let ctx = context(&config);
    assert!(matches!(
        encrypt(&ctx, b"data"),
        Err(EciesError::InsufficientKeyMaterial {
            cipher_key_length: 32,
            kdf_digest_length: 32
        })
    ));

    let wide = ctx.clone().with_kdf_digest_length(64);
    let cryptogram = encrypt(&wide, b"data").unwrap();
    assert!(matches!(
        decrypt(&ctx, &cryptogram),
        Err(EciesError::InsufficientKeyMaterial { .. })
    ));
    assert_eq!(decrypt(&wide, &cryptogram).unwrap(), b"data");
}

#[test]
fn public_only_context_cannot_decrypt() {
    let recipient = context(&SuiteConfig::default());
    let sender = EciesContext::new(recipient.key().public_only(), &SuiteConfig::default()).unwrap();
    let cryptogram = encrypt(&sender, b"one way").unwrap();
    assert_eq!(
        decrypt(&sender, &cryptogram).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(decrypt(&recipient, &cryptogram).unwrap(), b"one way");
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn context_is_shared_across_threads() {
    let ctx = Arc::new(context(&SuiteConfig::default()));
    let handles: Vec<_> = (0..4u8)
        .map(|n| {
            let ctx = Arc::clone(&ctx);
            thread::spawn(move || {
                let data = vec![n; 40 + n as usize];
                let cryptogram = encrypt(&ctx, &data).unwrap();
                assert_eq!(decrypt(&ctx, &cryptogram).unwrap(), data);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

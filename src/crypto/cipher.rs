//! XChaCha20-Poly1305 authenticated encryption of one journal entry.
//!
//! Each entry is sealed independently: a fresh random 12-byte salt feeds the
//! key derivation and a fresh random 16-byte nonce prefix is concatenated
//! with the big-endian entry timestamp to form the 24-byte XChaCha20 nonce.
//! Binding the nonce to the timestamp (which is also the entry's unique key)
//! guarantees nonce uniqueness as long as no two entries share a timestamp —
//! the journal store enforces exactly that. No additional authenticated data
//! is used.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::{NONCE_LEN, NONCE_PREFIX_LEN, SALT_LEN};
use crate::crypto::kdf::{derive_key, KdfParams};
use crate::crypto::Passphrase;
use crate::errors::CryptoError;

/// Assembles the full 24-byte nonce from the stored prefix and the entry
/// timestamp. The length is checked defensively before the cipher ever sees
/// it, so malformed stored data fails early.
fn assemble_nonce(
    nonce_prefix: &[u8; NONCE_PREFIX_LEN],
    timestamp: u64,
) -> Result<Vec<u8>, CryptoError> {
    let mut nonce = Vec::with_capacity(NONCE_LEN);
    nonce.extend_from_slice(nonce_prefix);
    nonce.extend_from_slice(&timestamp.to_be_bytes());
    if nonce.len() != NONCE_LEN {
        return Err(CryptoError::InvalidNonceLength(nonce.len()));
    }
    Ok(nonce)
}

/// Encrypts one entry's text under the passphrase.
///
/// Generates a fresh random salt and nonce prefix, derives the key, seals the
/// plaintext, and returns `(ciphertext_with_tag, salt, nonce_prefix)` — the
/// three values that must be stored to reverse the operation later. The
/// derived key is wiped as soon as the seal completes.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` or `CryptoError::EncryptionFailed`.
pub fn encrypt_text(
    passphrase: &Passphrase,
    plaintext: &str,
    timestamp: u64,
    params: &KdfParams,
) -> Result<(Vec<u8>, [u8; SALT_LEN], [u8; NONCE_PREFIX_LEN]), CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce_prefix = [0u8; NONCE_PREFIX_LEN];
    OsRng.fill_bytes(&mut nonce_prefix);

    let key = derive_key(passphrase, &salt, params)?;
    let nonce = assemble_nonce(&nonce_prefix, timestamp)?;

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    // `key` drops here and zeroizes itself.

    Ok((ciphertext, salt, nonce_prefix))
}

/// Decrypts one entry's ciphertext under the passphrase.
///
/// Reconstructs the nonce exactly as `encrypt_text` built it, re-derives the
/// key from the stored salt, and opens the sealed box. Any mismatch — wrong
/// passphrase, tampered ciphertext, tampered salt, tampered nonce prefix, or
/// tampered timestamp — fails authentication; garbage plaintext is never
/// returned.
///
/// # Errors
///
/// Returns `CryptoError::AuthenticationFailed` on any verification failure
/// and `CryptoError::NotText` if the authenticated payload is not UTF-8.
pub fn decrypt_text(
    passphrase: &Passphrase,
    ciphertext: &[u8],
    salt: &[u8; SALT_LEN],
    nonce_prefix: &[u8; NONCE_PREFIX_LEN],
    timestamp: u64,
    params: &KdfParams,
) -> Result<String, CryptoError> {
    let key = derive_key(passphrase, salt, params)?;
    let nonce = assemble_nonce(nonce_prefix, timestamp)?;

    let cipher = XChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let plaintext = cipher
        .decrypt(XNonce::from_slice(&nonce), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)?;
    // `key` drops here and zeroizes itself.

    String::from_utf8(plaintext).map_err(|_| CryptoError::NotText)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TAG_LEN;

    const CLEARTEXT: &str =
        "Lorem ipsum dolor sit amet, consetetur sadipscing elitr, sed diam nonumy \
         eirmod tempor invidunt ut labore et dolore magna aliquyam erat.";

    fn params() -> KdfParams {
        KdfParams::light()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let passphrase = Passphrase::from("test");
        let timestamp = 1_700_000_000_000_000u64;

        let (ciphertext, salt, nonce_prefix) =
            encrypt_text(&passphrase, CLEARTEXT, timestamp, &params()).unwrap();
        assert_ne!(ciphertext.as_slice(), CLEARTEXT.as_bytes());
        assert_eq!(ciphertext.len(), CLEARTEXT.len() + TAG_LEN);

        let decrypted = decrypt_text(
            &passphrase,
            &ciphertext,
            &salt,
            &nonce_prefix,
            timestamp,
            &params(),
        )
        .unwrap();
        assert_eq!(decrypted, CLEARTEXT);
    }

    #[test]
    fn test_fresh_salt_and_nonce_prefix_per_call() {
        let passphrase = Passphrase::from("test");
        let (_, salt1, prefix1) = encrypt_text(&passphrase, "a", 1, &params()).unwrap();
        let (_, salt2, prefix2) = encrypt_text(&passphrase, "a", 1, &params()).unwrap();
        assert_ne!(salt1, salt2);
        assert_ne!(prefix1, prefix2);
    }

    #[test]
    fn test_wrong_passphrase_fails_authentication() {
        let (ciphertext, salt, nonce_prefix) =
            encrypt_text(&Passphrase::from("right"), CLEARTEXT, 5, &params()).unwrap();
        let result = decrypt_text(
            &Passphrase::from("wrong"),
            &ciphertext,
            &salt,
            &nonce_prefix,
            5,
            &params(),
        );
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_salt_fails_authentication() {
        let passphrase = Passphrase::from("test");
        let (ciphertext, mut salt, nonce_prefix) =
            encrypt_text(&passphrase, CLEARTEXT, 5, &params()).unwrap();
        salt[0] ^= 0xff;
        let result = decrypt_text(&passphrase, &ciphertext, &salt, &nonce_prefix, 5, &params());
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_nonce_prefix_fails_authentication() {
        let passphrase = Passphrase::from("test");
        let (ciphertext, salt, mut nonce_prefix) =
            encrypt_text(&passphrase, CLEARTEXT, 5, &params()).unwrap();
        nonce_prefix[15] ^= 0x01;
        let result = decrypt_text(&passphrase, &ciphertext, &salt, &nonce_prefix, 5, &params());
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_timestamp_fails_authentication() {
        let passphrase = Passphrase::from("test");
        let (ciphertext, salt, nonce_prefix) =
            encrypt_text(&passphrase, CLEARTEXT, 5, &params()).unwrap();
        let result = decrypt_text(&passphrase, &ciphertext, &salt, &nonce_prefix, 6, &params());
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }

    #[test]
    fn test_flipped_ciphertext_byte_fails_authentication() {
        let passphrase = Passphrase::from("test");
        let (mut ciphertext, salt, nonce_prefix) =
            encrypt_text(&passphrase, CLEARTEXT, 5, &params()).unwrap();
        ciphertext[3] ^= 0x01;
        let result = decrypt_text(&passphrase, &ciphertext, &salt, &nonce_prefix, 5, &params());
        assert!(matches!(result, Err(CryptoError::AuthenticationFailed)));
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let passphrase = Passphrase::from("test");
        let (ciphertext, salt, nonce_prefix) =
            encrypt_text(&passphrase, "", 9, &params()).unwrap();
        assert_eq!(ciphertext.len(), TAG_LEN); // tag only

        let decrypted =
            decrypt_text(&passphrase, &ciphertext, &salt, &nonce_prefix, 9, &params()).unwrap();
        assert!(decrypted.is_empty());
    }
}

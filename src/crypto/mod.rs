//! Cryptographic operations for journal encryption.
//!
//! Each journal entry is encrypted independently: Argon2id turns the
//! passphrase plus a per-entry random salt into a 256-bit key, and
//! XChaCha20-Poly1305 seals the entry text under a 24-byte nonce built from
//! a random prefix and the entry timestamp.
//!
//! # Module Structure
//!
//! - `passphrase`: the secure passphrase container and prompting
//! - `kdf`: Argon2id key derivation
//! - `cipher`: per-entry XChaCha20-Poly1305 seal/open

pub mod cipher;
pub mod kdf;
pub mod passphrase;

// Re-export commonly used types
pub use self::cipher::{decrypt_text, encrypt_text};
pub use self::kdf::{derive_key, DerivedKey, KdfParams};
pub use self::passphrase::{obtain_passphrase, Passphrase};

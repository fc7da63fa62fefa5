//! Constants used throughout the application.
//!
//! This module centralizes the on-disk format parameters and application
//! metadata so they are easy to find and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "vellum";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str =
    "A single-user encrypted journal stored in one authenticated file";

// Configuration Keys & Environment Variables
/// Environment variable for overriding the journal file path.
pub const ENV_VAR_JOURNAL_PATH: &str = "VELLUM_JOURNAL";
/// Environment variable supplying the passphrase non-interactively
/// (scripting and tests).
pub const ENV_VAR_PASSPHRASE: &str = "VELLUM_PASSPHRASE";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default journal file location relative to the home directory.
pub const DEFAULT_JOURNAL_RELPATH: &str = ".vellum/journal";

// On-Disk Format
//
// A journal file is a one-byte version header followed by concatenated
// entry records:
//
//   +0  timestamp          8 bytes, big-endian u64
//   +8  salt              12 bytes
//   +20 nonce_prefix      16 bytes
//   +36 ciphertext_length  4 bytes, big-endian u32
//   +40 ciphertext         ciphertext_length bytes

/// The journal format version this build reads and writes.
pub const JOURNAL_VERSION: u8 = 0;
/// Byte length of the per-entry Argon2id salt.
pub const SALT_LEN: usize = 12;
/// Byte length of the random nonce prefix stored with each entry.
pub const NONCE_PREFIX_LEN: usize = 16;
/// Byte length of the full XChaCha20-Poly1305 nonce (prefix + timestamp).
pub const NONCE_LEN: usize = 24;
/// Byte length of the derived encryption key.
pub const KEY_LEN: usize = 32;
/// Byte length of the Poly1305 authentication tag appended to ciphertext.
pub const TAG_LEN: usize = 16;
/// Byte length of a record header (everything before the ciphertext).
pub const RECORD_HEADER_LEN: usize = 40;
/// The reserved timestamp of the sentinel entry used for password
/// verification. Never surfaced to callers enumerating entries.
pub const SENTINEL_TIMESTAMP: u64 = 0;

// File System Parameters
/// Default POSIX permissions for the journal file (owner read/write).
#[cfg(unix)]
pub const JOURNAL_FILE_PERMISSIONS: u32 = 0o600;
/// Default POSIX permissions for newly created journal directories.
#[cfg(unix)]
pub const JOURNAL_DIR_PERMISSIONS: u32 = 0o700;

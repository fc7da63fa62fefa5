//! Error handling utilities for the vellum application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur during cryptographic operations.
///
/// Authentication failure deliberately covers both "wrong password" and
/// "tampered or corrupted data": an AEAD open that does not verify tells the
/// caller nothing more than that the plaintext cannot be trusted, and the two
/// conditions must not be distinguishable.
///
/// # Examples
///
/// ```
/// use vellum::errors::CryptoError;
///
/// let error = CryptoError::AuthenticationFailed;
/// assert!(format!("{}", error).contains("cannot decrypt"));
/// ```
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The AEAD authentication check failed during decryption. Covers wrong
    /// password, tampered ciphertext, tampered salt, tampered nonce prefix,
    /// and tampered timestamp — indistinguishably, by design.
    #[error("cannot decrypt: wrong passphrase or corrupted data")]
    AuthenticationFailed,

    /// The nonce assembled from the stored prefix and timestamp did not have
    /// the expected 24-byte length. Indicates malformed stored data; checked
    /// before the cipher is ever invoked.
    #[error("assembled nonce has an invalid length: {0} bytes")]
    InvalidNonceLength(usize),

    /// The Argon2id key derivation rejected its inputs or parameters.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Error during the encryption operation itself.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// The decrypted payload authenticated correctly but is not valid UTF-8.
    /// Journal entries are text; this indicates the record was not written
    /// by this program.
    #[error("decrypted payload is not valid UTF-8 text")]
    NotText,

    /// Reading the passphrase from the terminal failed.
    #[error("failed to read passphrase: {0}")]
    PassphrasePrompt(String),

    /// The passphrase and its confirmation did not match.
    #[error("passphrases do not match")]
    PassphraseMismatch,

    /// An empty passphrase was supplied.
    #[error("passphrase must not be empty")]
    EmptyPassphrase,
}

/// Represents error cases arising from the journal store itself: caller
/// misuse, unsupported file formats, and write conflicts.
///
/// # Examples
///
/// ```
/// use vellum::errors::JournalError;
///
/// let error = JournalError::EntryIdAlreadyExists(1700000000000000);
/// assert!(format!("{}", error).contains("1700000000000000"));
/// ```
#[derive(Debug, Error)]
pub enum JournalError {
    /// An entry with this timestamp already exists in the journal. Timestamps
    /// are the unique keys; inserting a duplicate is an error, not an
    /// overwrite.
    #[error("an entry already exists at timestamp {0}")]
    EntryIdAlreadyExists(u64),

    /// No entry exists at this timestamp.
    #[error("no entry exists at timestamp {0}")]
    EntryNotFound(u64),

    /// The journal has been closed; no further operations are possible.
    #[error("journal already closed, can't access data")]
    Closed,

    /// The file carries a version byte this build does not understand.
    #[error("unsupported journal version: {0}")]
    UnsupportedVersion(u8),

    /// The given path points to a directory, not a journal file.
    #[error("the given path points to a directory: {0}")]
    PathIsDirectory(PathBuf),

    /// The file exists but is empty — it does not even carry a version byte.
    #[error("journal file is empty: {0}")]
    EmptyFile(PathBuf),

    /// The backing file was modified by another process since this journal
    /// last read or wrote it. The pending write was not performed; the
    /// caller decides whether to re-read or to force-overwrite via
    /// `accept_external_changes`.
    #[error("the file was modified by another process since last read/write")]
    FileModifiedExternally,
}

/// Represents all possible errors that can occur in the vellum application.
///
/// This enum is the central error type used across the application, with
/// variants for the different error categories. Password/corruption failures
/// (`Crypto`) and write conflicts (`Journal(FileModifiedExternally)`) arrive
/// as different variants so callers can react to them differently.
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors from the journal store.
    #[error("Journal error: {0}")]
    Journal(#[from] JournalError),

    /// Errors from cryptographic operations.
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

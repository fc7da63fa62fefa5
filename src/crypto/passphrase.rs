//! The passphrase handle and interactive prompting.
//!
//! The original design goal: plaintext passphrase bytes are readable only for
//! the span of a key-derivation call and are wiped on every exit path. Here
//! that contract is carried by [`Zeroizing`] storage (wiped when the handle
//! drops, panics included) plus a scoped [`Passphrase::expose`] accessor so
//! callers never hold a long-lived reference to the raw bytes.

use std::env;
use std::fmt;

use tracing::debug;
use zeroize::Zeroizing;

use crate::constants::ENV_VAR_PASSPHRASE;
use crate::errors::{AppResult, CryptoError};

/// An opaque secure container for the user's passphrase.
///
/// The wrapped bytes are zeroized when the handle is dropped. `Debug` output
/// is redacted, and there is no accessor that returns the bytes by value.
///
/// # Examples
///
/// ```
/// use vellum::crypto::Passphrase;
///
/// let passphrase = Passphrase::new(b"correct horse battery staple".to_vec());
/// let len = passphrase.expose(|bytes| bytes.len());
/// assert_eq!(len, 28);
/// ```
pub struct Passphrase(Zeroizing<Vec<u8>>);

impl Passphrase {
    /// Wraps passphrase bytes in a zeroize-on-drop container.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Runs `f` with a view of the passphrase bytes.
    ///
    /// The view is scoped to the closure; the bytes themselves stay inside
    /// the container and are wiped when the handle drops.
    pub fn expose<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        f(&self.0)
    }

    /// Whether the passphrase is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes().to_vec())
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

/// Prompts for a new passphrase with confirmation.
///
/// Used when the journal file does not exist yet.
///
/// # Errors
///
/// Returns `CryptoError::PassphraseMismatch` if the confirmation differs and
/// `CryptoError::EmptyPassphrase` if nothing was entered.
fn prompt_for_new_passphrase() -> AppResult<Passphrase> {
    debug!("Prompting for new passphrase (journal does not exist yet)");

    eprintln!("Creating a new encrypted journal.");
    eprintln!("Choose a strong passphrase; there is no way to recover it.\n");

    let passphrase = rpassword::prompt_password("Enter passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;
    let confirmation = rpassword::prompt_password("Confirm passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;

    if passphrase != confirmation {
        return Err(CryptoError::PassphraseMismatch.into());
    }
    if passphrase.is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }

    Ok(Passphrase::new(passphrase.into_bytes()))
}

/// Prompts for the passphrase of an existing journal.
fn prompt_for_existing_passphrase() -> AppResult<Passphrase> {
    debug!("Prompting for existing passphrase");

    let passphrase = rpassword::prompt_password("Enter passphrase: ")
        .map_err(|e| CryptoError::PassphrasePrompt(e.to_string()))?;

    if passphrase.is_empty() {
        return Err(CryptoError::EmptyPassphrase.into());
    }

    Ok(Passphrase::new(passphrase.into_bytes()))
}

/// Obtains the passphrase, preferring the `VELLUM_PASSPHRASE` environment
/// variable over an interactive prompt.
///
/// `journal_exists` selects between the single prompt (unlocking an existing
/// journal) and the confirm-twice prompt (creating a new one).
///
/// # Errors
///
/// Returns an error if the prompt fails, the confirmation mismatches, or the
/// passphrase is empty.
pub fn obtain_passphrase(journal_exists: bool) -> AppResult<Passphrase> {
    if let Ok(value) = env::var(ENV_VAR_PASSPHRASE) {
        debug!("Using passphrase from {}", ENV_VAR_PASSPHRASE);
        if value.is_empty() {
            return Err(CryptoError::EmptyPassphrase.into());
        }
        return Ok(Passphrase::new(value.into_bytes()));
    }
    if journal_exists {
        prompt_for_existing_passphrase()
    } else {
        prompt_for_new_passphrase()
    }
}

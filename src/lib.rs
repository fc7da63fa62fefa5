/*!
# Vellum

Vellum is a single-user encrypted journal: a local file holding a growable
set of timestamped, independently-encrypted text entries, opened and
rewritten by one process at a time.

## Core guarantees

- Confidentiality and integrity of every entry via XChaCha20-Poly1305 with
  a memory-hard Argon2id key derivation per entry
- Atomic persistence (temp file + rename), so a crash mid-write never
  exposes a half-written journal
- Best-effort detection of concurrent writers through the backing file's
  modification time
- Deterministic rejection of corrupted or foreign-version files

## Architecture

- `cli`: command-line interface handling using clap
- `config`: configuration loading and validation
- `constants`: on-disk format parameters and application metadata
- `crypto`: passphrase handling, key derivation, and the entry cipher
- `errors`: error handling infrastructure
- `journal`: the journal store and its binary codec

## Usage Example

```no_run
use vellum::crypto::Passphrase;
use vellum::journal::{Entry, Journal};

fn main() -> vellum::AppResult<()> {
    let passphrase = Passphrase::from("correct horse battery staple");
    let mut journal = Journal::open("/home/me/.vellum/journal", &passphrase)?;

    journal.add_entry(Entry::encrypt("Wrote some Rust today.", &passphrase)?)?;
    journal.write()?;

    let mut timestamps = journal.entries();
    timestamps.sort_unstable();
    for ts in timestamps {
        if let Some(entry) = journal.entry(ts) {
            println!("{}: {}", ts, entry.decrypt(&passphrase)?);
        }
    }
    journal.close()
}
```
*/

/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Centralized constants for the on-disk format and application metadata
pub mod constants;
/// Cryptographic operations: passphrase handling, KDF, and the entry cipher
pub mod crypto;
/// Error types and utilities for error handling
pub mod errors;
/// The journal store and its binary entry codec
pub mod journal;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use crypto::Passphrase;
pub use errors::{AppError, AppResult};
pub use journal::{Entry, Journal};

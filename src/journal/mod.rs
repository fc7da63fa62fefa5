//! The journal store: an encrypted, timestamped entry set backed by one file.
//!
//! A journal owns the full set of encrypted entries, keyed by their
//! microsecond timestamps. Mutations happen in memory and are persisted as a
//! whole by [`Journal::write`], which writes a temporary file in the same
//! directory and atomically renames it over the destination so that no reader
//! ever observes a half-written file. Concurrent instances of the program are
//! detected optimistically: every write compares the file's modification time
//! against the last one this handle observed and refuses to overwrite on
//! mismatch.
//!
//! The reserved timestamp `0` holds the sentinel entry: a random string
//! encrypted when the journal is created, decrypted on every open to verify
//! the supplied passphrase. It is never surfaced by the enumeration methods.

pub mod codec;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::constants::{
    JOURNAL_VERSION, NONCE_PREFIX_LEN, SALT_LEN, SENTINEL_TIMESTAMP,
};
use crate::crypto::{decrypt_text, encrypt_text, KdfParams, Passphrase};
use crate::errors::{AppError, AppResult, CryptoError, JournalError};

/// One encrypted journal record.
///
/// The timestamp doubles as the unique key within a journal and as part of
/// the encryption nonce; the salt and nonce prefix are generated fresh when
/// the entry is encrypted and never reused.
pub struct Entry {
    pub(crate) timestamp: u64,
    pub(crate) salt: [u8; SALT_LEN],
    pub(crate) nonce_prefix: [u8; NONCE_PREFIX_LEN],
    pub(crate) ciphertext: Vec<u8>,
}

impl Entry {
    /// Encrypts `text` into a new entry stamped with the current time,
    /// using the default key-derivation profile.
    pub fn encrypt(text: &str, passphrase: &Passphrase) -> AppResult<Self> {
        Self::encrypt_at(text, now_micros(), passphrase, &KdfParams::default())
    }

    /// Encrypts `text` into a new entry at an explicit timestamp.
    ///
    /// The timestamp becomes the entry's key and part of its nonce, so
    /// callers must not reuse one within a journal — `add_entry` rejects
    /// duplicates.
    pub fn encrypt_at(
        text: &str,
        timestamp: u64,
        passphrase: &Passphrase,
        params: &KdfParams,
    ) -> AppResult<Self> {
        let (ciphertext, salt, nonce_prefix) =
            encrypt_text(passphrase, text, timestamp, params)?;
        Ok(Entry {
            timestamp,
            salt,
            nonce_prefix,
            ciphertext,
        })
    }

    /// The entry's timestamp in microseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Decrypts the entry text using the default key-derivation profile.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::AuthenticationFailed` on a wrong passphrase or
    /// any tampering with the stored record.
    pub fn decrypt(&self, passphrase: &Passphrase) -> AppResult<String> {
        self.decrypt_with(passphrase, &KdfParams::default())
    }

    /// Decrypts the entry text with an explicit key-derivation profile.
    pub fn decrypt_with(&self, passphrase: &Passphrase, params: &KdfParams) -> AppResult<String> {
        Ok(decrypt_text(
            passphrase,
            &self.ciphertext,
            &self.salt,
            &self.nonce_prefix,
            self.timestamp,
            params,
        )?)
    }
}

/// The current time in microseconds since the Unix epoch.
pub fn now_micros() -> u64 {
    Utc::now().timestamp_micros() as u64
}

/// The random plaintext stored in the sentinel entry. Its content is
/// irrelevant; only that it decrypts under the right passphrase matters.
fn sentinel_text() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(26)
        .map(char::from)
        .collect()
}

/// An open journal file.
///
/// Constructed by [`Journal::open`], mutated in memory by
/// [`Journal::add_entry`] / [`Journal::delete_entry`], persisted by
/// [`Journal::write`], and torn down by [`Journal::close`], after which all
/// mutating operations fail with [`JournalError::Closed`].
pub struct Journal {
    version: u8,
    path: PathBuf,
    entries: HashMap<u64, Entry>,
    dirty: bool,
    last_observed_mtime: Option<SystemTime>,
    closed: bool,
    kdf: KdfParams,
}

impl Journal {
    /// Opens the journal at `path` with the default key-derivation profile.
    ///
    /// If no file exists there, a new journal is created: a sentinel entry is
    /// encrypted under `passphrase` and written to disk through the full
    /// atomic write path. If a file exists, it is read and validated. In both
    /// cases the sentinel is decrypted to verify the passphrase before the
    /// journal is returned.
    ///
    /// # Errors
    ///
    /// - `JournalError::PathIsDirectory` if `path` is a directory
    /// - `JournalError::UnsupportedVersion` for a foreign version byte
    /// - `JournalError::EmptyFile` for an existing zero-length file
    /// - `CryptoError::AuthenticationFailed` if the passphrase does not
    ///   decrypt the sentinel — indistinguishable from a corrupted sentinel,
    ///   by design: either way the journal cannot be trusted with this
    ///   passphrase
    pub fn open<P: Into<PathBuf>>(path: P, passphrase: &Passphrase) -> AppResult<Self> {
        Self::open_with_params(path, passphrase, KdfParams::default())
    }

    /// Opens the journal with an explicit key-derivation profile.
    ///
    /// A journal file can only ever be used with the profile it was created
    /// with; the parameters are not recorded in the file.
    pub fn open_with_params<P: Into<PathBuf>>(
        path: P,
        passphrase: &Passphrase,
        kdf: KdfParams,
    ) -> AppResult<Self> {
        let mut journal = Journal {
            version: JOURNAL_VERSION,
            path: path.into(),
            entries: HashMap::new(),
            dirty: false,
            last_observed_mtime: None,
            closed: false,
            kdf,
        };

        match fs::metadata(&journal.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %journal.path.display(), "creating new journal");
                let sentinel = Entry::encrypt_at(
                    &sentinel_text(),
                    SENTINEL_TIMESTAMP,
                    passphrase,
                    &journal.kdf,
                )?;
                journal.add_entry(sentinel)?;
                journal.write()?;
            }
            Err(e) => return Err(e.into()),
            Ok(meta) if meta.is_dir() => {
                return Err(JournalError::PathIsDirectory(journal.path).into());
            }
            Ok(_) => {}
        }

        journal.read()?;

        // Verify the passphrase against the sentinel. A journal without a
        // sentinel cannot be trusted either, so it reports the same failure.
        let sentinel = journal
            .entries
            .get(&SENTINEL_TIMESTAMP)
            .ok_or(CryptoError::AuthenticationFailed)?;
        sentinel.decrypt_with(passphrase, &journal.kdf)?;

        info!(
            path = %journal.path.display(),
            entries = journal.entries.len() - 1,
            "journal opened"
        );
        Ok(journal)
    }

    /// The path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The key-derivation profile this journal was opened with.
    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// Whether in-memory state has unpersisted changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the journal has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// All entry timestamps except the reserved sentinel, in no particular
    /// order. Callers needing order must sort. Empty once closed.
    pub fn entries(&self) -> Vec<u64> {
        if self.closed {
            return Vec::new();
        }
        self.entries
            .keys()
            .copied()
            .filter(|&ts| ts != SENTINEL_TIMESTAMP)
            .collect()
    }

    /// The entry at `timestamp`, or `None` if absent or the journal is
    /// closed.
    pub fn entry(&self, timestamp: u64) -> Option<&Entry> {
        if self.closed {
            return None;
        }
        self.entries.get(&timestamp)
    }

    /// The greatest non-sentinel timestamp, or `0` if there are no entries.
    pub fn latest_entry(&self) -> u64 {
        self.entries().into_iter().max().unwrap_or(0)
    }

    /// The predecessor of `current` in sorted timestamp order, or `0` if
    /// `current` is the first entry or not found. Note that `0` is also the
    /// reserved sentinel key; it never denotes a real entry here.
    pub fn previous_entry(&self, current: u64) -> u64 {
        let timestamps = self.sorted_entries();
        match timestamps.iter().position(|&ts| ts == current) {
            Some(0) | None => 0,
            Some(i) => timestamps[i - 1],
        }
    }

    /// The successor of `current` in sorted timestamp order, or `0` if
    /// `current` is the last entry or not found.
    pub fn next_entry(&self, current: u64) -> u64 {
        let timestamps = self.sorted_entries();
        match timestamps.iter().position(|&ts| ts == current) {
            Some(i) if i + 1 < timestamps.len() => timestamps[i + 1],
            _ => 0,
        }
    }

    fn sorted_entries(&self) -> Vec<u64> {
        let mut timestamps = self.entries();
        timestamps.sort_unstable();
        timestamps
    }

    /// Inserts an entry, keyed by its timestamp, and marks the journal dirty.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::EntryIdAlreadyExists` if an entry with the same
    /// timestamp is present — timestamps are unique keys, never overwritten.
    pub fn add_entry(&mut self, entry: Entry) -> AppResult<()> {
        self.ensure_open()?;
        if self.entries.contains_key(&entry.timestamp) {
            return Err(JournalError::EntryIdAlreadyExists(entry.timestamp).into());
        }
        self.entries.insert(entry.timestamp, entry);
        self.dirty = true;
        Ok(())
    }

    /// Removes the entry at `timestamp` and marks the journal dirty.
    /// Deleting a nonexistent timestamp is a no-op, not an error.
    pub fn delete_entry(&mut self, timestamp: u64) -> AppResult<()> {
        self.ensure_open()?;
        self.entries.remove(&timestamp);
        self.dirty = true;
        Ok(())
    }

    /// Persists the journal if dirty.
    ///
    /// The backing file is re-statted first: if its modification time differs
    /// from the one this handle last observed, another process has written it
    /// and the call fails with `FileModifiedExternally` without touching the
    /// file. Otherwise all entries are encoded behind the version byte into a
    /// uniquely named temporary file in the same directory, which is then
    /// atomically renamed over the destination — the destination is never
    /// written in place.
    ///
    /// # Errors
    ///
    /// - `JournalError::Closed` after `close`
    /// - `JournalError::FileModifiedExternally` on an mtime mismatch; recover
    ///   by re-opening, or by calling [`Journal::accept_external_changes`]
    ///   and writing again to deliberately overwrite
    /// - any underlying I/O error; failures before the rename leave the
    ///   original file untouched
    pub fn write(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        if self.externally_modified()? {
            warn!(path = %self.path.display(), "refusing to write: file modified externally");
            return Err(JournalError::FileModifiedExternally.into());
        }
        if self.dirty {
            let parent = match self.path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            let mut tmp = NamedTempFile::new_in(parent)?;
            tmp.write_all(&[self.version])?;
            tmp.write_all(&codec::encode_entries(self.entries.values()))?;
            tmp.as_file().sync_all()?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                tmp.as_file().set_permissions(fs::Permissions::from_mode(
                    crate::constants::JOURNAL_FILE_PERMISSIONS,
                ))?;
            }
            tmp.persist(&self.path).map_err(|e| AppError::Io(e.error))?;
            self.dirty = false;
            debug!(
                path = %self.path.display(),
                entries = self.entries.len(),
                "journal written"
            );
        }
        self.refresh_observed_mtime()
    }

    /// Flushes pending changes and closes the journal.
    ///
    /// The journal is marked closed even if the flush fails; the flush error
    /// is returned so the caller can report unpersisted changes. Closing an
    /// already-closed journal is a no-op.
    pub fn close(&mut self) -> AppResult<()> {
        if self.closed {
            return Ok(());
        }
        let flushed = self.write();
        self.closed = true;
        debug!(path = %self.path.display(), "journal closed");
        flushed
    }

    /// Whether the backing file has been modified since this handle last
    /// read or wrote it. A missing file counts as unmodified so that the
    /// first write of a new journal can proceed.
    pub fn externally_modified(&self) -> AppResult<bool> {
        match fs::metadata(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
            Ok(meta) => {
                let mtime = meta.modified()?;
                Ok(self.last_observed_mtime != Some(mtime))
            }
        }
    }

    /// Adopts the backing file's current modification time so that the next
    /// [`Journal::write`] overwrites it despite the conflict.
    ///
    /// This is the explicit recovery path after `FileModifiedExternally`. It
    /// is never invoked automatically: overwriting discards whatever the
    /// other process wrote, so the decision belongs to the caller.
    pub fn accept_external_changes(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        self.refresh_observed_mtime()
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed {
            return Err(JournalError::Closed.into());
        }
        Ok(())
    }

    fn refresh_observed_mtime(&mut self) -> AppResult<()> {
        match fs::metadata(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.last_observed_mtime = None;
                Ok(())
            }
            Err(e) => Err(e.into()),
            Ok(meta) => {
                self.last_observed_mtime = Some(meta.modified()?);
                Ok(())
            }
        }
    }

    /// Reads and validates the backing file, replacing the in-memory entry
    /// set.
    fn read(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        let data = fs::read(&self.path)?;
        let Some((&version, body)) = data.split_first() else {
            return Err(JournalError::EmptyFile(self.path.clone()).into());
        };
        // One arm per known format version; anything else is rejected
        // before any record is parsed.
        match version {
            JOURNAL_VERSION => self.version = version,
            other => return Err(JournalError::UnsupportedVersion(other).into()),
        }
        self.entries = codec::decode_entries(body)
            .into_iter()
            .map(|entry| (entry.timestamp, entry))
            .collect();
        self.refresh_observed_mtime()
    }
}

/// Ensures the directory that will hold the journal file exists, creating it
/// (and parents) with owner-only permissions if necessary.
pub fn ensure_parent_directory_exists(journal_path: &Path) -> AppResult<()> {
    let Some(parent) = journal_path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(());
    }
    fs::create_dir_all(parent)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(
            parent,
            fs::Permissions::from_mode(crate::constants::JOURNAL_DIR_PERMISSIONS),
        )?;
    }
    Ok(())
}

//! Argon2id key derivation.
//!
//! Turns the passphrase plus a per-entry random 12-byte salt into a 256-bit
//! symmetric key. Argon2id is memory-hard by design so that offline
//! brute-forcing of a stolen journal file stays expensive. Derivation is
//! deterministic: the same passphrase and salt always reproduce the same key
//! bit-for-bit, which is what lets each entry be decrypted again later.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{KEY_LEN, SALT_LEN};
use crate::crypto::Passphrase;
use crate::errors::CryptoError;

/// Tuning parameters for the Argon2id key derivation function.
///
/// `Default` is the production profile the journal format was defined with.
/// Lighter parameters exist for tests only; two keys derived with different
/// parameter sets do not match, so everything touching one journal file must
/// use one profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub m_cost: u32,
    /// Number of passes over memory.
    pub t_cost: u32,
    /// Degree of parallelism.
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: 128 * 1024, // 128 MiB
            t_cost: 10,
            p_cost: 2,
        }
    }
}

impl KdfParams {
    /// A cheap profile for tests. Not for journal data that should survive.
    pub fn light() -> Self {
        Self {
            m_cost: 256,
            t_cost: 1,
            p_cost: 1,
        }
    }
}

/// A 256-bit key derived by Argon2id, zeroized when dropped.
///
/// Does not implement `Clone` or `Debug`, so the key material cannot leak
/// through copies or log output.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; KEY_LEN]);

impl DerivedKey {
    /// Returns the raw key bytes for handing to the cipher.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Derives a 256-bit key from the passphrase and salt.
///
/// The passphrase bytes are exposed only for the span of this call; the
/// returned key wipes itself when dropped.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if the parameters are rejected by
/// the underlying implementation (e.g. zero passes).
pub fn derive_key(
    passphrase: &Passphrase,
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<DerivedKey, CryptoError> {
    let argon2_params =
        argon2::Params::new(params.m_cost, params.t_cost, params.p_cost, Some(KEY_LEN))
            .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut output = [0u8; KEY_LEN];
    let result = passphrase.expose(|bytes| argon2.hash_password_into(bytes, salt, &mut output));
    match result {
        Ok(()) => Ok(DerivedKey(output)),
        Err(e) => {
            output.zeroize();
            Err(CryptoError::KeyDerivation(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let passphrase = Passphrase::from("correct horse battery staple");
        let salt = [7u8; SALT_LEN];
        let params = KdfParams::light();

        let key1 = derive_key(&passphrase, &salt, &params).unwrap();
        let key2 = derive_key(&passphrase, &salt, &params).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_passphrases_yield_different_keys() {
        let salt = [7u8; SALT_LEN];
        let params = KdfParams::light();

        let key_a = derive_key(&Passphrase::from("passphrase a"), &salt, &params).unwrap();
        let key_b = derive_key(&Passphrase::from("passphrase b"), &salt, &params).unwrap();
        assert_ne!(key_a.as_bytes(), key_b.as_bytes());
    }

    #[test]
    fn test_different_salts_yield_different_keys() {
        let passphrase = Passphrase::from("same passphrase");
        let params = KdfParams::light();

        let key_a = derive_key(&passphrase, &[1u8; SALT_LEN], &params).unwrap();
        let key_b = derive_key(&passphrase, &[2u8; SALT_LEN], &params).unwrap();
        assert_ne!(key_a.as_bytes(), key_b.as_bytes());
    }

    #[test]
    fn test_zero_t_cost_rejected() {
        let params = KdfParams {
            t_cost: 0,
            ..KdfParams::light()
        };
        let result = derive_key(&Passphrase::from("pw"), &[0u8; SALT_LEN], &params);
        assert!(matches!(result, Err(CryptoError::KeyDerivation(_))));
    }

    #[test]
    fn test_default_params_match_format_profile() {
        let params = KdfParams::default();
        assert_eq!(params.m_cost, 131_072);
        assert_eq!(params.t_cost, 10);
        assert_eq!(params.p_cost, 2);
    }
}

//! Argon2id password hashing and verification.
//!
//! Hashes are PHC strings, so the salt and cost parameters travel with the
//! hash and verification needs no configuration.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Fixed work factor applied to every new hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    fn hasher(&self) -> Result<Argon2<'static>, AuthError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(AuthError::internal)?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str, params: &HashParams) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = params
        .hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(AuthError::internal)?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; a stored hash that does not parse is an internal error.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(phc).map_err(AuthError::internal)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::internal(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> HashParams {
        HashParams { memory_kib: 64, iterations: 1, parallelism: 1 }
    }

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("Bunny22", &cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "Bunny22");
        assert!(verify_password("Bunny22", &hash).unwrap());
        assert!(!verify_password("bunny22", &hash).unwrap());
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("same", &cheap()).unwrap();
        let b = hash_password("same", &cheap()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn params_are_embedded() {
        let hash = hash_password("pw", &cheap()).unwrap();
        assert!(hash.contains("m=64,t=1,p=1"), "{hash}");
    }

    #[test]
    fn malformed_hash_is_internal() {
        assert!(verify_password("pw", "not-a-phc-string").unwrap_err().is_internal());
    }

    #[test]
    fn invalid_params_rejected() {
        let bad = HashParams { memory_kib: 1, iterations: 1, parallelism: 1 };
        assert!(hash_password("pw", &bad).unwrap_err().is_internal());
    }
}

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

const SALT_LEN: usize = 16;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("invalid argon2 parameters: {0}")]
    Params(argon2::Error),
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("stored credential is not a valid password hash")]
    MalformedHash,
}

/// Salted Argon2id hashing for student passwords.
///
/// Hashes are stored in PHC string form, so the salt and cost travel with the
/// hash and verification keeps working after the cost is raised.
#[derive(Clone)]
pub struct Credentials {
    argon2: Argon2<'static>,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

impl Credentials {
    /// Argon2id with an explicit memory (KiB) and iteration cost.
    pub fn with_cost(memory_kib: u32, iterations: u32) -> Result<Self, CredentialError> {
        let params =
            Params::new(memory_kib, iterations, 1, None).map_err(CredentialError::Params)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes).map_err(CredentialError::Hash)?;

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(CredentialError::Hash)?;
        Ok(hash.to_string())
    }

    /// Constant-time check of `password` against a stored PHC hash.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(stored).map_err(|_| CredentialError::MalformedHash)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(other) => Err(CredentialError::Hash(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::with_cost(1024, 1).expect("valid params")
    }

    #[test]
    fn hash_is_salted_and_verifiable() {
        let credentials = credentials();
        let first = credentials.hash("password123").expect("hashes");
        let second = credentials.hash("password123").expect("hashes");

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, "password123");
        assert_ne!(first, second, "salts must differ");
        assert!(credentials.verify("password123", &first).expect("verifies"));
        assert!(!credentials.verify("password124", &first).expect("verifies"));
    }

    #[test]
    fn plaintext_stored_values_are_rejected() {
        let err = credentials()
            .verify("password123", "password123")
            .expect_err("plaintext is not a hash");
        assert!(matches!(err, CredentialError::MalformedHash));
    }
}

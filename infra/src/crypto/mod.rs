//! Password hashing via bcrypt.

use itsp_core::services::PasswordHasherTrait;

/// Work factor used for credential hashes.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// bcrypt implementation of the password hasher collaborator
#[derive(Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasherTrait for BcryptPasswordHasher {
    fn hash(&self, plain: &str) -> Result<String, String> {
        bcrypt::hash(plain, self.cost).map_err(|e| format!("Hashing failed: {}", e))
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, String> {
        bcrypt::verify(plain, hash).map_err(|e| format!("Verification failed: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the test fast; production wiring uses the default
    #[test]
    fn test_hash_round_trip() {
        let hasher = BcryptPasswordHasher::new(4);
        let hash = hasher.hash("Passw0rd").unwrap();
        assert_ne!(hash, "Passw0rd");
        assert!(hasher.verify("Passw0rd", &hash).unwrap());
        assert!(!hasher.verify("passw0rd", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = BcryptPasswordHasher::new(4);
        let first = hasher.hash("Passw0rd").unwrap();
        let second = hasher.hash("Passw0rd").unwrap();
        assert_ne!(first, second);
    }
}

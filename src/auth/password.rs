use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hashes `password` with Argon2id and a fresh random salt, returning the PHC
/// string to store.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))
}

/// A stored hash that does not parse never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is unreadable: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let hash = hash_password("Treasure1").expect("hashing should work");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Treasure1", &hash));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("Treasure1").expect("hashing should work");
        assert!(!verify_password("treasure1", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn salts_differ_between_calls() {
        let a = hash_password("Treasure1").expect("hashing should work");
        let b = hash_password("Treasure1").expect("hashing should work");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("Treasure1", "not-a-phc-string"));
        assert!(!verify_password("Treasure1", ""));
    }
}

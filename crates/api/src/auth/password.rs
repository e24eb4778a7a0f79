//! Password hashing
//!
//! bcrypt with per-password salts. bcrypt only reads the first 72
//! bytes of input, so longer passwords are truncated up front; hashing
//! and verification apply the same rule, which keeps the two sides
//! consistent for any input length.

/// Hard ceiling on password input length, in bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

fn truncate(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    if bytes.len() > MAX_PASSWORD_BYTES {
        &bytes[..MAX_PASSWORD_BYTES]
    } else {
        bytes
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(truncate(password), bcrypt::DEFAULT_COST)
}

/// Verify a password against a stored hash. A malformed stored hash
/// verifies as false rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(truncate(password), hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn produces_bcrypt_format() {
        let hash = hash_password("pw").unwrap();
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn long_passwords_truncate_to_prefix() {
        let long: String = "x".repeat(100);
        let hash = hash_password(&long).unwrap();
        // Only the first 72 bytes participate.
        assert!(verify_password(&long[..MAX_PASSWORD_BYTES], &hash));
        assert!(verify_password(&long, &hash));
    }

    #[test]
    fn empty_password_is_hashable() {
        let hash = hash_password("").unwrap();
        assert!(verify_password("", &hash));
        assert!(!verify_password("nonempty", &hash));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
    }
}

//! Argon2id password hashing and verification.
//!
//! Every hash gets a fresh random salt from [`OsRng`] and is stored as a PHC
//! string, so the algorithm parameters and salt travel with the digest.

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password with Argon2id (default work factor) and a new salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// The digest comparison inside argon2 is constant-time. A stored value that
/// is not a parsable PHC string verifies as `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Runs a full verification against a throwaway hash so a login for an unknown
/// username costs the same as one with a wrong password.
pub fn burn_verification(password: &str) {
    static DUMMY: OnceLock<String> = OnceLock::new();
    let hash = DUMMY.get_or_init(|| hash_password("chief-dummy-password").unwrap_or_default());
    let _ = verify_password(password, hash);
}

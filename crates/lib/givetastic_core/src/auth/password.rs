//! Password policy and hashing via bcrypt.

use crate::store::IdentityError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Shortest password an identity store accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Reject passwords shorter than [`MIN_PASSWORD_LEN`] characters.
pub fn check_strength(password: &str) -> Result<(), IdentityError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(IdentityError::WeakPassword(MIN_PASSWORD_LEN));
    }
    Ok(())
}

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| IdentityError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, IdentityError> {
    bcrypt::verify(password, hash)
        .map_err(|e| IdentityError::Internal(format!("bcrypt verify: {e}")))
}

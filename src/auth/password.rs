use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt work factor used for every stored password.
pub const PASSWORD_COST: u32 = 12;

/// Shortest password accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, PASSWORD_COST)
}

pub(crate) fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(password, cost)?)
}

/// Checks `password` against a stored hash.
///
/// A stored hash that bcrypt cannot parse counts as a mismatch rather than a
/// server error, so a corrupt row cannot be used to enumerate accounts.
pub fn verify_password(password: &str, hashed_password: &str) -> bool {
    match verify(password, hashed_password) {
        Ok(matches) => matches,
        Err(e) => {
            log::warn!("unreadable password hash: {}", e);
            false
        }
    }
}

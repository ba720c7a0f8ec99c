//! Password hashing and the password strength policy.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::{MarketError, Result};

/// Minimum number of characters in an accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Passwords rejected outright no matter their length.
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "abc12345",
    "11111111",
    "00000000",
    "letmein1",
    "welcome1",
    "admin1234",
    "sunshine",
    "football",
    "baseball",
    "princess",
    "trustno1",
];

/// Hashes `raw` with Argon2id and a fresh random salt. The result is a PHC string.
pub fn hash_password(raw: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(raw.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `raw` against a stored PHC hash.
pub fn verify_password(raw: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)?;
    Ok(Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok())
}

/// Strength checks applied on signup and password change.
///
/// `attributes` are values from the account (username, email) the password
/// must not resemble.
pub fn validate_password(raw: &str, attributes: &[&str]) -> Result<()> {
    let mut problems: Vec<String> = Vec::new();

    if raw.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "This password is too short. It must contain at least {} characters.",
            MIN_PASSWORD_LEN
        ));
    }

    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        problems.push("This password is entirely numeric.".to_string());
    }

    let lowered = raw.to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        problems.push("This password is too common.".to_string());
    }

    if attributes
        .iter()
        .any(|attribute| is_similar(&lowered, attribute))
    {
        problems.push("The password is too similar to the account details.".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(MarketError::Policy(problems.join(" ")))
    }
}

/// A password resembles an attribute when one contains the other. For emails
/// only the local part is compared.
fn is_similar(lowered_password: &str, attribute: &str) -> bool {
    let attribute = attribute.split('@').next().unwrap_or_default().to_lowercase();
    if attribute.chars().count() < 3 {
        return false;
    }
    lowered_password.contains(&attribute) || attribute.contains(lowered_password)
}

//! Input validation for account fields.
//!
//! Each validator returns the cleaned value or a user-facing message.

/// Minimum display-name length after trimming.
pub const MIN_NAME_LEN: usize = 2;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// bcrypt only reads this many bytes of a password.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Trim and check a display name.
pub fn name(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(format!("Name must be at least {MIN_NAME_LEN} characters"));
    }
    Ok(trimmed.to_string())
}

/// Normalize and check an email address.
pub fn email(raw: &str) -> Result<String, String> {
    let normalized = crate::models::account::normalize_email(raw);
    let invalid = || "Invalid email address".to_string();

    if normalized.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = normalized.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    // Domain needs a dot with something on both sides.
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(normalized),
        _ => Err(invalid()),
    }
}

/// Check a plaintext password before hashing.
pub fn password(raw: &str) -> Result<(), String> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    if raw.len() > MAX_PASSWORD_BYTES {
        return Err(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes"
        ));
    }
    Ok(())
}

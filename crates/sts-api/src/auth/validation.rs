//! Field rules for account data, plugged into `#[validate(custom(...))]`.

use validator::ValidationError;

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Password strength: 8-128 characters with at least one letter and one digit
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(rule(
            "password_too_short",
            "Password must be at least 8 characters long",
        ));
    }

    if password.len() > 128 {
        return Err(rule(
            "password_too_long",
            "Password must be at most 128 characters long",
        ));
    }

    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_number = password.chars().any(|c| c.is_numeric());
    if !has_letter || !has_number {
        return Err(rule(
            "password_too_weak",
            "Password must contain at least one letter and one number",
        ));
    }

    Ok(())
}

/// Usernames: 3-30 characters, letters, digits, underscores and hyphens
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(3..=30).contains(&len) {
        return Err(rule(
            "username_length",
            "Username must be between 3 and 30 characters long",
        ));
    }

    // Rejects any HTML/script characters too
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err(rule(
            "username_charset",
            "Username can only contain letters, numbers, underscores, and hyphens",
        ));
    }

    Ok(())
}

/// Avatar URLs must be HTTPS (or an inline image) and free of script payloads
pub fn validate_avatar_url(url: &str) -> Result<(), ValidationError> {
    if url.len() > 2048 {
        return Err(rule("avatar_url_length", "Avatar URL is too long"));
    }

    if !url.starts_with("https://") && !url.starts_with("data:image/") {
        return Err(rule(
            "avatar_url_scheme",
            "Avatar URL must use HTTPS or be a data URI",
        ));
    }

    let lower = url.to_lowercase();
    if ["javascript:", "data:text/html", "<script", "onerror=", "onload="]
        .iter()
        .any(|pattern| lower.contains(pattern))
    {
        return Err(rule(
            "avatar_url_pattern",
            "Avatar URL contains invalid patterns",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short1").is_err());
        assert!(validate_password("noNumbers").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password(&format!("a1{}", "x".repeat(127))).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("user123").is_ok());
        assert!(validate_username("user_name").is_ok());
        assert!(validate_username("user-name").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username("user name").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
        assert!(validate_username("<script>alert('xss')</script>").is_err());
        assert!(validate_username("user&test").is_err());
    }

    #[test]
    fn test_validate_avatar_url() {
        assert!(validate_avatar_url("https://cdn.example.com/avatar.png").is_ok());
        assert!(validate_avatar_url("data:image/png;base64,iVBORw0KGgo=").is_ok());

        assert!(validate_avatar_url("http://example.com/a.png").is_err());
        assert!(validate_avatar_url("javascript:alert('xss')").is_err());
        assert!(validate_avatar_url("https://example.com/a.png?onerror=alert(1)").is_err());

        let long_url = format!("https://example.com/{}", "a".repeat(2050));
        assert!(validate_avatar_url(&long_url).is_err());
    }
}

/// Password rules applied on registration, password change and admin account creation
///
/// Length between 8 and 128 characters, not all digits, and not containing
/// the account's username (case-insensitive).
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicy {
    pub fn new() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }

    /// Validate a password against all configured rules, failing fast
    pub fn validate(&self, password: &str, username: Option<&str>) -> Result<(), PasswordPolicyError> {
        let length = password.chars().count();
        if length < self.min_length {
            return Err(PasswordPolicyError::TooShort(self.min_length));
        }
        if length > self.max_length {
            return Err(PasswordPolicyError::TooLong(self.max_length));
        }

        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::EntirelyNumeric);
        }

        if let Some(username) = username.filter(|u| !u.is_empty()) {
            if password.to_lowercase().contains(&username.to_lowercase()) {
                return Err(PasswordPolicyError::ContainsUsername);
            }
        }

        Ok(())
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during password validation
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {0} characters")]
    TooShort(usize),

    #[error("Password must not exceed {0} characters")]
    TooLong(usize),

    #[error("Password must not be entirely numeric")]
    EntirelyNumeric,

    #[error("Password must not contain your username")]
    ContainsUsername,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_window() {
        let policy = PasswordPolicy::new();

        assert_eq!(policy.validate("short1", None), Err(PasswordPolicyError::TooShort(8)));
        assert_eq!(policy.validate(&"a".repeat(129), None), Err(PasswordPolicyError::TooLong(128)));
        assert!(policy.validate("long-enough", None).is_ok());
    }

    #[test]
    fn test_numeric_password_rejected() {
        let policy = PasswordPolicy::new();
        assert_eq!(policy.validate("1234567890", None), Err(PasswordPolicyError::EntirelyNumeric));
    }

    #[test]
    fn test_username_substring_rejected_case_insensitively() {
        let policy = PasswordPolicy::new();

        assert_eq!(
            policy.validate("MyNeoPassword", Some("neo")),
            Err(PasswordPolicyError::ContainsUsername)
        );
        assert!(policy.validate("trinity-rules", Some("neo")).is_ok());
    }
}

//! Explicit per-field validators for the registration flow.
//!
//! Each check is a plain function returning `Ok(())` or a human-readable
//! message; [`ValidationReport`] aggregates violations across fields so a
//! request fails once with every problem listed, not on the first one.

use serde::Serialize;

use crate::error::{AuthError, AuthResult};

/// The fixed punctuation set accepted as password "special" characters.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*()_+[]{}|;:,.<>";

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;
/// Maximum password length in characters.
pub const PASSWORD_MAX_LEN: usize = 64;

/// Maximum full-name length in characters.
pub const FULL_NAME_MAX_LEN: usize = 100;

/// A single field-level violation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Aggregated result of validating one request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against a named field.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Run a field check and record its message on failure.
    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Consume the report, producing [`AuthError::Validation`] when any
    /// violation was recorded.
    pub fn into_result(self) -> AuthResult<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(AuthError::Validation(self))
        }
    }
}

/// Structural email check: exactly one `@`, non-empty local part, and a
/// dotted, non-empty domain. Deliverability is proven by the verification
/// ticket flow, not here.
pub fn check_email(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("The email is required".into());
    }
    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("The email is not well-formed".into()),
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || value.chars().any(char::is_whitespace)
    {
        return Err("The email is not well-formed".into());
    }
    Ok(())
}

/// Password complexity policy: 8-64 characters with at least one uppercase
/// letter, one lowercase letter, one digit, and one character from
/// [`PASSWORD_SPECIALS`].
pub fn check_password(value: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < PASSWORD_MIN_LEN || len > PASSWORD_MAX_LEN {
        return Err(format!(
            "The password should be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters"
        ));
    }

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for ch in value.chars() {
        if ch.is_uppercase() {
            has_upper = true;
        } else if ch.is_lowercase() {
            has_lower = true;
        } else if ch.is_ascii_digit() {
            has_digit = true;
        } else if PASSWORD_SPECIALS.contains(ch) {
            has_special = true;
        }
        if has_upper && has_lower && has_digit && has_special {
            return Ok(());
        }
    }

    Err(
        "The password must contain an uppercase letter, a lowercase letter, \
         a digit, and a special character"
            .into(),
    )
}

/// E.164 phone check: a leading `+`, a first digit 1-9, and 2 to 15 digits
/// in total with nothing else.
pub fn check_phone(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("The phone number is required".into());
    }
    let digits = match value.strip_prefix('+') {
        Some(rest) => rest,
        None => return Err("The phone number must be in E.164 format".into()),
    };
    let count = digits.chars().count();
    if count < 2
        || count > 15
        || !digits.chars().all(|c| c.is_ascii_digit())
        || digits.starts_with('0')
    {
        return Err("The phone number must be in E.164 format".into());
    }
    Ok(())
}

/// Full name check: non-blank, at most [`FULL_NAME_MAX_LEN`] characters.
pub fn check_full_name(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("Full name is required".into());
    }
    if value.chars().count() > FULL_NAME_MAX_LEN {
        return Err(format!(
            "Full name must not exceed {FULL_NAME_MAX_LEN} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_policy_boundaries() {
        // 7 characters: too short.
        assert!(check_password("short1!").is_err());
        // No uppercase letter.
        assert!(check_password("alllowercase1!").is_err());
        // No special character.
        assert!(check_password("Abc123456").is_err());
        // Meets every class requirement.
        assert!(check_password("Abc12345!").is_ok());
        // 65 characters: too long even with all classes present.
        let long = format!("Aa1!{}", "x".repeat(61));
        assert_eq!(long.chars().count(), 65);
        assert!(check_password(&long).is_err());
    }

    #[test]
    fn password_accepts_every_listed_special() {
        for special in PASSWORD_SPECIALS.chars() {
            let candidate = format!("Abc12345{special}");
            assert!(
                check_password(&candidate).is_ok(),
                "special {special:?} should satisfy the policy"
            );
        }
    }

    #[test]
    fn phone_e164() {
        assert!(check_phone("+375291234567").is_ok());
        assert!(check_phone("+12025550123").is_ok());
        // Missing plus.
        assert!(check_phone("375291234567").is_err());
        // Leading zero after the plus.
        assert!(check_phone("+0751234567").is_err());
        // Non-digit payload.
        assert!(check_phone("+37529abc").is_err());
        // Too long (16 digits).
        assert!(check_phone("+1234567890123456").is_err());
        assert!(check_phone("").is_err());
    }

    #[test]
    fn email_structure() {
        assert!(check_email("a@b.com").is_ok());
        assert!(check_email("user.name@sub.example.org").is_ok());
        assert!(check_email("no-at-sign").is_err());
        assert!(check_email("two@@example.com").is_err());
        assert!(check_email("@example.com").is_err());
        assert!(check_email("user@nodot").is_err());
        assert!(check_email("user@.com").is_err());
        assert!(check_email("").is_err());
    }

    #[test]
    fn full_name_limits() {
        assert!(check_full_name("A B").is_ok());
        assert!(check_full_name("   ").is_err());
        assert!(check_full_name(&"x".repeat(101)).is_err());
        assert!(check_full_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn report_aggregates_all_violations() {
        let mut report = ValidationReport::new();
        report.check("password", check_password("short1!"));
        report.check("phone", check_phone("not-a-phone"));
        report.check("email", check_email("a@b.com"));

        assert!(!report.is_ok());
        assert_eq!(report.violations().len(), 2);
        let fields: Vec<&str> = report
            .violations()
            .iter()
            .map(|v| v.field.as_str())
            .collect();
        assert_eq!(fields, vec!["password", "phone"]);

        match report.into_result() {
            Err(AuthError::Validation(r)) => assert_eq!(r.violations().len(), 2),
            other => panic!("expected Validation error, got {other:?}"),
        }
    }
}

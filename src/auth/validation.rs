//! Form validation for the credential and profile forms.
//!
//! Every failing field is reported at once, keyed by the field name the
//! client sent.

use crate::auth::dto::{SignInRequest, SignUpRequest};
use crate::error::FieldErrors;

pub const PHONE_TOO_SHORT: &str = "Phone number must be at least 10 digits";
pub const WEAK_PASSWORD: &str = "Password must contain uppercase, lowercase, and number";
pub const PASSWORD_MISMATCH: &str = "Passwords don't match";

/// A single check against a string field.
#[derive(Debug, Clone, Copy)]
pub enum Rule<'a> {
    MinChars(usize, &'static str),
    /// At least one lowercase letter, one uppercase letter and one digit.
    StrongPassword,
    Equals(&'a str, &'static str),
    /// `#rrggbb`.
    HexColor,
}

impl Rule<'_> {
    pub fn check(&self, value: &str) -> Option<String> {
        match self {
            Rule::MinChars(min, msg) => (value.chars().count() < *min).then(|| msg.to_string()),
            Rule::StrongPassword => {
                let lower = value.chars().any(|c| c.is_ascii_lowercase());
                let upper = value.chars().any(|c| c.is_ascii_uppercase());
                let digit = value.chars().any(|c| c.is_ascii_digit());
                (!(lower && upper && digit)).then(|| WEAK_PASSWORD.to_string())
            }
            Rule::Equals(other, msg) => (value != *other).then(|| msg.to_string()),
            Rule::HexColor => {
                let ok = value.len() == 7
                    && value.starts_with('#')
                    && value[1..].chars().all(|c| c.is_ascii_hexdigit());
                (!ok).then(|| "Color must look like #rrggbb".to_string())
            }
        }
    }
}

/// Collects the first failing rule per field.
#[derive(Debug, Default)]
pub struct Checks {
    errors: FieldErrors,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &'static str, value: &str, rules: &[Rule<'_>]) -> Self {
        if let Some(msg) = rules.iter().find_map(|r| r.check(value)) {
            self.errors.insert(name, msg);
        }
        self
    }

    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

/// Rules shared by sign-up and password change for a new password.
pub fn new_password_rules() -> [Rule<'static>; 2] {
    [
        Rule::MinChars(8, "Password must be at least 8 characters"),
        Rule::StrongPassword,
    ]
}

pub fn phone_rules() -> [Rule<'static>; 1] {
    [Rule::MinChars(10, PHONE_TOO_SHORT)]
}

pub fn name_rules() -> [Rule<'static>; 1] {
    [Rule::MinChars(2, "Name must be at least 2 characters")]
}

impl Validate for SignInRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .field("phone_number", &self.phone_number, &phone_rules())
            .field(
                "password",
                &self.password,
                &[Rule::MinChars(6, "Password must be at least 6 characters")],
            )
            .finish()
    }
}

impl Validate for SignUpRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        Checks::new()
            .field("name", &self.name, &name_rules())
            .field("phone_number", &self.phone_number, &phone_rules())
            .field("password", &self.password, &new_password_rules())
            .field(
                "confirm_password",
                &self.confirm_password,
                &[Rule::Equals(&self.password, PASSWORD_MISMATCH)],
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(password: &str, confirm: &str) -> SignUpRequest {
        SignUpRequest {
            name: "Asha".into(),
            phone_number: "9876543210".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn sign_up_accepts_strong_matching_password() {
        assert!(sign_up("Budget2024", "Budget2024").validate().is_ok());
    }

    #[test]
    fn sign_up_rejects_password_without_uppercase() {
        let errs = sign_up("budget2024", "budget2024").validate().unwrap_err();
        assert_eq!(errs["password"], WEAK_PASSWORD);
    }

    #[test]
    fn sign_up_rejects_password_without_lowercase() {
        let errs = sign_up("BUDGET2024", "BUDGET2024").validate().unwrap_err();
        assert_eq!(errs["password"], WEAK_PASSWORD);
    }

    #[test]
    fn sign_up_rejects_password_without_digit() {
        let errs = sign_up("BudgetPlan", "BudgetPlan").validate().unwrap_err();
        assert_eq!(errs["password"], WEAK_PASSWORD);
    }

    #[test]
    fn sign_up_rejects_short_password() {
        let errs = sign_up("Bud9et", "Bud9et").validate().unwrap_err();
        assert_eq!(errs["password"], "Password must be at least 8 characters");
    }

    #[test]
    fn sign_up_rejects_mismatched_confirmation() {
        let errs = sign_up("Budget2024", "Budget2025").validate().unwrap_err();
        assert_eq!(errs["confirm_password"], PASSWORD_MISMATCH);
        assert!(!errs.contains_key("password"));
    }

    #[test]
    fn sign_up_reports_every_failing_field() {
        let form = SignUpRequest {
            name: "A".into(),
            phone_number: "12345".into(),
            password: "short".into(),
            confirm_password: "other".into(),
        };
        let errs = form.validate().unwrap_err();
        assert_eq!(errs.len(), 4);
        assert_eq!(errs["phone_number"], PHONE_TOO_SHORT);
    }

    #[test]
    fn hex_color_rule() {
        assert!(Rule::HexColor.check("#8884d8").is_none());
        assert!(Rule::HexColor.check("#FF8042").is_none());
        assert!(Rule::HexColor.check("8884d8").is_some());
        assert!(Rule::HexColor.check("#88z4d8").is_some());
        assert!(Rule::HexColor.check("#fff").is_some());
    }

    #[test]
    fn sign_in_requires_phone_and_password_lengths() {
        let form = SignInRequest {
            phone_number: "98765".into(),
            password: "12345".into(),
        };
        let errs = form.validate().unwrap_err();
        assert!(errs.contains_key("phone_number"));
        assert!(errs.contains_key("password"));
    }
}

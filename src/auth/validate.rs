//! Input validation for the auth request bodies. Pure functions: the same
//! payload always produces the same error map.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::dto::{LoginRequest, RegisterRequest};

/// Field-keyed validation messages, ordered for stable JSON output.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    fn set(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Validates a login payload.
///
/// At most one message per field: the required-field check wins over the
/// format check, which only runs on non-empty input.
pub fn validate_login(input: &LoginRequest) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if input.email.is_empty() {
        errors.set("email", "Email field is required");
    } else if !is_valid_email(&input.email) {
        errors.set("email", "Email is invalid");
    }

    if input.password.is_empty() {
        errors.set("password", "Password field is required");
    }

    errors
}

/// Validates a registration payload, with the same per-field precedence
/// as [`validate_login`].
pub fn validate_register(input: &RegisterRequest) -> FieldErrors {
    let mut errors = FieldErrors::default();

    if input.name.is_empty() {
        errors.set("name", "Name field is required");
    } else if !(2..=30).contains(&input.name.chars().count()) {
        errors.set("name", "Name must be between 2 and 30 characters");
    }

    if input.email.is_empty() {
        errors.set("email", "Email field is required");
    } else if !is_valid_email(&input.email) {
        errors.set("email", "Email is invalid");
    }

    if input.password.is_empty() {
        errors.set("password", "Password field is required");
    } else if input.password.chars().count() < 6 {
        errors.set("password", "Password must be at least 6 characters");
    }

    if input.password_confirmation.is_empty() {
        errors.set("passwordConfirmation", "Confirm password field is required");
    } else if input.password_confirmation != input.password {
        errors.set("passwordConfirmation", "Passwords must match");
    }

    errors
}

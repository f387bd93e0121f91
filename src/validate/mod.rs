//! Credential validators — pure, synchronous form checks.
//!
//! Every session transition validates its inputs here first; a
//! non-empty result short-circuits the transition before any network
//! or storage side effect. Messages are keyed by form field so the UI
//! can render them inline.

use std::collections::BTreeMap;

/// Field-keyed validation error map. Empty means the input is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message for a field, if that field failed validation.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterate `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn put(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_owned(), message.to_owned());
    }
}

const MIN_PASSWORD_LEN: usize = 8;
const MIN_NAME_LEN: usize = 2;

/// Check an email for a basic `local@domain.tld` shape.
fn email_shape_ok(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !host.starts_with('.') && !tld.is_empty()
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.is_empty() {
        errors.put("email", "Email is required");
    } else if !email_shape_ok(email) {
        errors.put("email", "Email is invalid");
    }
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    if name.is_empty() {
        errors.put("name", "Name is required");
    } else if name.len() < MIN_NAME_LEN {
        errors.put("name", "Name must be at least 2 characters");
    }
}

fn check_new_password(errors: &mut ValidationErrors, field: &str, password: &str) {
    if password.is_empty() {
        errors.put(field, "Password is required");
    } else if password.len() < MIN_PASSWORD_LEN {
        errors.put(field, "Password must be at least 8 characters");
    }
}

fn check_password_confirm(errors: &mut ValidationErrors, field: &str, password: &str, confirm: &str) {
    if confirm.is_empty() {
        errors.put(field, "Please confirm your password");
    } else if password.as_bytes() != confirm.as_bytes() {
        errors.put(field, "Passwords do not match");
    }
}

/// Validate a login form. The password only needs to be present; length
/// rules apply to new passwords, not existing ones.
#[must_use]
pub fn validate_login(email: &str, password: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    check_email(&mut errors, email);
    if password.is_empty() {
        errors.put("password", "Password is required");
    }
    errors
}

/// Validate a signup form: name, email, new password, and confirmation.
#[must_use]
pub fn validate_signup(name: &str, email: &str, password: &str, password_confirm: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    check_name(&mut errors, name);
    check_email(&mut errors, email);
    check_new_password(&mut errors, "password", password);
    check_password_confirm(&mut errors, "passwordConfirm", password, password_confirm);
    errors
}

/// Validate a profile update (name and email, same rules as signup).
#[must_use]
pub fn validate_profile_update(name: &str, email: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    check_name(&mut errors, name);
    check_email(&mut errors, email);
    errors
}

/// Validate a password change: the current password only needs to be
/// present; the new password follows signup rules.
#[must_use]
pub fn validate_password_update(current: &str, password: &str, password_confirm: &str) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if current.is_empty() {
        errors.put("passwordCurrent", "Password is required");
    }
    check_new_password(&mut errors, "password", password);
    check_password_confirm(&mut errors, "passwordConfirm", password, password_confirm);
    errors
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;

use super::*;

// =============================================================================
// email_shape_ok
// =============================================================================

#[test]
fn email_shape_accepts_basic_addresses() {
    assert!(email_shape_ok("user@example.com"));
    assert!(email_shape_ok("first.last@sub.example.co"));
    assert!(email_shape_ok("u@e.io"));
}

#[test]
fn email_shape_rejects_bad_addresses() {
    assert!(!email_shape_ok(""));
    assert!(!email_shape_ok("user"));
    assert!(!email_shape_ok("@example.com"));
    assert!(!email_shape_ok("user@"));
    assert!(!email_shape_ok("user@example"));
    assert!(!email_shape_ok("user@example."));
    assert!(!email_shape_ok("user@.com"));
    assert!(!email_shape_ok("a@b@c.com"));
    assert!(!email_shape_ok("us er@example.com"));
    assert!(!email_shape_ok("user@exa mple.com"));
}

// =============================================================================
// validate_login
// =============================================================================

#[test]
fn login_valid_input_is_empty() {
    let errors = validate_login("user@example.com", "secret");
    assert!(errors.is_empty());
}

#[test]
fn login_does_not_enforce_password_length() {
    // Existing passwords predate the length rule; only presence matters.
    let errors = validate_login("user@example.com", "abc");
    assert!(errors.is_empty());
}

#[test]
fn login_missing_fields() {
    let errors = validate_login("", "");
    assert_eq!(errors.get("email"), Some("Email is required"));
    assert_eq!(errors.get("password"), Some("Password is required"));
    assert_eq!(errors.len(), 2);
}

#[test]
fn login_invalid_email_shape() {
    let errors = validate_login("not-an-email", "secret");
    assert_eq!(errors.get("email"), Some("Email is invalid"));
    assert_eq!(errors.len(), 1);
}

// =============================================================================
// validate_signup
// =============================================================================

#[test]
fn signup_valid_input_is_empty() {
    let errors = validate_signup("Jane Doe", "jane@example.com", "password123", "password123");
    assert!(errors.is_empty());
}

#[test]
fn signup_bad_email_short_password_missing_confirm() {
    let errors = validate_signup("Jane", "bad", "short", "");
    assert_eq!(errors.get("email"), Some("Email is invalid"));
    assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
    assert_eq!(errors.get("passwordConfirm"), Some("Please confirm your password"));
    assert_eq!(errors.len(), 3);
}

#[test]
fn signup_name_rules() {
    let errors = validate_signup("", "jane@example.com", "password123", "password123");
    assert_eq!(errors.get("name"), Some("Name is required"));

    let errors = validate_signup("J", "jane@example.com", "password123", "password123");
    assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
}

#[test]
fn signup_confirm_mismatch_is_distinct_from_length_error() {
    let errors = validate_signup("Jane", "jane@example.com", "password123", "password124");
    assert_eq!(errors.get("passwordConfirm"), Some("Passwords do not match"));
    assert!(errors.get("password").is_none());
}

#[test]
fn signup_confirm_must_match_byte_for_byte() {
    // Same visual string, different unicode normalization.
    let errors = validate_signup("Jane", "jane@example.com", "passw\u{00e9}rd1", "passwe\u{0301}rd1");
    assert_eq!(errors.get("passwordConfirm"), Some("Passwords do not match"));
}

// =============================================================================
// validate_profile_update
// =============================================================================

#[test]
fn profile_update_valid_input_is_empty() {
    let errors = validate_profile_update("Jane Doe", "jane@example.com");
    assert!(errors.is_empty());
}

#[test]
fn profile_update_checks_both_fields() {
    let errors = validate_profile_update("J", "nope");
    assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
    assert_eq!(errors.get("email"), Some("Email is invalid"));
}

// =============================================================================
// validate_password_update
// =============================================================================

#[test]
fn password_update_valid_input_is_empty() {
    let errors = validate_password_update("old-secret", "new-password-1", "new-password-1");
    assert!(errors.is_empty());
}

#[test]
fn password_update_current_only_needs_presence() {
    let errors = validate_password_update("abc", "new-password-1", "new-password-1");
    assert!(errors.is_empty());
}

#[test]
fn password_update_missing_everything() {
    let errors = validate_password_update("", "", "");
    assert_eq!(errors.get("passwordCurrent"), Some("Password is required"));
    assert_eq!(errors.get("password"), Some("Password is required"));
    assert_eq!(errors.get("passwordConfirm"), Some("Please confirm your password"));
}

#[test]
fn password_update_new_password_length_enforced() {
    let errors = validate_password_update("old-secret", "short", "short");
    assert_eq!(errors.get("password"), Some("Password must be at least 8 characters"));
    assert!(errors.get("passwordConfirm").is_none());
}

// =============================================================================
// ValidationErrors
// =============================================================================

#[test]
fn iter_yields_fields_in_order() {
    let errors = validate_signup("", "", "", "");
    let fields: Vec<&str> = errors.iter().map(|(f, _)| f).collect();
    assert_eq!(fields, vec!["email", "name", "password", "passwordConfirm"]);
}

#[test]
fn serializes_as_field_map() {
    let errors = validate_login("", "secret");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["email"], "Email is required");
}

//! Schema validation for user registration payloads.
//!
//! # Responsibility
//! - Check a raw JSON body against the registration schema.
//! - Report only the first failing field, with a client-readable message.
//!
//! # Invariants
//! - Keys are checked in schema order: username, email, password, avatar,
//!   then any unknown key.
//! - The plaintext password only lives in `Registration` until hashed.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("valid email regex")
});

const KNOWN_KEYS: [&str; 4] = ["username", "email", "password", "avatar"];

/// First schema violation found in a registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Offending key, or `value` when the payload itself is malformed.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, rule: &str) -> Self {
        Self {
            field: field.to_string(),
            message: format!("\"{field}\" {rule}"),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for ValidationError {}

/// Normalized registration input. `password` is still plaintext here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
}

/// Validates a registration payload, stopping at the first error.
pub fn validate_registration(payload: &Value) -> Result<Registration, ValidationError> {
    let Value::Object(fields) = payload else {
        return Err(ValidationError::new("value", "must be of type object"));
    };

    let username = required_string(fields, "username")?;
    let email = required_string(fields, "email")?;
    if !is_valid_email(&email) {
        return Err(ValidationError::new("email", "must be a valid email"));
    }
    let password = required_string(fields, "password")?;
    let avatar = optional_string(fields, "avatar")?;

    if let Some(unknown) = fields
        .keys()
        .find(|key| !KNOWN_KEYS.contains(&key.as_str()))
    {
        return Err(ValidationError::new(unknown, "is not allowed"));
    }

    Ok(Registration {
        username,
        email,
        password,
        avatar,
    })
}

/// Returns whether `value` matches the accepted `local@domain.tld` grammar.
pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254 && EMAIL_RE.is_match(value)
}

fn required_string(fields: &Map<String, Value>, key: &str) -> Result<String, ValidationError> {
    match fields.get(key) {
        None => Err(ValidationError::new(key, "is required")),
        Some(value) => string_value(key, value),
    }
}

fn optional_string(
    fields: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, ValidationError> {
    fields
        .get(key)
        .map(|value| string_value(key, value))
        .transpose()
}

fn string_value(key: &str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) if text.is_empty() => {
            Err(ValidationError::new(key, "is not allowed to be empty"))
        }
        Value::String(text) => Ok(text.clone()),
        _ => Err(ValidationError::new(key, "must be a string")),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, validate_registration};
    use serde_json::json;

    #[test]
    fn accepts_minimal_payload() {
        let registration = validate_registration(&json!({
            "username": "al",
            "email": "al@x.com",
            "password": "pw"
        }))
        .unwrap();
        assert_eq!(registration.username, "al");
        assert_eq!(registration.avatar, None);
    }

    #[test]
    fn reports_first_failing_field_only() {
        let err = validate_registration(&json!({ "email": "nope" })).unwrap_err();
        assert_eq!(err.field, "username");
        assert_eq!(err.message, "\"username\" is required");

        let err = validate_registration(&json!({
            "username": "al",
            "email": "nope"
        }))
        .unwrap_err();
        assert_eq!(err.message, "\"email\" must be a valid email");
    }

    #[test]
    fn rejects_wrong_types_and_empty_strings() {
        let err = validate_registration(&json!({
            "username": 12,
            "email": "al@x.com",
            "password": "pw"
        }))
        .unwrap_err();
        assert_eq!(err.message, "\"username\" must be a string");

        let err = validate_registration(&json!({
            "username": "al",
            "email": "al@x.com",
            "password": ""
        }))
        .unwrap_err();
        assert_eq!(err.message, "\"password\" is not allowed to be empty");

        let err = validate_registration(&json!({
            "username": "al",
            "email": "al@x.com",
            "password": "pw",
            "avatar": null
        }))
        .unwrap_err();
        assert_eq!(err.message, "\"avatar\" must be a string");
    }

    #[test]
    fn rejects_unknown_keys_and_non_objects() {
        let err = validate_registration(&json!({
            "username": "al",
            "email": "al@x.com",
            "password": "pw",
            "role": "admin"
        }))
        .unwrap_err();
        assert_eq!(err.message, "\"role\" is not allowed");

        let err = validate_registration(&json!(["al"])).unwrap_err();
        assert_eq!(err.message, "\"value\" must be of type object");
    }

    #[test]
    fn email_grammar() {
        assert!(is_valid_email("al@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("al@x"));
        assert!(!is_valid_email("al.@x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("al@@x.com"));
        assert!(!is_valid_email("al x@x.com"));
    }
}

//! Contact-form validation, independent of the HTTP layer.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::domain::types::ContactForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    Required,
    InvalidFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub reason: Problem,
}

/// Non-empty list of field problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    fn has_missing_fields(&self) -> bool {
        self.0.iter().any(|e| e.reason == Problem::Required)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_missing_fields() {
            f.write_str("All fields are required.")
        } else {
            f.write_str("Invalid email format.")
        }
    }
}

/// Raw form fields as they arrived, before any checks.
#[derive(Debug, Clone, Default)]
pub struct RawContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Check that every field is present and non-empty, then that the email has a
/// `local@domain.tld` shape. Missing fields are reported before format problems.
/// Values pass through untouched: no trimming, no case folding.
pub fn validate_contact(raw: RawContact) -> Result<ContactForm, ValidationErrors> {
    let present = |value: Option<String>| value.filter(|v| !v.is_empty());
    let (name, email, message) = match (present(raw.name), present(raw.email), present(raw.message))
    {
        (Some(name), Some(email), Some(message)) => (name, email, message),
        (name, email, message) => {
            let missing = [
                (Field::Name, name.is_none()),
                (Field::Email, email.is_none()),
                (Field::Message, message.is_none()),
            ]
            .into_iter()
            .filter(|(_, missing)| *missing)
            .map(|(field, _)| FieldError {
                field,
                reason: Problem::Required,
            })
            .collect();
            return Err(ValidationErrors(missing));
        }
    };

    if !is_email_shaped(&email) {
        return Err(ValidationErrors(vec![FieldError {
            field: Field::Email,
            reason: Problem::InvalidFormat,
        }]));
    }

    Ok(ContactForm {
        name,
        email,
        message,
    })
}

/// ECMAScript `\s`: the Unicode `Zs` spaces plus tab, vertical tab, form feed,
/// line terminators and BOM. Unlike Rust's `\s` it excludes U+0085.
const JS_SPACE: &str = r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^{JS_SPACE}@]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("email pattern compiles")
});

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$` with `\s` meaning what it means in a browser:
/// exactly one `@`, no whitespace, and a dot in the domain with at least one
/// character on each side.
pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::application::intake_error::IntakeError;
use crate::domain::consultations::sections::SectionSet;

// Permissive on purpose; the wizard does the strict client-side checking.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

pub const MAX_NOTES_CHARS: usize = 10_000;

/// Sections arrive as free-form JSON but must be objects (or null = cleared);
/// scalars and arrays at the top level are wizard bugs, not data.
pub fn validate_section(name: &str, value: &Value) -> Result<(), IntakeError> {
    match value {
        Value::Null | Value::Object(_) => {}
        _ => {
            return Err(IntakeError::Validation(format!(
                "section {name} must be a JSON object or null"
            )));
        }
    }
    if name == "contact_info" {
        if let Some(Value::String(email)) = value.get("email") {
            if !email.trim().is_empty() && !EMAIL_RE.is_match(email.trim()) {
                return Err(IntakeError::Validation(format!(
                    "contact_info.email is not a valid email address: {email}"
                )));
            }
        }
    }
    Ok(())
}

pub fn validate_sections(sections: &SectionSet) -> Result<(), IntakeError> {
    for (name, value) in sections.fields() {
        if let Some(v) = value {
            validate_section(name, v)?;
        }
    }
    Ok(())
}

pub fn validate_notes(notes: Option<&str>) -> Result<(), IntakeError> {
    if let Some(n) = notes {
        if n.chars().count() > MAX_NOTES_CHARS {
            return Err(IntakeError::Validation(format!(
                "notes exceed {MAX_NOTES_CHARS} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn object_sections_pass() {
        assert!(validate_section("business_context", &json!({"industry": "saas"})).is_ok());
        assert!(validate_section("pain_points", &Value::Null).is_ok());
    }

    #[test]
    fn scalar_and_array_sections_fail() {
        assert!(validate_section("pain_points", &json!(["slow checkout"])).is_err());
        assert!(validate_section("goals_objectives", &json!("grow")).is_err());
    }

    #[test]
    fn bad_email_fails() {
        assert!(validate_section("contact_info", &json!({"email": "not-an-email"})).is_err());
        assert!(validate_section("contact_info", &json!({"email": "a@b.co"})).is_ok());
        // Blank email is treated as not provided.
        assert!(validate_section("contact_info", &json!({"email": ""})).is_ok());
    }

    #[test]
    fn email_only_checked_in_contact_info() {
        assert!(validate_section("business_context", &json!({"email": "nope"})).is_ok());
    }

    #[test]
    fn long_notes_fail() {
        let long = "x".repeat(MAX_NOTES_CHARS + 1);
        assert!(validate_notes(Some(&long)).is_err());
        assert!(validate_notes(Some("short")).is_ok());
        assert!(validate_notes(None).is_ok());
    }
}

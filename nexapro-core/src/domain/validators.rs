//! Form validation rules
//!
//! Each rule returns `Ok(())` or the message to display next to the field.

use serde_json::Value;

lazy_static::lazy_static! {
    static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";

pub fn required(value: &Value) -> Result<(), &'static str> {
    match value {
        Value::Null => Err(REQUIRED_MESSAGE),
        Value::String(s) if s.trim().is_empty() => Err(REQUIRED_MESSAGE),
        _ => Ok(()),
    }
}

/// Empty input passes; pair with [`required`] for mandatory emails.
pub fn email(value: &str) -> Result<(), &'static str> {
    if value.is_empty() || EMAIL_REGEX.is_match(value) {
        Ok(())
    } else {
        Err(EMAIL_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required() {
        assert_eq!(required(&json!(null)), Err(REQUIRED_MESSAGE));
        assert_eq!(required(&json!("   ")), Err(REQUIRED_MESSAGE));
        assert_eq!(required(&json!("x")), Ok(()));
        assert_eq!(required(&json!(0)), Ok(()));
        assert_eq!(required(&json!(false)), Ok(()));
    }

    #[test]
    fn test_email() {
        assert_eq!(email(""), Ok(()));
        assert_eq!(email("jane@example.co.ke"), Ok(()));
        assert_eq!(email("jane@example"), Err(EMAIL_MESSAGE));
        assert_eq!(email("jane doe@example.com"), Err(EMAIL_MESSAGE));
    }
}

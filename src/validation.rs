//! Presence checks run before any insert or update reaches SQLite.

use thiserror::Error;

use crate::models::Field;

/// Raised when at least one required field is empty. The message is the one
/// the forms show, regardless of which fields are missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill in all the fields.")]
pub struct ValidationError {
    missing: Vec<Field>,
}

impl ValidationError {
    /// Missing fields in form order (name, course, mobile).
    pub fn missing_fields(&self) -> &[Field] {
        &self.missing
    }
}

/// Reject the input if any field is the empty string. Whitespace is not
/// trimmed, so `" "` counts as filled in.
pub fn validate(name: &str, course: &str, mobile: &str) -> Result<(), ValidationError> {
    let missing: Vec<Field> = [
        (Field::Name, name),
        (Field::Course, course),
        (Field::Mobile, mobile),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_filled_fields() {
        assert_eq!(validate("Ada Lovelace", "Math", "555-1111"), Ok(()));
    }

    #[test]
    fn reports_every_missing_field() {
        let err = validate("", "Math", "").unwrap_err();
        assert_eq!(err.missing_fields(), &[Field::Name, Field::Mobile]);

        let err = validate("", "", "").unwrap_err();
        assert_eq!(
            err.missing_fields(),
            &[Field::Name, Field::Course, Field::Mobile]
        );
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        assert!(validate(" ", " ", " ").is_ok());
    }

    #[test]
    fn message_is_the_same_for_any_missing_field() {
        let by_name = validate("", "Math", "1").unwrap_err();
        let by_mobile = validate("Ann", "Math", "").unwrap_err();
        assert_eq!(by_name.to_string(), "Please fill in all the fields.");
        assert_eq!(by_name.to_string(), by_mobile.to_string());
    }
}

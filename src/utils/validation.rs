use crate::error::{Error, Result};
use crate::models::candidate::{CandidateField, FieldValue};
use crate::utils::text::{cached_regex, parse_years_experience, split_tech_stack};
use regex::Regex;
use std::sync::OnceLock;
use validator::{Validate, ValidateEmail};

pub fn validate<T: Validate>(val: &T) -> std::result::Result<(), validator::ValidationErrors> {
    val.validate()
}

pub fn is_valid_phone(phone: &str) -> bool {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    cached_regex(
        &PHONE,
        r"^(\+\d{1,3}[-.\s]?)?(\d{3}[-.\s]?)?\d{3}[-.\s]?\d{4}$",
    )
    .is_match(phone.trim())
}

/// Coerces an explicitly submitted value into the shape stored for `field`.
///
/// Name and location must be text, positions and tech stack text or a list,
/// years an integer or text holding a number.
pub fn normalize_field_value(field: CandidateField, value: FieldValue) -> Result<FieldValue> {
    if let FieldValue::Text(text) = &value {
        if text.trim().is_empty() {
            return Err(Error::BadRequest(format!("Empty value for {}", field)));
        }
    }

    match (field, value) {
        (CandidateField::Email, FieldValue::Text(email)) => {
            let email = email.trim().to_string();
            if email.validate_email() {
                Ok(FieldValue::Text(email))
            } else {
                Err(Error::BadRequest(format!("Invalid email address: {}", email)))
            }
        }
        (CandidateField::Phone, FieldValue::Text(phone)) => {
            if is_valid_phone(&phone) {
                Ok(FieldValue::Text(phone.trim().to_string()))
            } else {
                Err(Error::BadRequest(format!("Invalid phone number: {}", phone)))
            }
        }
        (CandidateField::YearsExperience, FieldValue::Integer(years)) => {
            Ok(FieldValue::Integer(years))
        }
        (CandidateField::YearsExperience, FieldValue::Text(raw)) => parse_years_experience(&raw)
            .map(FieldValue::Integer)
            .ok_or_else(|| Error::BadRequest(format!("Could not read years of experience from '{}'", raw))),
        (CandidateField::FullName | CandidateField::CurrentLocation, FieldValue::Text(text)) => {
            Ok(FieldValue::Text(text.trim().to_string()))
        }
        (CandidateField::TechStack, FieldValue::Text(raw)) => {
            let mut items = split_tech_stack(&raw);
            match items.len() {
                0 => Err(Error::BadRequest(format!("Empty value for {}", field))),
                1 => Ok(FieldValue::Text(items.remove(0))),
                _ => Ok(FieldValue::List(items)),
            }
        }
        (CandidateField::DesiredPositions, FieldValue::Text(text)) => {
            Ok(FieldValue::Text(text.trim().to_string()))
        }
        (CandidateField::DesiredPositions | CandidateField::TechStack, FieldValue::List(items)) => {
            let items: Vec<String> = items
                .iter()
                .map(|i| i.trim())
                .filter(|i| !i.is_empty())
                .map(str::to_string)
                .collect();
            if items.is_empty() {
                Err(Error::BadRequest(format!("Empty value for {}", field)))
            } else {
                Ok(FieldValue::List(items))
            }
        }
        _ => Err(Error::BadRequest(format!(
            "Unsupported value type for {}",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_formats() {
        assert!(is_valid_phone("+1 555 123 4567"));
        assert!(is_valid_phone("555-123-4567"));
        assert!(is_valid_phone("1234567"));
        assert!(!is_valid_phone("12-34"));
        assert!(!is_valid_phone("call me"));
    }

    #[test]
    fn email_is_checked() {
        let ok = normalize_field_value(CandidateField::Email, " jane@example.com ".into()).unwrap();
        assert_eq!(ok, FieldValue::Text("jane@example.com".to_string()));
        assert!(normalize_field_value(CandidateField::Email, "jane-at-example".into()).is_err());
        assert!(normalize_field_value(CandidateField::Email, 4u32.into()).is_err());
    }

    #[test]
    fn text_fields_reject_other_shapes() {
        assert!(normalize_field_value(CandidateField::FullName, 42u32.into()).is_err());
        assert!(normalize_field_value(CandidateField::FullName, vec!["Jane".to_string()].into()).is_err());
        assert!(normalize_field_value(CandidateField::CurrentLocation, vec!["a".to_string()].into()).is_err());
        assert!(normalize_field_value(CandidateField::DesiredPositions, 3u32.into()).is_err());
        assert!(normalize_field_value(CandidateField::TechStack, 3u32.into()).is_err());
        assert_eq!(
            normalize_field_value(CandidateField::FullName, " Jane Doe ".into()).unwrap(),
            FieldValue::Text("Jane Doe".into())
        );
        assert_eq!(
            normalize_field_value(
                CandidateField::DesiredPositions,
                vec!["Backend".to_string(), " ".to_string()].into()
            )
            .unwrap(),
            FieldValue::List(vec!["Backend".into()])
        );
    }

    #[test]
    fn years_accept_text_answers() {
        assert_eq!(
            normalize_field_value(CandidateField::YearsExperience, "6 years".into()).unwrap(),
            FieldValue::Integer(6)
        );
        assert_eq!(
            normalize_field_value(CandidateField::YearsExperience, "3".into()).unwrap(),
            FieldValue::Integer(3)
        );
        assert!(normalize_field_value(CandidateField::YearsExperience, "lots".into()).is_err());
    }

    #[test]
    fn tech_stack_text_is_split() {
        assert_eq!(
            normalize_field_value(CandidateField::TechStack, "Rust, Tokio/Axum".into()).unwrap(),
            FieldValue::List(vec!["Rust".into(), "Tokio".into(), "Axum".into()])
        );
        assert_eq!(
            normalize_field_value(CandidateField::TechStack, "Rust and Go".into()).unwrap(),
            FieldValue::List(vec!["Rust".into(), "Go".into()])
        );
        assert_eq!(
            normalize_field_value(CandidateField::TechStack, " Rust ".into()).unwrap(),
            FieldValue::Text("Rust".into())
        );
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(normalize_field_value(CandidateField::CurrentLocation, "   ".into()).is_err());
        assert!(normalize_field_value(CandidateField::TechStack, " , / ".into()).is_err());
    }
}

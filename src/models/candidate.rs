use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Candidate attributes collected during the interview, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateField {
    FullName,
    Email,
    Phone,
    YearsExperience,
    DesiredPositions,
    CurrentLocation,
    TechStack,
}

impl CandidateField {
    /// Fields that must all be set for a record to count as complete.
    pub const REQUIRED: [CandidateField; 7] = [
        CandidateField::FullName,
        CandidateField::Email,
        CandidateField::Phone,
        CandidateField::YearsExperience,
        CandidateField::DesiredPositions,
        CandidateField::CurrentLocation,
        CandidateField::TechStack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateField::FullName => "full_name",
            CandidateField::Email => "email",
            CandidateField::Phone => "phone",
            CandidateField::YearsExperience => "years_experience",
            CandidateField::DesiredPositions => "desired_positions",
            CandidateField::CurrentLocation => "current_location",
            CandidateField::TechStack => "tech_stack",
        }
    }
}

impl fmt::Display for CandidateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CandidateField::REQUIRED
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("Unknown candidate field: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(u32),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Partial field set produced by one extraction pass.
pub type ExtractedFields = BTreeMap<CandidateField, FieldValue>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalResponse {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    full_name: Option<FieldValue>,
    email: Option<FieldValue>,
    phone: Option<FieldValue>,
    years_experience: Option<FieldValue>,
    desired_positions: Option<FieldValue>,
    current_location: Option<FieldValue>,
    tech_stack: Option<FieldValue>,
    technical_responses: Vec<TechnicalResponse>,
    conversation_timestamp: DateTime<Utc>,
    conversation_complete: bool,
}

impl Default for CandidateRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateRecord {
    pub fn new() -> Self {
        Self {
            full_name: None,
            email: None,
            phone: None,
            years_experience: None,
            desired_positions: None,
            current_location: None,
            tech_stack: None,
            technical_responses: Vec::new(),
            conversation_timestamp: crate::utils::time::now(),
            conversation_complete: false,
        }
    }

    fn slot(&self, field: CandidateField) -> &Option<FieldValue> {
        match field {
            CandidateField::FullName => &self.full_name,
            CandidateField::Email => &self.email,
            CandidateField::Phone => &self.phone,
            CandidateField::YearsExperience => &self.years_experience,
            CandidateField::DesiredPositions => &self.desired_positions,
            CandidateField::CurrentLocation => &self.current_location,
            CandidateField::TechStack => &self.tech_stack,
        }
    }

    fn slot_mut(&mut self, field: CandidateField) -> &mut Option<FieldValue> {
        match field {
            CandidateField::FullName => &mut self.full_name,
            CandidateField::Email => &mut self.email,
            CandidateField::Phone => &mut self.phone,
            CandidateField::YearsExperience => &mut self.years_experience,
            CandidateField::DesiredPositions => &mut self.desired_positions,
            CandidateField::CurrentLocation => &mut self.current_location,
            CandidateField::TechStack => &mut self.tech_stack,
        }
    }

    /// Sets `field` by name. Returns `false`, leaving the record untouched, for unknown names.
    pub fn update(&mut self, field: &str, value: FieldValue) -> bool {
        match field.parse::<CandidateField>() {
            Ok(field) => {
                self.set(field, value);
                true
            }
            Err(_) => false,
        }
    }

    pub fn set(&mut self, field: CandidateField, value: FieldValue) {
        *self.slot_mut(field) = Some(value);
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        field
            .parse::<CandidateField>()
            .ok()
            .and_then(|f| self.field(f))
    }

    pub fn field(&self, field: CandidateField) -> Option<&FieldValue> {
        self.slot(field).as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.full_name.as_ref().and_then(FieldValue::as_text)
    }

    /// Applies extracted values last-write-wins and returns the fields that changed.
    pub fn apply(&mut self, extracted: ExtractedFields) -> Vec<CandidateField> {
        let mut changed = Vec::new();
        for (field, value) in extracted {
            if self.field(field) != Some(&value) {
                changed.push(field);
            }
            self.set(field, value);
        }
        changed
    }

    pub fn add_technical_response(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.technical_responses.push(TechnicalResponse {
            question: question.into(),
            answer: answer.into(),
            timestamp: crate::utils::time::now(),
        });
    }

    pub fn technical_responses(&self) -> &[TechnicalResponse] {
        &self.technical_responses
    }

    pub fn is_complete(&self) -> bool {
        CandidateField::REQUIRED
            .iter()
            .all(|f| self.slot(*f).is_some())
    }

    pub fn missing_fields(&self) -> Vec<CandidateField> {
        CandidateField::REQUIRED
            .iter()
            .copied()
            .filter(|f| self.slot(*f).is_none())
            .collect()
    }

    pub fn mark_complete(&mut self) {
        self.conversation_complete = true;
    }

    pub fn is_marked_complete(&self) -> bool {
        self.conversation_complete
    }

    /// Independent copy of the current state; later updates do not affect it.
    pub fn snapshot(&self) -> CandidateRecord {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(skip: Option<CandidateField>) -> CandidateRecord {
        let mut record = CandidateRecord::new();
        for field in CandidateField::REQUIRED {
            if Some(field) == skip {
                continue;
            }
            let value = match field {
                CandidateField::YearsExperience => FieldValue::Integer(4),
                CandidateField::TechStack => {
                    FieldValue::List(vec!["rust".to_string(), "postgres".to_string()])
                }
                _ => FieldValue::Text(format!("{} value", field)),
            };
            assert!(record.update(field.as_str(), value));
        }
        record
    }

    #[test]
    fn update_then_get_returns_value() {
        let mut record = CandidateRecord::new();
        assert!(record.update("email", "jane@example.com".into()));
        assert_eq!(
            record.get("email"),
            Some(&FieldValue::Text("jane@example.com".to_string()))
        );

        assert!(record.update("email", "other@example.com".into()));
        assert_eq!(
            record.get("email").and_then(FieldValue::as_text),
            Some("other@example.com")
        );
    }

    #[test]
    fn unknown_field_is_rejected_without_side_effects() {
        let mut record = CandidateRecord::new();
        record.update("full_name", "Jane Doe".into());
        let before = serde_json::to_value(&record).unwrap();

        assert!(!record.update("favourite_colour", "blue".into()));
        assert!(!record.update("conversation_complete", "yes".into()));
        assert_eq!(serde_json::to_value(&record).unwrap(), before);
        assert_eq!(record.get("favourite_colour"), None);
    }

    #[test]
    fn complete_only_with_all_seven_fields() {
        assert!(filled(None).is_complete());
        for field in CandidateField::REQUIRED {
            let record = filled(Some(field));
            assert!(!record.is_complete(), "{} missing but reported complete", field);
            assert_eq!(record.missing_fields(), vec![field]);
        }
    }

    #[test]
    fn missing_fields_follow_required_order() {
        let mut record = CandidateRecord::new();
        record.update("phone", "555 123 4567".into());
        record.update("tech_stack", "rust".into());
        assert_eq!(
            record.missing_fields(),
            vec![
                CandidateField::FullName,
                CandidateField::Email,
                CandidateField::YearsExperience,
                CandidateField::DesiredPositions,
                CandidateField::CurrentLocation,
            ]
        );
    }

    #[test]
    fn technical_responses_do_not_affect_completeness() {
        let mut record = filled(Some(CandidateField::Phone));
        record.add_technical_response("What is ownership?", "Single owner per value.");
        assert_eq!(record.technical_responses().len(), 1);
        assert!(!record.is_complete());
    }

    #[test]
    fn mark_complete_is_explicit() {
        let mut record = filled(None);
        assert!(record.is_complete());
        assert!(!record.is_marked_complete());
        record.mark_complete();
        assert!(record.is_marked_complete());

        let mut empty = CandidateRecord::new();
        empty.mark_complete();
        assert!(empty.is_marked_complete());
        assert!(!empty.is_complete());
    }

    #[test]
    fn snapshot_is_detached() {
        let mut record = CandidateRecord::new();
        record.update("full_name", "Jane Doe".into());
        let snapshot = record.snapshot();
        record.update("full_name", "John Roe".into());
        assert_eq!(snapshot.name(), Some("Jane Doe"));
        assert_eq!(record.name(), Some("John Roe"));
    }

    #[test]
    fn apply_reports_changed_fields() {
        let mut record = CandidateRecord::new();
        let mut extracted = ExtractedFields::new();
        extracted.insert(CandidateField::Email, "a@b.io".into());
        extracted.insert(CandidateField::YearsExperience, 3u32.into());
        assert_eq!(
            record.apply(extracted.clone()),
            vec![CandidateField::Email, CandidateField::YearsExperience]
        );
        assert!(record.apply(extracted).is_empty());
    }

    #[test]
    fn serializes_with_field_names() {
        let mut record = CandidateRecord::new();
        record.update("years_experience", 4u32.into());
        record.update("tech_stack", vec!["rust".to_string()].into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["years_experience"], 4);
        assert_eq!(json["tech_stack"][0], "rust");
        assert!(json["full_name"].is_null());
        assert_eq!(json["conversation_complete"], false);
    }
}

//! Pattern-based extraction of candidate fields from the conversation.
//!
//! Only user turns are scanned, oldest first, so a later mention of a field
//! replaces an earlier one. Matching runs on the lowercased turn text.

use crate::models::candidate::{CandidateField, ExtractedFields, FieldValue};
use crate::models::transcript::Transcript;
use crate::utils::text::{cached_regex, capitalize_words, title_case};
use regex::Regex;
use std::sync::OnceLock;

/// Tech stack triggers, tried in this order; the first that matches wins.
const TECH_STACK_PATTERNS: [&str; 3] = [
    r"work with\s+([a-z0-9\s,\.+#]+)",
    r"experience (?:with|in)\s+([a-z0-9\s,\.+#]+)",
    r"tech stack\s*(?:includes|is|:)?\s*([a-z0-9\s,\.+#]+)",
];

/// Words that end a free-form name or place capture ("my name is jane doe and i ...").
const PHRASE_STOP_WORDS: [&str; 21] = [
    "and", "but", "i", "im", "my", "me", "so", "also", "from", "with", "have", "has", "am",
    "currently", "live", "based", "located", "work", "working", "where", "you",
];

const MAX_NAME_WORDS: usize = 4;

/// Leading words of `captured` up to the first stop word, at most `max_words`.
fn leading_phrase(captured: &str, max_words: usize) -> String {
    captured
        .split_whitespace()
        .take_while(|w| !PHRASE_STOP_WORDS.contains(&w.trim_matches(',')))
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(',')
        .trim()
        .to_string()
}

pub struct ExtractionService;

impl ExtractionService {
    /// Scans the whole transcript and returns every field it could recognise.
    pub fn extract(transcript: &Transcript) -> ExtractedFields {
        let mut extracted = ExtractedFields::new();
        for turn in transcript.user_turns() {
            if turn.text.trim().is_empty() {
                continue;
            }
            Self::extract_turn(&turn.text.to_lowercase(), &mut extracted);
        }
        extracted
    }

    fn extract_turn(content: &str, out: &mut ExtractedFields) {
        if let Some(name) = Self::name(content) {
            out.insert(CandidateField::FullName, FieldValue::Text(name));
        }
        if let Some(email) = Self::email(content) {
            out.insert(CandidateField::Email, FieldValue::Text(email));
        }
        if let Some(phone) = Self::phone(content) {
            out.insert(CandidateField::Phone, FieldValue::Text(phone));
        }
        if let Some(years) = Self::years_experience(content) {
            out.insert(CandidateField::YearsExperience, FieldValue::Integer(years));
        }
        if let Some(location) = Self::location(content) {
            out.insert(CandidateField::CurrentLocation, FieldValue::Text(location));
        }
        if let Some(stack) = Self::tech_stack(content) {
            out.insert(CandidateField::TechStack, stack);
        }
    }

    fn name(content: &str) -> Option<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let caps = cached_regex(&RE, r"my name is\s+([a-z\s]+)").captures(content)?;
        let name = capitalize_words(&leading_phrase(&caps[1], MAX_NAME_WORDS));
        (!name.is_empty()).then_some(name)
    }

    fn email(content: &str) -> Option<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        cached_regex(&RE, r"[\w.-]+@[\w.-]+\.\w+")
            .find(content)
            .map(|m| m.as_str().to_string())
    }

    fn phone(content: &str) -> Option<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        cached_regex(
            &RE,
            r"(\+\d{1,3}|\d{1,3})[\s.-]?\d{3}[\s.-]?\d{3,4}[\s.-]?\d{3,4}",
        )
        .find(content)
        .map(|m| m.as_str().to_string())
    }

    /// Only the explicit "N year(s) [of] experience" phrase counts; bare numbers
    /// in chat text are too ambiguous.
    fn years_experience(content: &str) -> Option<u32> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let caps = cached_regex(&RE, r"(\d+)\s+years?\s+(?:of\s+)?experience").captures(content)?;
        caps[1].parse().ok()
    }

    fn location(content: &str) -> Option<String> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let caps = cached_regex(&RE, r"(?:live|based|located)\s+in\s+([a-z\s,]+)").captures(content)?;
        let location = title_case(&leading_phrase(&caps[1], usize::MAX));
        (!location.is_empty()).then_some(location)
    }

    fn tech_stack(content: &str) -> Option<FieldValue> {
        static RES: OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = RES.get_or_init(|| {
            TECH_STACK_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("invalid built-in regex"))
                .collect()
        });

        let raw = patterns
            .iter()
            .find_map(|re| re.captures(content))
            .map(|caps| caps[1].trim().to_string())?;
        if raw.is_empty() {
            return None;
        }

        if raw.contains(',') {
            let items: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            Some(FieldValue::List(items))
        } else {
            Some(FieldValue::Text(raw))
        }
    }
}

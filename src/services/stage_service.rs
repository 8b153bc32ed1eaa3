//! Advisory guess at which phase the interview is in.
//!
//! The result is for display and diagnostics only. Nothing in extraction or
//! session handling branches on it.

use crate::models::candidate::CandidateField;
use crate::models::transcript::Transcript;
use crate::services::extraction_service::ExtractionService;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStage {
    Greeting,
    InfoCollection,
    TechStack,
    TechnicalQuestions,
    Closing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: ConversationStage,
    pub missing_fields: Vec<CandidateField>,
}

struct StageSignals {
    last_assistant: String,
    assistant_turns: usize,
}

struct StageRule {
    stage: ConversationStage,
    applies: fn(&StageSignals) -> bool,
}

const CLOSING_PHRASES: [&str; 3] = ["thank you", "goodbye", "good luck"];

fn asks_technical_question(s: &StageSignals) -> bool {
    s.last_assistant.contains("technical question") && s.last_assistant.contains('?')
}

fn asks_tech_stack(s: &StageSignals) -> bool {
    s.last_assistant.contains("tech stack") || s.last_assistant.contains("programming languages")
}

fn is_opening(s: &StageSignals) -> bool {
    s.assistant_turns < 3
}

fn is_closing(s: &StageSignals) -> bool {
    CLOSING_PHRASES.iter().any(|p| s.last_assistant.contains(p))
}

/// Evaluated top to bottom; the first rule that applies decides.
const RULES: [StageRule; 4] = [
    StageRule {
        stage: ConversationStage::TechnicalQuestions,
        applies: asks_technical_question,
    },
    StageRule {
        stage: ConversationStage::TechStack,
        applies: asks_tech_stack,
    },
    StageRule {
        stage: ConversationStage::Greeting,
        applies: is_opening,
    },
    StageRule {
        stage: ConversationStage::Closing,
        applies: is_closing,
    },
];

pub struct StageService;

impl StageService {
    pub fn classify(transcript: &Transcript) -> StageReport {
        let assistant_turns = transcript.assistant_turns().count();
        let Some(last) = transcript.assistant_turns().last() else {
            return StageReport {
                stage: ConversationStage::Greeting,
                missing_fields: CandidateField::REQUIRED.to_vec(),
            };
        };

        let signals = StageSignals {
            last_assistant: last.text.to_lowercase(),
            assistant_turns,
        };
        let stage = RULES
            .iter()
            .find(|rule| (rule.applies)(&signals))
            .map(|rule| rule.stage)
            .unwrap_or(ConversationStage::InfoCollection);

        let extracted = ExtractionService::extract(transcript);
        let missing_fields = CandidateField::REQUIRED
            .iter()
            .copied()
            .filter(|f| !extracted.contains_key(f))
            .collect();

        StageReport {
            stage,
            missing_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transcript::Turn;

    fn with_assistant(prefix_turns: usize, last: &str) -> Transcript {
        let mut turns = Vec::new();
        for i in 0..prefix_turns {
            turns.push(Turn::assistant(format!("Could you share detail #{}", i)));
            turns.push(Turn::user("sure"));
        }
        turns.push(Turn::assistant(last));
        turns.into_iter().collect()
    }

    #[test]
    fn empty_transcript_is_greeting_with_everything_missing() {
        let report = StageService::classify(&Transcript::new());
        assert_eq!(report.stage, ConversationStage::Greeting);
        assert_eq!(report.missing_fields, CandidateField::REQUIRED.to_vec());
    }

    #[test]
    fn technical_question_needs_question_mark() {
        let report = StageService::classify(&with_assistant(0, "Here is technical question 1: what is a lifetime?"));
        assert_eq!(report.stage, ConversationStage::TechnicalQuestions);

        let report = StageService::classify(&with_assistant(5, "I will now ask a technical question."));
        assert_eq!(report.stage, ConversationStage::InfoCollection);
    }

    #[test]
    fn tech_stack_beats_greeting() {
        let report = StageService::classify(&with_assistant(0, "Which programming languages do you use?"));
        assert_eq!(report.stage, ConversationStage::TechStack);
    }

    #[test]
    fn early_turns_are_greeting_even_when_closing() {
        let report = StageService::classify(&with_assistant(1, "Thank you, goodbye!"));
        assert_eq!(report.stage, ConversationStage::Greeting);

        let report = StageService::classify(&with_assistant(2, "Thank you, goodbye!"));
        assert_eq!(report.stage, ConversationStage::Closing);
    }

    #[test]
    fn default_is_info_collection() {
        let report = StageService::classify(&with_assistant(3, "What is your email address?"));
        assert_eq!(report.stage, ConversationStage::InfoCollection);
    }

    #[test]
    fn missing_fields_reflect_extracted_values() {
        let mut transcript = with_assistant(0, "Hello! What's your name?");
        transcript.push(Turn::user("My name is Jane Doe, email jane@example.com"));
        transcript.push(Turn::assistant("Thanks Jane. Your phone number?"));

        let report = StageService::classify(&transcript);
        assert!(!report.missing_fields.contains(&CandidateField::FullName));
        assert!(!report.missing_fields.contains(&CandidateField::Email));
        assert_eq!(report.missing_fields.first(), Some(&CandidateField::Phone));
    }
}

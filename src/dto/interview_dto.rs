use crate::models::candidate::{CandidateField, FieldValue};
use crate::models::transcript::Turn;
use crate::services::chat_service::SessionState;
use crate::services::stage_service::StageReport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4000))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFieldRequest {
    #[validate(length(min = 1))]
    pub field: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TechnicalResponseRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
    #[validate(length(min = 1, max = 8000))]
    pub answer: String,
}

/// What the UI needs after every turn: the bubble to render plus the completion signal.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub reply: String,
    pub state: SessionState,
    pub stage: StageReport,
    pub missing_fields: Vec<CandidateField>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewStatus {
    pub session_id: uuid::Uuid,
    pub state: SessionState,
    pub stage: StageReport,
    pub missing_fields: Vec<CandidateField>,
    pub complete: bool,
    pub marked_complete: bool,
    pub transcript: Vec<Turn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateFieldResponse {
    pub field: CandidateField,
    pub value: FieldValue,
    pub missing_fields: Vec<CandidateField>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersistResponse {
    pub path: PathBuf,
}

use crate::dto::interview_dto::{InterviewStatus, TurnResponse};
use crate::error::Result;
use crate::models::candidate::{CandidateRecord, FieldValue};
use crate::models::transcript::{Speaker, Transcript, Turn};
use crate::services::candidate_service::CandidateService;
use crate::services::chat_service::{ChatSession, SessionPolicy, SessionState};
use crate::services::extraction_service::ExtractionService;
use crate::services::llm_service::ChatModel;
use crate::services::prompts;
use crate::services::stage_service::StageService;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Everything belonging to one conversation: the model session, the visible
/// transcript and the candidate record. Passed explicitly to every operation;
/// `reset` replaces all three together.
pub struct Interview {
    id: Uuid,
    chat: ChatSession,
    transcript: Transcript,
    candidate: CandidateRecord,
    store: CandidateService,
}

impl Interview {
    pub fn new(model: Arc<dyn ChatModel>, policy: SessionPolicy, store: CandidateService) -> Self {
        Self {
            id: Uuid::new_v4(),
            chat: ChatSession::new(model, policy),
            transcript: Transcript::new(),
            candidate: CandidateRecord::new(),
            store,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.chat.state()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn candidate(&self) -> &CandidateRecord {
        &self.candidate
    }

    /// Greets the candidate. A conversation that already has turns is left as is.
    pub async fn start(&mut self) -> TurnResponse {
        if self.chat.is_ended() {
            return self.turn_response(prompts::ENDED_MESSAGE.to_string());
        }
        if let Some(last) = self.transcript.turns().last() {
            tracing::debug!(session_id = %self.id, "Interview already started");
            let reply = match last.speaker {
                Speaker::Assistant => last.text.clone(),
                Speaker::User => String::new(),
            };
            return self.turn_response(reply);
        }

        tracing::info!(session_id = %self.id, "Starting interview");
        let greeting = self.chat.start().await;
        self.transcript.push(Turn::assistant(greeting.clone()));
        self.turn_response(greeting)
    }

    pub async fn handle_message(&mut self, text: &str) -> TurnResponse {
        self.transcript.push(Turn::user(text));
        let reply = self.chat.respond(text).await;
        self.transcript.push(Turn::assistant(reply.clone()));

        let updated = self.candidate.apply(ExtractionService::extract(&self.transcript));
        if !updated.is_empty() {
            tracing::debug!(session_id = %self.id, fields = ?updated, "Candidate fields updated");
        }

        self.turn_response(reply)
    }

    pub fn reset(&mut self) {
        tracing::info!(session_id = %self.id, "Resetting interview");
        self.chat.reset();
        self.transcript.clear();
        self.candidate = CandidateRecord::new();
        self.id = Uuid::new_v4();
    }

    pub fn update_field(&mut self, field: &str, value: FieldValue) -> bool {
        self.candidate.update(field, value)
    }

    pub fn add_technical_response(&mut self, question: &str, answer: &str) {
        self.candidate.add_technical_response(question, answer);
    }

    pub fn mark_complete(&mut self) {
        self.candidate.mark_complete();
    }

    pub async fn persist(&self) -> Result<PathBuf> {
        self.store.persist(&self.candidate).await
    }

    pub fn status(&self) -> InterviewStatus {
        InterviewStatus {
            session_id: self.id,
            state: self.chat.state(),
            stage: StageService::classify(&self.transcript),
            missing_fields: self.candidate.missing_fields(),
            complete: self.candidate.is_complete(),
            marked_complete: self.candidate.is_marked_complete(),
            transcript: self.transcript.turns().to_vec(),
        }
    }

    fn turn_response(&self, reply: String) -> TurnResponse {
        TurnResponse {
            reply,
            state: self.chat.state(),
            stage: StageService::classify(&self.transcript),
            missing_fields: self.candidate.missing_fields(),
            complete: self.candidate.is_complete(),
        }
    }
}

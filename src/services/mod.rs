pub mod candidate_service;
pub mod chat_service;
pub mod extraction_service;
pub mod interview_service;
pub mod llm_service;
pub mod prompts;
pub mod stage_service;

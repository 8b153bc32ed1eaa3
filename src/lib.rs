pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::config::Config;
use crate::services::{
    candidate_service::CandidateService,
    chat_service::SessionPolicy,
    interview_service::Interview,
    llm_service::{ChatModel, OpenAiChatModel},
};
use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One process serves one conversation; the mutex makes turns strictly sequential.
#[derive(Clone)]
pub struct AppState {
    pub interview: Arc<Mutex<Interview>>,
}

impl AppState {
    pub fn new(config: &Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        let model = OpenAiChatModel::new(
            config.openai_api_key.clone(),
            config.model_name.clone(),
            config.model_base_url.clone(),
            http_client,
        );

        Ok(Self::with_model(
            Arc::new(model),
            SessionPolicy::from_config(config),
            CandidateService::new(config.data_dir.clone()),
        ))
    }

    pub fn with_model(
        model: Arc<dyn ChatModel>,
        policy: SessionPolicy,
        store: CandidateService,
    ) -> Self {
        Self {
            interview: Arc::new(Mutex::new(Interview::new(model, policy, store))),
        }
    }
}

/// All routes of the service. Only message submission sits behind the cooldown.
pub fn router(state: AppState, message_cooldown_secs: u64) -> Router {
    let messages = Router::new()
        .route(
            "/api/interview/messages",
            post(routes::interview::send_message),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_cooldown_state(message_cooldown_secs),
            middleware::rate_limit::cooldown_middleware,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/interview", get(routes::interview::get_status))
        .route("/api/interview/start", post(routes::interview::start_interview))
        .route("/api/interview/reset", post(routes::interview::reset_interview))
        .route(
            "/api/interview/candidate",
            get(routes::interview::get_candidate).patch(routes::interview::update_candidate_field),
        )
        .route(
            "/api/interview/candidate/technical-responses",
            post(routes::interview::add_technical_response),
        )
        .route(
            "/api/interview/candidate/complete",
            post(routes::interview::mark_complete),
        )
        .route(
            "/api/interview/candidate/persist",
            post(routes::interview::persist_candidate),
        )
        .merge(messages)
        .with_state(state)
}

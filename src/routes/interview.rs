use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::{
    dto::interview_dto::{
        PersistResponse, SendMessageRequest, TechnicalResponseRequest, UpdateFieldRequest,
        UpdateFieldResponse,
    },
    error::{Error, Result},
    models::candidate::CandidateField,
    utils::validation::{normalize_field_value, validate},
    AppState,
};

#[axum::debug_handler]
pub async fn start_interview(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut interview = state.interview.lock().await;
    Ok(Json(interview.start().await))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(Error::BadRequest("Message must not be blank".to_string()));
    }

    let mut interview = state.interview.lock().await;
    Ok(Json(interview.handle_message(text).await))
}

#[axum::debug_handler]
pub async fn reset_interview(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut interview = state.interview.lock().await;
    interview.reset();
    Ok(Json(interview.status()))
}

#[axum::debug_handler]
pub async fn get_status(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let interview = state.interview.lock().await;
    Ok(Json(interview.status()))
}

#[axum::debug_handler]
pub async fn get_candidate(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let interview = state.interview.lock().await;
    Ok(Json(interview.candidate().snapshot()))
}

#[axum::debug_handler]
pub async fn update_candidate_field(
    State(state): State<AppState>,
    Json(payload): Json<UpdateFieldRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let field: CandidateField = payload
        .field
        .parse()
        .map_err(Error::BadRequest)?;
    let value = normalize_field_value(field, payload.value)?;

    let mut interview = state.interview.lock().await;
    interview.update_field(field.as_str(), value.clone());
    tracing::debug!(field = %field, "Candidate field set explicitly");

    Ok(Json(UpdateFieldResponse {
        field,
        value,
        missing_fields: interview.candidate().missing_fields(),
        complete: interview.candidate().is_complete(),
    }))
}

#[axum::debug_handler]
pub async fn add_technical_response(
    State(state): State<AppState>,
    Json(payload): Json<TechnicalResponseRequest>,
) -> Result<impl IntoResponse> {
    validate(&payload)?;
    let mut interview = state.interview.lock().await;
    interview.add_technical_response(&payload.question, &payload.answer);
    Ok((StatusCode::CREATED, Json(interview.candidate().snapshot())))
}

#[axum::debug_handler]
pub async fn mark_complete(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut interview = state.interview.lock().await;
    interview.mark_complete();
    Ok(Json(interview.status()))
}

#[axum::debug_handler]
pub async fn persist_candidate(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let interview = state.interview.lock().await;
    let path = interview.persist().await?;
    Ok((StatusCode::CREATED, Json(PersistResponse { path })))
}

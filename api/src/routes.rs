use crate::presenter::{self, MISSING_INPUT_WARNING};
use crate::upload::read_submission;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use care_companion::{CompanionError, Outcome, QueryService};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub query_service: Arc<QueryService>,
    pub max_upload_bytes: usize,
}

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.max_upload_bytes;
    Router::new()
        .route("/", get(about))
        .route("/chat", get(chat_form).post(chat_submit))
        .route("/api/query", axum::routing::post(api_query))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn about() -> Html<String> {
    Html(presenter::about_page())
}

async fn chat_form() -> Html<String> {
    Html(presenter::chat_page("", None))
}

async fn chat_submit(State(state): State<AppState>, multipart: Multipart) -> Response {
    let submission = match read_submission(multipart, state.max_upload_bytes).await {
        Ok(submission) => submission,
        Err(error) => {
            log::warn!("Rejected upload: {error}");
            let status = status_for(&error);
            let outcome = Outcome::Failure(error);
            return (status, Html(presenter::chat_page("", Some(&outcome)))).into_response();
        }
    };

    let outcome = state.query_service.respond(&submission).await;
    Html(presenter::chat_page(&submission.question, Some(&outcome))).into_response()
}

async fn api_query(State(state): State<AppState>, multipart: Multipart) -> Response {
    let outcome = match read_submission(multipart, state.max_upload_bytes).await {
        Ok(submission) => state.query_service.respond(&submission).await,
        Err(error) => {
            log::warn!("Rejected upload: {error}");
            Outcome::Failure(error)
        }
    };

    match outcome {
        Outcome::Success(answer) => Json(json!({
            "status": "success",
            "response": answer.response,
            "summary": answer.summary,
        }))
        .into_response(),
        Outcome::MissingInput => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "status": "missing_input", "message": MISSING_INPUT_WARNING })),
        )
            .into_response(),
        Outcome::Failure(error) => (
            status_for(&error),
            Json(json!({
                "status": "error",
                "kind": error.kind(),
                "error": error.to_string(),
            })),
        )
            .into_response(),
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "model": state.query_service.model_name(),
    }))
}

fn status_for(error: &CompanionError) -> StatusCode {
    match error {
        CompanionError::RemoteService(_) => StatusCode::BAD_GATEWAY,
        CompanionError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        CompanionError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
        CompanionError::MissingInput
        | CompanionError::Extraction(_)
        | CompanionError::Splitting(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CompanionError::Io(_) | CompanionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

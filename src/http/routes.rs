use crate::ai::AiAnswer;
use crate::http::types::VerifyParams;
use crate::http::HttpState;
use crate::whatsapp::InboundEvent;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::log::{debug, error, info, warn};

pub async fn liveness(State(state): State<HttpState>) -> String {
    format!(
        "study-bot {} running with {}",
        crate::VERSION,
        state.config.ai.backend.name()
    )
}

pub async fn verify_webhook(
    State(state): State<HttpState>,
    Query(params): Query<VerifyParams>,
) -> Result<String, StatusCode> {
    match params.challenge_response(&state.config.whatsapp.verify_token) {
        Some(challenge) => {
            info!("Webhook verification handshake accepted");
            Ok(challenge.to_string())
        }
        None => {
            warn!("Webhook verification handshake rejected");
            Err(StatusCode::FORBIDDEN)
        }
    }
}

/// Relays one inbound message to the AI provider and replies with the
/// short/detailed answer pair. The platform retries aggressively on any
/// non-200, so every outcome below acknowledges the event.
pub async fn receive_webhook(
    State(state): State<HttpState>,
    payload: Result<Json<InboundEvent>, JsonRejection>,
) -> StatusCode {
    let event = match payload {
        Ok(Json(event)) => event,
        Err(rejection) => {
            debug!("Ignoring undecodable webhook payload: {rejection}");
            return StatusCode::OK;
        }
    };

    let Some(message) = event.first_message() else {
        debug!("Webhook event carried no message");
        return StatusCode::OK;
    };
    info!("Question from {}: {}", message.sender_id, message.text);

    let answer = match state
        .ai
        .complete(&message.text, &state.config.ai.language)
        .await
    {
        Ok(answer) => answer,
        Err(e) => {
            error!("AI completion failed: {e}");
            AiAnswer::fallback()
        }
    };

    // Short answer first, then the explanation. Sequential so the user
    // always sees them in that order. Delivery is best-effort.
    let short = format!("📌 {}", answer.short_answer);
    for body in [short.as_str(), answer.detailed_answer.as_str()] {
        if let Err(e) = state.sender.send_text(&message.sender_id, body).await {
            warn!("Failed to deliver reply to {}: {e}", message.sender_id);
        }
    }

    StatusCode::OK
}

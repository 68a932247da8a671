//! # REST API for Contact Messages
//!
//! The contact page forwards a visitor's message to the store's WhatsApp.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::ContactMessageRequest;

/// Compose the contact WhatsApp link for the visitor to open
pub async fn send_contact_message(
    State(state): State<AppState>,
    Json(request): Json<ContactMessageRequest>,
) -> impl IntoResponse {
    info!("POST /api/contact - from: {}", request.name);

    match state.business_service.compose_contact_message(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to compose contact message: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

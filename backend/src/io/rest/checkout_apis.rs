//! # REST API for Checkout
//!
//! Endpoints for the cart → checkout → submitted flow. The session lives
//! in the domain layer; the UI reads it back after every operation.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::domain::CheckoutError;
use crate::AppState;
use shared::UpdateCheckoutFieldRequest;

// Query parameters for the time slot API
#[derive(Debug, Deserialize)]
pub struct TimeSlotQuery {
    pub district: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Current checkout session (view, form, field errors)
pub async fn get_checkout_session(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/checkout");

    (StatusCode::OK, Json(state.checkout_service.session_state())).into_response()
}

/// Move from the cart view into the checkout form
pub async fn open_checkout(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/checkout/open");

    match state.checkout_service.open_checkout() {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => {
            error!("Failed to open checkout: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Close the panel and discard the form; cart lines are untouched
pub async fn close_checkout(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/checkout/close");

    (StatusCode::OK, Json(state.checkout_service.close_panel())).into_response()
}

/// Edit a single form field
pub async fn update_checkout_field(
    State(state): State<AppState>,
    Json(request): Json<UpdateCheckoutFieldRequest>,
) -> impl IntoResponse {
    info!("POST /api/checkout/field - field: {:?}", request.field);

    (
        StatusCode::OK,
        Json(state.checkout_service.update_field(request)),
    )
        .into_response()
}

/// Time slots offered for the selected district and date
pub async fn get_time_slots(
    State(state): State<AppState>,
    Query(query): Query<TimeSlotQuery>,
) -> impl IntoResponse {
    info!("GET /api/checkout/time-slots - query: {:?}", query);

    let response = state
        .checkout_service
        .available_time_slots(query.district.as_deref(), query.date.as_deref());

    (StatusCode::OK, Json(response)).into_response()
}

/// Attempt to submit the order
pub async fn submit_checkout(State(state): State<AppState>) -> impl IntoResponse {
    info!("POST /api/checkout/submit");

    match state.checkout_service.submit().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e @ CheckoutError::Internal(_)) => {
            error!("Checkout failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error al enviar el pedido").into_response()
        }
        Err(e) => {
            error!("Checkout rejected: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

//! # REST API for the Cart
//!
//! Endpoints for reading and mutating the shopping cart. Every mutation
//! returns the fresh cart snapshot plus an optional notification string
//! for the UI to toast.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::AddCartItemRequest;

/// Current cart contents with derived count and total
pub async fn get_cart(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/cart");

    (StatusCode::OK, Json(state.cart_service.snapshot())).into_response()
}

/// Add a product to the cart (merge-or-insert on product id)
pub async fn add_cart_item(
    State(state): State<AppState>,
    Json(request): Json<AddCartItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/cart/items - request: {:?}", request);

    match state.cart_service.add_item(request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to add cart item: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Decrease a line's quantity by one (removes the line at quantity 1)
pub async fn decrement_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/cart/items/{}/decrement", product_id);

    match state.cart_service.decrement_item(&product_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to decrement cart item: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating cart").into_response()
        }
    }
}

/// Remove a line from the cart
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/cart/items/{}", product_id);

    match state.cart_service.remove_item(&product_id, true).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to remove cart item: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating cart").into_response()
        }
    }
}

/// Empty the whole cart
pub async fn clear_cart(State(state): State<AppState>) -> impl IntoResponse {
    info!("DELETE /api/cart");

    match state.cart_service.clear(true).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to clear cart: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error clearing cart").into_response()
        }
    }
}

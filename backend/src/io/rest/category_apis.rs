//! # REST API for Categories
//!
//! Endpoints for listing and administering product categories.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::CreateCategoryRequest;

/// List all categories, oldest first
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/categories");

    match state.catalog_service.list_categories().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => {
            error!("Failed to list categories: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing categories").into_response()
        }
    }
}

/// Create a new category
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
    info!("POST /api/categories - request: {:?}", request);

    match state.catalog_service.create_category(request).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(e) => {
            error!("Failed to create category: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Delete a category; its products become uncategorized
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/categories/{}", category_id);

    match state.catalog_service.delete_category(&category_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete category: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

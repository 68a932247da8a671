//! # REST API for Products
//!
//! Endpoints for listing and administering catalog products.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};
use serde::Deserialize;

use crate::AppState;
use shared::{CreateProductRequest, SetProductActiveRequest, UpdateProductRequest};

// Query parameters for the product listing API
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// When true, hidden products are included (admin view)
    pub include_hidden: Option<bool>,
}

/// List products. The storefront gets active products only; the admin
/// panel passes `include_hidden=true` for the full catalog.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> impl IntoResponse {
    info!("GET /api/products - query: {:?}", query);

    let result = if query.include_hidden.unwrap_or(false) {
        state.catalog_service.list_all_products().await
    } else {
        state.catalog_service.list_storefront_products().await
    };

    match result {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => {
            error!("Failed to list products: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing products").into_response()
        }
    }
}

/// Create a new product
pub async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> impl IntoResponse {
    info!("POST /api/products - request: {:?}", request);

    match state.catalog_service.create_product(request).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => {
            error!("Failed to create product: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Update an existing product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<UpdateProductRequest>,
) -> impl IntoResponse {
    info!("PUT /api/products/{} - request: {:?}", product_id, request);

    match state.catalog_service.update_product(&product_id, request).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => {
            error!("Failed to update product: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Toggle storefront visibility
pub async fn set_product_active(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<SetProductActiveRequest>,
) -> impl IntoResponse {
    info!(
        "POST /api/products/{}/active - active: {}",
        product_id, request.active
    );

    match state
        .catalog_service
        .set_product_active(&product_id, request.active)
        .await
    {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => {
            error!("Failed to change product status: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/products/{}", product_id);

    match state.catalog_service.delete_product(&product_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete product: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::setup_test_state;

    #[tokio::test]
    async fn test_create_product_handler() {
        let (state, _tmp) = setup_test_state().await;

        let request = CreateProductRequest {
            name: "Rosa Roja".to_string(),
            description: None,
            price: 45.0,
            image_url: None,
            category_id: None,
        };

        let response = create_product(State(state), Json(request)).await;

        assert_eq!(response.into_response().status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_create_product_validation_error() {
        let (state, _tmp) = setup_test_state().await;

        // Empty name should fail validation
        let request = CreateProductRequest {
            name: "".to_string(),
            description: None,
            price: 45.0,
            image_url: None,
            category_id: None,
        };

        let response = create_product(State(state), Json(request)).await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_products_handler() {
        let (state, _tmp) = setup_test_state().await;

        let response = list_products(
            State(state),
            Query(ProductListQuery {
                include_hidden: None,
            }),
        )
        .await;

        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_delete_missing_product_returns_bad_request() {
        let (state, _tmp) = setup_test_state().await;

        let response = delete_product(State(state), Path("ghost".to_string())).await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

//! # REST API for the Business Profile
//!
//! Endpoints for the store's own record and its social links.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::{CreateSocialLinkRequest, UpdateBusinessProfileRequest, UpdateSocialLinkRequest};

/// Read the business profile; 404 until it is configured
pub async fn get_business_profile(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/business");

    match state.business_service.get_profile().await {
        Ok(Some(profile)) => (StatusCode::OK, Json(profile)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Business profile not configured").into_response(),
        Err(e) => {
            error!("Failed to load business profile: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading profile").into_response()
        }
    }
}

/// Replace the business profile
pub async fn update_business_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateBusinessProfileRequest>,
) -> impl IntoResponse {
    info!("PUT /api/business - store: {}", request.store_name);

    match state.business_service.update_profile(request).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => {
            error!("Failed to update business profile: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// List social links plus the networks still available
pub async fn list_social_links(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/business/social-links");

    match state.business_service.list_social_links().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to list social links: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing social links").into_response()
        }
    }
}

/// Add a social link
pub async fn add_social_link(
    State(state): State<AppState>,
    Json(request): Json<CreateSocialLinkRequest>,
) -> impl IntoResponse {
    info!("POST /api/business/social-links - request: {:?}", request);

    match state.business_service.add_social_link(request).await {
        Ok(link) => (StatusCode::CREATED, Json(link)).into_response(),
        Err(e) => {
            error!("Failed to add social link: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Update a social link's URL
pub async fn update_social_link(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
    Json(request): Json<UpdateSocialLinkRequest>,
) -> impl IntoResponse {
    info!("PUT /api/business/social-links/{}", link_id);

    match state
        .business_service
        .update_social_link(&link_id, request)
        .await
    {
        Ok(link) => (StatusCode::OK, Json(link)).into_response(),
        Err(e) => {
            error!("Failed to update social link: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Delete a social link
pub async fn delete_social_link(
    State(state): State<AppState>,
    Path(link_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/business/social-links/{}", link_id);

    match state.business_service.delete_social_link(&link_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete social link: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::setup_test_state;

    fn profile_request() -> UpdateBusinessProfileRequest {
        UpdateBusinessProfileRequest {
            store_name: "Florería El Jardín".to_string(),
            location: Some("Chiclayo, Perú".to_string()),
            display_phone: None,
            whatsapp_phone: Some("987654321".to_string()),
            order_greeting: None,
        }
    }

    #[tokio::test]
    async fn test_profile_not_found_until_configured() {
        let (state, _tmp) = setup_test_state().await;

        let response = get_business_profile(State(state.clone())).await;
        assert_eq!(response.into_response().status(), StatusCode::NOT_FOUND);

        update_business_profile(State(state.clone()), Json(profile_request())).await;

        let response = get_business_profile(State(state)).await;
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_profile_requires_store_name() {
        let (state, _tmp) = setup_test_state().await;

        let mut request = profile_request();
        request.store_name = "  ".to_string();

        let response = update_business_profile(State(state), Json(request)).await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_social_link_lifecycle() {
        let (state, _tmp) = setup_test_state().await;

        let response = add_social_link(
            State(state.clone()),
            Json(CreateSocialLinkRequest {
                name: "Instagram".to_string(),
                url: "https://instagram.com/floreria".to_string(),
            }),
        )
        .await;
        assert_eq!(response.into_response().status(), StatusCode::CREATED);

        let response = list_social_links(State(state)).await;
        assert_eq!(response.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_network_is_rejected() {
        let (state, _tmp) = setup_test_state().await;

        let response = add_social_link(
            State(state),
            Json(CreateSocialLinkRequest {
                name: "MySpace".to_string(),
                url: "https://myspace.com/floreria".to_string(),
            }),
        )
        .await;

        assert_eq!(response.into_response().status(), StatusCode::BAD_REQUEST);
    }
}

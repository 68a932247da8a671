//! # Floristería Backend
//!
//! Non-UI logic for the floristería storefront, layered as:
//!
//! ```text
//! UI Layer (any frontend)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (business logic, services)
//!     ↓
//! Storage Layer (file-backed repositories)
//! ```
//!
//! The backend is UI-agnostic: the REST surface under `/api` is the only
//! seam a frontend needs. All state is constructed once at startup in
//! [`initialize_backend`] and injected into the handlers via [`AppState`];
//! there are no hidden singletons.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::{
    BusinessService, CartService, CatalogService, CheckoutService, OrderMessageService,
};
use crate::storage::{
    BusinessRepository, CategoryRepository, FileConnection, JsonCartStore, ProductRepository,
    SocialLinkRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub cart_service: CartService,
    pub checkout_service: CheckoutService,
    pub business_service: BusinessService,
}

/// Initialize the backend with the default data directory.
pub async fn initialize_backend() -> Result<AppState> {
    let connection = FileConnection::new_default()?;
    initialize_backend_with(connection).await
}

/// Initialize the backend against a specific data directory (tests point
/// this at a temporary directory).
pub async fn initialize_backend_with(connection: FileConnection) -> Result<AppState> {
    info!("Setting up storage");
    let catalog_service = CatalogService::new(
        Arc::new(ProductRepository::new(connection.clone())),
        Arc::new(CategoryRepository::new(connection.clone())),
    );

    info!("Setting up domain model");
    let cart_service = CartService::load(
        Arc::new(JsonCartStore::new(connection.clone())),
        catalog_service.clone(),
    )
    .await?;
    let business_service = BusinessService::new(
        Arc::new(BusinessRepository::new(connection.clone())),
        Arc::new(SocialLinkRepository::new(connection)),
        OrderMessageService::new(),
    );
    let checkout_service = CheckoutService::new(cart_service.clone(), business_service.clone());

    info!("Setting up application state");
    Ok(AppState {
        catalog_service,
        cart_service,
        checkout_service,
        business_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow the local frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route(
            "/products",
            get(io::rest::list_products).post(io::rest::create_product),
        )
        .route(
            "/products/:id",
            put(io::rest::update_product).delete(io::rest::delete_product),
        )
        .route("/products/:id/active", post(io::rest::set_product_active))
        .route(
            "/categories",
            get(io::rest::list_categories).post(io::rest::create_category),
        )
        .route("/categories/:id", delete(io::rest::delete_category))
        .route(
            "/business",
            get(io::rest::get_business_profile).put(io::rest::update_business_profile),
        )
        .route(
            "/business/social-links",
            get(io::rest::list_social_links).post(io::rest::add_social_link),
        )
        .route(
            "/business/social-links/:id",
            put(io::rest::update_social_link).delete(io::rest::delete_social_link),
        )
        .route("/cart", get(io::rest::get_cart).delete(io::rest::clear_cart))
        .route("/cart/items", post(io::rest::add_cart_item))
        .route("/cart/items/:product_id", delete(io::rest::remove_cart_item))
        .route(
            "/cart/items/:product_id/decrement",
            post(io::rest::decrement_cart_item),
        )
        .route("/checkout", get(io::rest::get_checkout_session))
        .route("/checkout/open", post(io::rest::open_checkout))
        .route("/checkout/close", post(io::rest::close_checkout))
        .route("/checkout/field", post(io::rest::update_checkout_field))
        .route("/checkout/time-slots", get(io::rest::get_time_slots))
        .route("/checkout/submit", post(io::rest::submit_checkout))
        .route("/contact", post(io::rest::send_contact_message));

    // Define our main application router
    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

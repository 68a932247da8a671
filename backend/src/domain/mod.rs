//! # Domain Module
//!
//! Business logic for the floristería storefront. Each service has one
//! focused responsibility and works against the storage traits, so the
//! layer is independent of both the io surface and the file formats
//! underneath.
//!
//! - **catalog_service**: products and categories (admin CRUD, storefront
//!   listings, visibility)
//! - **cart_service**: the persisted line-item store and its mutators
//! - **checkout_service**: the cart → checkout → submitted flow with form
//!   validation and time-slot filtering
//! - **order_message**: order/contact message rendering and the WhatsApp
//!   deep link
//! - **business_service**: the store profile and social links

pub mod business_service;
pub mod cart_service;
pub mod catalog_service;
pub mod checkout_service;
pub mod order_message;

pub use business_service::BusinessService;
pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use checkout_service::{CheckoutConfig, CheckoutError, CheckoutService};
pub use order_message::{OrderMessageError, OrderMessageService};

//! # Storage Module
//!
//! Data persistence for the storefront. Everything is file-based under one
//! data directory: the cart as a versioned JSON document, products /
//! categories / social links as CSV files, and the business profile as a
//! YAML document. The domain layer only sees the traits defined in
//! [`traits`], so the backing format can change without touching business
//! logic.

pub mod business_repository;
pub mod cart_store;
pub mod connection;
pub mod csv;
pub mod traits;

pub use business_repository::BusinessRepository;
pub use cart_store::JsonCartStore;
pub use connection::FileConnection;
pub use self::csv::{CategoryRepository, ProductRepository, SocialLinkRepository};
pub use traits::{
    BusinessProfileStorage, CartStorage, CategoryStorage, ProductStorage, SocialLinkStorage,
};

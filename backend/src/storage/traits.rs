//! # Storage Traits
//!
//! Abstractions over the persistence layer so the domain services can work
//! against any backing store. The shipped implementations are file-based
//! (JSON for the cart, CSV for row data, YAML for the business profile).

use anyhow::Result;
use async_trait::async_trait;
use shared::{BusinessProfile, CartLine, Category, Product, SocialLink};

/// Interface for persisting the cart between application runs.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Load the last-saved cart. Implementations must degrade to an empty
    /// list on missing or unreadable data rather than fail.
    async fn load_cart(&self) -> Result<Vec<CartLine>>;

    /// Persist the full current line list.
    async fn save_cart(&self, lines: &[CartLine]) -> Result<()>;
}

/// Interface for product storage operations.
#[async_trait]
pub trait ProductStorage: Send + Sync {
    /// Store a new product
    async fn store_product(&self, product: &Product) -> Result<()>;

    /// Retrieve a specific product by id
    async fn get_product(&self, product_id: &str) -> Result<Option<Product>>;

    /// List all products, most recently created first
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Update an existing product
    async fn update_product(&self, product: &Product) -> Result<()>;

    /// Delete a product by id. Returns true if it existed.
    async fn delete_product(&self, product_id: &str) -> Result<bool>;
}

/// Interface for category storage operations.
#[async_trait]
pub trait CategoryStorage: Send + Sync {
    /// Store a new category
    async fn store_category(&self, category: &Category) -> Result<()>;

    /// Retrieve a specific category by id
    async fn get_category(&self, category_id: &str) -> Result<Option<Category>>;

    /// List all categories, oldest first
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Delete a category by id. Returns true if it existed.
    async fn delete_category(&self, category_id: &str) -> Result<bool>;
}

/// Interface for the single business profile document.
#[async_trait]
pub trait BusinessProfileStorage: Send + Sync {
    /// Load the profile; `None` when it has never been saved.
    async fn get_profile(&self) -> Result<Option<BusinessProfile>>;

    /// Replace the stored profile.
    async fn save_profile(&self, profile: &BusinessProfile) -> Result<()>;
}

/// Interface for social link storage operations.
#[async_trait]
pub trait SocialLinkStorage: Send + Sync {
    /// Store a new link
    async fn store_link(&self, link: &SocialLink) -> Result<()>;

    /// List all links, oldest first
    async fn list_links(&self) -> Result<Vec<SocialLink>>;

    /// Update an existing link
    async fn update_link(&self, link: &SocialLink) -> Result<()>;

    /// Delete a link by id. Returns true if it existed.
    async fn delete_link(&self, link_id: &str) -> Result<bool>;
}

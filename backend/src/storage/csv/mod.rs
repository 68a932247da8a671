//! CSV-backed repositories for row-shaped data.

pub mod category_repository;
pub mod product_repository;
pub mod social_link_repository;

pub use category_repository::CategoryRepository;
pub use product_repository::ProductRepository;
pub use social_link_repository::SocialLinkRepository;

//! # REST API Interface Layer
//!
//! HTTP endpoints for the floristería storefront, one module per domain
//! area. Each handler logs the request, calls the matching service, and
//! maps the result to a status code plus JSON body.

// Module declarations
pub mod business_apis;
pub mod cart_apis;
pub mod category_apis;
pub mod checkout_apis;
pub mod contact_apis;
pub mod product_apis;

pub use business_apis::*;
pub use cart_apis::*;
pub use category_apis::*;
pub use checkout_apis::*;
pub use contact_apis::*;
pub use product_apis::*;

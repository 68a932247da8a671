//! Shared DTOs for the floristería storefront.
//!
//! Every type that crosses the io boundary lives here: catalog records,
//! cart lines, checkout form state, business profile data, and the
//! request/response shapes the REST layer exposes. The backend domain
//! services consume these types directly; any frontend can depend on this
//! crate to stay in sync with the API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A product as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in the store currency (soles)
    pub price: f64,
    /// URL of the product photo on the image CDN
    pub image_url: Option<String>,
    /// Category this product belongs to; `None` renders as uncategorized
    pub category_id: Option<String>,
    /// Whether the product is visible in the storefront
    pub active: bool,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

/// A product together with its resolved category name, as shown in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub product: Product,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}

/// Full-record product update; every field is written as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetProductActiveRequest {
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Business profile & social links
// ---------------------------------------------------------------------------

/// The store's own record: display data plus the WhatsApp number that
/// order and contact messages are sent to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub store_name: String,
    pub location: Option<String>,
    /// Phone number shown on the contact page
    pub display_phone: Option<String>,
    /// Destination for WhatsApp deep links; checkout fails without it
    pub whatsapp_phone: Option<String>,
    /// Greeting line placed at the top of order messages
    pub order_greeting: Option<String>,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBusinessProfileRequest {
    pub store_name: String,
    pub location: Option<String>,
    pub display_phone: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub order_greeting: Option<String>,
}

/// A social network link shown in the storefront footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: String,
    /// Network name from the configured set (Facebook, Instagram, ...)
    pub name: String,
    pub url: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSocialLinkRequest {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSocialLinkRequest {
    pub url: String,
}

/// Current links plus the networks that can still be added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLinksResponse {
    pub links: Vec<SocialLink>,
    pub available_networks: Vec<String>,
}

/// Contact-page form: forwarded to the store's WhatsApp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessageRequest {
    pub name: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessageResponse {
    pub whatsapp_url: String,
    pub notification: String,
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

/// One product in the cart with the quantity requested.
///
/// All product fields are a snapshot taken when the line was first added;
/// later catalog edits do not touch lines already in the cart. The displayed
/// price is always `unit_price * quantity`, computed, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product identity; at most one line per product exists in a cart
    pub product_id: String,
    pub name: String,
    pub unit_price: f64,
    pub image_url: Option<String>,
    pub category_label: Option<String>,
    /// Always >= 1; a line whose quantity would reach 0 is removed instead
    pub quantity: u32,
}

impl CartLine {
    /// Line subtotal, recomputed on every call.
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// The cart as the UI sees it: lines plus derived figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    /// Sum of all line quantities (badge count)
    pub count: u32,
    /// Sum of all line subtotals
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: String,
    /// Defaults to 1; values below 1 are clamped to 1
    pub quantity: Option<u32>,
    /// Defaults to true; pass false to suppress the user notification
    /// (e.g. the quantity stepper inside the cart panel)
    pub notify: Option<bool>,
}

/// Result of any cart mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartMutationResponse {
    pub cart: CartSnapshot,
    /// User-facing toast text, absent when the caller suppressed it
    pub notification: Option<String>,
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Delivery,
    Pickup,
}

/// Which panel view the customer is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutView {
    /// Browsing / editing line items
    Cart,
    /// Filling the delivery and contact form
    Checkout,
}

/// Form fields that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutField {
    Name,
    DeliveryType,
    Date,
    TimeSlot,
    District,
    Address,
    Phone,
    Dedication,
    Observation,
}

/// Validation failures the checkout form can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CheckoutValidationError {
    EmptyName,
    MissingDeliveryType,
    MissingDate,
    InvalidDate,
    DateInPast,
    MissingTimeSlot,
    /// The chosen slot is no longer in the filtered list
    SlotUnavailable,
    MissingDistrict,
    UnknownDistrict,
    EmptyAddress,
    MissingPhone,
    InvalidPhone,
}

/// A field-level error message as surfaced next to the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutFieldError {
    pub field: CheckoutField,
    pub message: String,
}

/// Raw checkout form state. Everything is kept as entered; parsing and
/// validation happen on submit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutFormState {
    pub name: String,
    pub delivery_type: Option<DeliveryType>,
    /// Delivery date as `YYYY-MM-DD`
    pub date: String,
    /// Label of the chosen time slot
    pub time_slot: String,
    pub district: String,
    pub address: String,
    /// Digits only, normalized on every edit
    pub phone: String,
    pub dedication: String,
    pub observation: String,
}

/// The whole checkout session as returned to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSessionState {
    pub view: CheckoutView,
    pub form: CheckoutFormState,
    pub errors: Vec<CheckoutFieldError>,
}

impl Default for CheckoutSessionState {
    fn default() -> Self {
        Self {
            view: CheckoutView::Cart,
            form: CheckoutFormState::default(),
            errors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCheckoutFieldRequest {
    pub field: CheckoutField,
    pub value: String,
}

/// A delivery time range offered during checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Display label, e.g. "09:00 - 11:00"
    pub label: String,
    /// Starting hour used by the filtering rules
    pub start_hour: u32,
}

/// Slots currently offered for the selected district and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotsResponse {
    pub slots: Vec<TimeSlot>,
    /// Present when filtering removed every slot
    pub notice: Option<String>,
}

/// Result of a successful checkout submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSubmitResponse {
    /// Pre-filled WhatsApp compose link for the caller to open
    pub whatsapp_url: String,
    /// The plain-text order message embedded in the link
    pub message: String,
    /// Normalized digits-only destination phone
    pub destination_phone: String,
    pub notification: String,
    /// The cart after submission (always empty)
    pub cart: CartSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_line_subtotal_is_computed() {
        let line = CartLine {
            product_id: "p1".to_string(),
            name: "Rosa Roja".to_string(),
            unit_price: 45.0,
            image_url: None,
            category_label: None,
            quantity: 2,
        };
        assert_eq!(line.subtotal(), 90.0);
    }

    #[test]
    fn delivery_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&DeliveryType::Delivery).unwrap(),
            "\"delivery\""
        );
        assert_eq!(
            serde_json::from_str::<DeliveryType>("\"pickup\"").unwrap(),
            DeliveryType::Pickup
        );
    }

    #[test]
    fn checkout_session_defaults_to_cart_view() {
        let session = CheckoutSessionState::default();
        assert_eq!(session.view, CheckoutView::Cart);
        assert!(session.errors.is_empty());
        assert!(session.form.name.is_empty());
        assert!(session.form.delivery_type.is_none());
    }

    #[test]
    fn cart_line_round_trips_through_json() {
        let line = CartLine {
            product_id: "p1".to_string(),
            name: "Girasol".to_string(),
            unit_price: 12.5,
            image_url: Some("https://cdn.example/girasol.jpg".to_string()),
            category_label: Some("Flores".to_string()),
            quantity: 3,
        };
        let json = serde_json::to_string(&line).unwrap();
        let back: CartLine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, line);
    }
}

//! # JSON Cart Store
//!
//! Persists the shopping cart to a single `cart.json` file so line items
//! survive application restarts.
//!
//! ## File format
//!
//! The file holds a versioned envelope:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "lines": [
//!     { "product_id": "...", "name": "...", "unit_price": 45.0,
//!       "image_url": null, "category_label": "Rosas", "quantity": 2 }
//!   ]
//! }
//! ```
//!
//! Two degraded shapes are handled on load:
//! - the legacy bare array the web storefront kept in browser storage
//!   (product rows spread into each item, Spanish column names, numeric
//!   ids) is migrated into the envelope and re-saved;
//! - anything else unreadable is logged and treated as an empty cart.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::storage::{connection::FileConnection, traits::CartStorage};
use shared::CartLine;

/// Current on-disk schema version.
const CART_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CartEnvelope {
    schema_version: u32,
    lines: Vec<CartLine>,
}

/// One item of the legacy browser-storage array: the raw product row
/// spread together with the requested quantity.
#[derive(Debug, Deserialize)]
struct LegacyCartItem {
    id: serde_json::Value,
    nombre: String,
    precio: f64,
    #[serde(default)]
    imagen_url: Option<String>,
    #[serde(default)]
    categorias: Option<LegacyCategoryRef>,
    quantity: u32,
}

#[derive(Debug, Deserialize)]
struct LegacyCategoryRef {
    nombre: String,
}

impl From<LegacyCartItem> for CartLine {
    fn from(item: LegacyCartItem) -> Self {
        // Legacy ids were numeric database keys; render them as strings.
        let product_id = match &item.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        CartLine {
            product_id,
            name: item.nombre,
            unit_price: item.precio,
            image_url: item.imagen_url,
            category_label: item.categorias.map(|c| c.nombre),
            quantity: item.quantity.max(1),
        }
    }
}

/// JSON-file cart store.
#[derive(Clone)]
pub struct JsonCartStore {
    connection: FileConnection,
}

impl JsonCartStore {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn write_envelope(&self, lines: &[CartLine]) -> Result<()> {
        let envelope = CartEnvelope {
            schema_version: CART_SCHEMA_VERSION,
            lines: lines.to_vec(),
        };

        let content = serde_json::to_string_pretty(&envelope)
            .context("Failed to serialize cart")?;

        // Atomic write using temp file
        let path = self.connection.cart_file();
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}

#[async_trait]
impl CartStorage for JsonCartStore {
    async fn load_cart(&self) -> Result<Vec<CartLine>> {
        let path = self.connection.cart_file();

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cart file {}", path.display()))?;

        match serde_json::from_str::<CartEnvelope>(&content) {
            Ok(envelope) if envelope.schema_version == CART_SCHEMA_VERSION => {
                Ok(envelope.lines)
            }
            Ok(envelope) => {
                warn!(
                    "Cart file has unknown schema version {}, starting with an empty cart",
                    envelope.schema_version
                );
                Ok(Vec::new())
            }
            Err(_) => match serde_json::from_str::<Vec<LegacyCartItem>>(&content) {
                Ok(legacy_items) => {
                    let lines: Vec<CartLine> =
                        legacy_items.into_iter().map(CartLine::from).collect();
                    info!(
                        "Migrated legacy cart file with {} line(s) to schema version {}",
                        lines.len(),
                        CART_SCHEMA_VERSION
                    );
                    if let Err(e) = self.write_envelope(&lines) {
                        warn!("Failed to re-save migrated cart: {}", e);
                    }
                    Ok(lines)
                }
                Err(e) => {
                    warn!("Cart file is unreadable ({}), starting with an empty cart", e);
                    Ok(Vec::new())
                }
            },
        }
    }

    async fn save_cart(&self, lines: &[CartLine]) -> Result<()> {
        self.write_envelope(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_line(product_id: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: product_id.to_string(),
            name: "Rosa Roja".to_string(),
            unit_price: 45.0,
            image_url: Some("https://cdn.example/rosa.jpg".to_string()),
            category_label: Some("Rosas".to_string()),
            quantity,
        }
    }

    #[tokio::test]
    async fn load_missing_file_returns_empty_cart() {
        let tmp = tempdir().unwrap();
        let store = JsonCartStore::new(FileConnection::new(tmp.path()).unwrap());

        let lines = store.load_cart().await.unwrap();

        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let tmp = tempdir().unwrap();
        let store = JsonCartStore::new(FileConnection::new(tmp.path()).unwrap());

        let lines = vec![sample_line("p1", 2), sample_line("p2", 1)];
        store.save_cart(&lines).await.unwrap();

        let loaded = store.load_cart().await.unwrap();

        assert_eq!(loaded, lines);
    }

    #[tokio::test]
    async fn corrupt_file_degrades_to_empty_cart() {
        let tmp = tempdir().unwrap();
        let connection = FileConnection::new(tmp.path()).unwrap();
        fs::write(connection.cart_file(), "{not json at all").unwrap();

        let store = JsonCartStore::new(connection);
        let lines = store.load_cart().await.unwrap();

        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn unknown_schema_version_degrades_to_empty_cart() {
        let tmp = tempdir().unwrap();
        let connection = FileConnection::new(tmp.path()).unwrap();
        fs::write(
            connection.cart_file(),
            r#"{"schema_version": 99, "lines": []}"#,
        )
        .unwrap();

        let store = JsonCartStore::new(connection);
        let lines = store.load_cart().await.unwrap();

        assert!(lines.is_empty());
    }

    #[tokio::test]
    async fn legacy_browser_array_is_migrated() {
        let tmp = tempdir().unwrap();
        let connection = FileConnection::new(tmp.path()).unwrap();
        let legacy = r#"[
            {
                "id": 7,
                "nombre": "Rosa Roja",
                "descripcion": "Docena de rosas",
                "precio": 45.0,
                "imagen_url": "https://cdn.example/rosa.jpg",
                "categoria_id": 2,
                "activo": true,
                "categorias": { "nombre": "Rosas" },
                "quantity": 2
            }
        ]"#;
        fs::write(connection.cart_file(), legacy).unwrap();

        let store = JsonCartStore::new(connection.clone());
        let lines = store.load_cart().await.unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_id, "7");
        assert_eq!(lines[0].name, "Rosa Roja");
        assert_eq!(lines[0].unit_price, 45.0);
        assert_eq!(lines[0].category_label.as_deref(), Some("Rosas"));
        assert_eq!(lines[0].quantity, 2);

        // The migrated cart is re-saved in the versioned envelope.
        let content = fs::read_to_string(connection.cart_file()).unwrap();
        let envelope: CartEnvelope = serde_json::from_str(&content).unwrap();
        assert_eq!(envelope.schema_version, CART_SCHEMA_VERSION);
        assert_eq!(envelope.lines, lines);
    }
}

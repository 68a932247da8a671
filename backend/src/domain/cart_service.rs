//! Cart domain logic: the persisted line-item store and its mutators.
//!
//! The cart is a list of lines keyed by product id, held in memory and
//! written back to storage after every mutation. It is rehydrated exactly
//! once, when the service is constructed at application start. All product
//! fields on a line are a snapshot taken at add time.

use anyhow::{anyhow, Result};
use log::{info, warn};
use std::sync::{Arc, Mutex};

use crate::domain::catalog_service::CatalogService;
use crate::storage::CartStorage;
use shared::{AddCartItemRequest, CartLine, CartMutationResponse, CartSnapshot};

/// Cart service owning the in-memory line list.
#[derive(Clone)]
pub struct CartService {
    lines: Arc<Mutex<Vec<CartLine>>>,
    store: Arc<dyn CartStorage>,
    catalog_service: CatalogService,
}

impl CartService {
    /// Construct the service, rehydrating the cart saved by the previous
    /// session. A missing or unreadable cart file yields an empty cart.
    pub async fn load(store: Arc<dyn CartStorage>, catalog_service: CatalogService) -> Result<Self> {
        let lines = store.load_cart().await?;
        info!("Rehydrated cart with {} line(s)", lines.len());

        Ok(Self {
            lines: Arc::new(Mutex::new(lines)),
            store,
            catalog_service,
        })
    }

    /// Current cart contents plus derived count and total.
    pub fn snapshot(&self) -> CartSnapshot {
        let lines = self.lines.lock().unwrap();
        Self::snapshot_of(&lines)
    }

    fn snapshot_of(lines: &[CartLine]) -> CartSnapshot {
        CartSnapshot {
            lines: lines.to_vec(),
            count: lines.iter().map(|l| l.quantity).sum(),
            total: lines.iter().map(CartLine::subtotal).sum(),
        }
    }

    /// Add a product to the cart, merging into an existing line when the
    /// product is already there. Quantity defaults to 1 and is clamped to
    /// at least 1. The notification is suppressed when `notify` is false
    /// (quantity steppers inside the cart panel pass false to avoid a
    /// duplicate popup).
    pub async fn add_item(&self, request: AddCartItemRequest) -> Result<CartMutationResponse> {
        let quantity = request.quantity.unwrap_or(1).max(1);
        let notify = request.notify.unwrap_or(true);

        let product = self
            .catalog_service
            .get_product(&request.product_id)
            .await?
            .ok_or_else(|| anyhow!("Producto no encontrado: {}", request.product_id))?;

        if !product.active {
            return Err(anyhow!("El producto \"{}\" no está disponible", product.name));
        }

        let category_label = self
            .catalog_service
            .category_label(product.category_id.as_deref())
            .await?;

        let (snapshot, notification) = {
            let mut lines = self.lines.lock().unwrap();

            let notification = match lines.iter_mut().find(|l| l.product_id == product.id) {
                Some(line) => {
                    line.quantity += quantity;
                    format!("Se agregaron {} unidades de {}", quantity, product.name)
                }
                None => {
                    lines.push(CartLine {
                        product_id: product.id.clone(),
                        name: product.name.clone(),
                        unit_price: product.price,
                        image_url: product.image_url.clone(),
                        category_label,
                        quantity,
                    });
                    format!("{} agregado al carrito", product.name)
                }
            };

            (Self::snapshot_of(&lines), notification)
        };

        self.persist(&snapshot.lines).await;

        Ok(CartMutationResponse {
            cart: snapshot,
            notification: notify.then_some(notification),
        })
    }

    /// Decrease a line's quantity by one, removing the line entirely when
    /// it would drop below 1. Unknown product ids are a no-op.
    pub async fn decrement_item(&self, product_id: &str) -> Result<CartMutationResponse> {
        let snapshot = {
            let mut lines = self.lines.lock().unwrap();

            if let Some(index) = lines.iter().position(|l| l.product_id == product_id) {
                if lines[index].quantity <= 1 {
                    lines.remove(index);
                } else {
                    lines[index].quantity -= 1;
                }
            }

            Self::snapshot_of(&lines)
        };

        self.persist(&snapshot.lines).await;

        Ok(CartMutationResponse {
            cart: snapshot,
            notification: None,
        })
    }

    /// Remove a line unconditionally. Unknown product ids are a no-op and
    /// produce no notification.
    pub async fn remove_item(&self, product_id: &str, notify: bool) -> Result<CartMutationResponse> {
        let (snapshot, removed) = {
            let mut lines = self.lines.lock().unwrap();
            let before = lines.len();
            lines.retain(|l| l.product_id != product_id);
            (Self::snapshot_of(&lines), lines.len() < before)
        };

        self.persist(&snapshot.lines).await;

        Ok(CartMutationResponse {
            cart: snapshot,
            notification: (notify && removed)
                .then(|| "Producto eliminado del carrito".to_string()),
        })
    }

    /// Empty the whole cart.
    pub async fn clear(&self, notify: bool) -> Result<CartMutationResponse> {
        let snapshot = {
            let mut lines = self.lines.lock().unwrap();
            lines.clear();
            Self::snapshot_of(&lines)
        };

        self.persist(&snapshot.lines).await;

        Ok(CartMutationResponse {
            cart: snapshot,
            notification: notify.then(|| "Carrito vaciado".to_string()),
        })
    }

    /// Sum of all line quantities.
    pub fn count(&self) -> u32 {
        self.snapshot().count
    }

    /// Sum of `unit_price * quantity` over all lines, always recomputed.
    pub fn total(&self) -> f64 {
        self.snapshot().total
    }

    /// Best-effort persistence: the in-memory mutation stands even if the
    /// write fails.
    async fn persist(&self, lines: &[CartLine]) {
        if let Err(e) = self.store.save_cart(lines).await {
            warn!("Failed to persist cart: {}", e);
        }
    }
}

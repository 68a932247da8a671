//! Catalog domain logic: products and categories.
//!
//! Covers both sides of the store: the admin back office (full CRUD,
//! visibility toggling) and the storefront (active products only, with
//! resolved category names).

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::storage::{CategoryStorage, ProductStorage};
use shared::{
    CatalogEntry, Category, CreateCategoryRequest, CreateProductRequest, Product,
    UpdateProductRequest,
};

/// Catalog service handling product and category business rules.
#[derive(Clone)]
pub struct CatalogService {
    product_repository: Arc<dyn ProductStorage>,
    category_repository: Arc<dyn CategoryStorage>,
}

impl CatalogService {
    pub fn new(
        product_repository: Arc<dyn ProductStorage>,
        category_repository: Arc<dyn CategoryStorage>,
    ) -> Self {
        Self {
            product_repository,
            category_repository,
        }
    }

    // -- Products -----------------------------------------------------------

    pub async fn create_product(&self, request: CreateProductRequest) -> Result<Product> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(anyhow!("El nombre del producto es obligatorio"));
        }
        if !(request.price.is_finite() && request.price > 0.0) {
            return Err(anyhow!("El precio debe ser mayor a 0"));
        }
        if let Some(category_id) = &request.category_id {
            if self
                .category_repository
                .get_category(category_id)
                .await?
                .is_none()
            {
                return Err(anyhow!("La categoría seleccionada no existe"));
            }
        }

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name,
            description: request.description,
            price: request.price,
            image_url: request.image_url,
            category_id: request.category_id,
            // New products are visible until deactivated
            active: true,
            created_at: Utc::now().to_rfc3339(),
        };

        self.product_repository.store_product(&product).await?;
        info!("Created product {} ({})", product.name, product.id);

        Ok(product)
    }

    pub async fn update_product(
        &self,
        product_id: &str,
        request: UpdateProductRequest,
    ) -> Result<Product> {
        let existing = self
            .product_repository
            .get_product(product_id)
            .await?
            .ok_or_else(|| anyhow!("Producto no encontrado: {}", product_id))?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(anyhow!("El nombre del producto es obligatorio"));
        }
        if !(request.price.is_finite() && request.price > 0.0) {
            return Err(anyhow!("El precio debe ser mayor a 0"));
        }
        if let Some(category_id) = &request.category_id {
            if self
                .category_repository
                .get_category(category_id)
                .await?
                .is_none()
            {
                return Err(anyhow!("La categoría seleccionada no existe"));
            }
        }

        let product = Product {
            id: existing.id,
            name,
            description: request.description,
            price: request.price,
            image_url: request.image_url,
            category_id: request.category_id,
            active: existing.active,
            created_at: existing.created_at,
        };

        self.product_repository.update_product(&product).await?;
        info!("Updated product {} ({})", product.name, product.id);

        Ok(product)
    }

    /// Set storefront visibility without touching the rest of the record.
    pub async fn set_product_active(&self, product_id: &str, active: bool) -> Result<Product> {
        let mut product = self
            .product_repository
            .get_product(product_id)
            .await?
            .ok_or_else(|| anyhow!("Producto no encontrado: {}", product_id))?;

        product.active = active;
        self.product_repository.update_product(&product).await?;
        info!(
            "Product {} is now {}",
            product.id,
            if active { "active" } else { "hidden" }
        );

        Ok(product)
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<()> {
        if !self.product_repository.delete_product(product_id).await? {
            return Err(anyhow!("Producto no encontrado: {}", product_id));
        }
        info!("Deleted product {}", product_id);
        Ok(())
    }

    pub async fn get_product(&self, product_id: &str) -> Result<Option<Product>> {
        self.product_repository.get_product(product_id).await
    }

    /// Full catalog for the admin panel, newest first.
    pub async fn list_all_products(&self) -> Result<Vec<CatalogEntry>> {
        let products = self.product_repository.list_products().await?;
        self.with_category_names(products).await
    }

    /// Visible catalog for the storefront, newest first.
    pub async fn list_storefront_products(&self) -> Result<Vec<CatalogEntry>> {
        let products = self
            .product_repository
            .list_products()
            .await?
            .into_iter()
            .filter(|p| p.active)
            .collect();
        self.with_category_names(products).await
    }

    /// Resolve the category name a cart line snapshots at add time.
    pub async fn category_label(&self, category_id: Option<&str>) -> Result<Option<String>> {
        let Some(category_id) = category_id else {
            return Ok(None);
        };
        Ok(self
            .category_repository
            .get_category(category_id)
            .await?
            .map(|c| c.name))
    }

    async fn with_category_names(&self, products: Vec<Product>) -> Result<Vec<CatalogEntry>> {
        let categories = self.category_repository.list_categories().await?;
        let names: HashMap<String, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();

        Ok(products
            .into_iter()
            .map(|product| {
                let category_name = product
                    .category_id
                    .as_ref()
                    .and_then(|id| names.get(id).cloned());
                CatalogEntry {
                    product,
                    category_name,
                }
            })
            .collect())
    }

    // -- Categories ---------------------------------------------------------

    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(anyhow!("El nombre de la categoría es obligatorio"));
        }

        let existing = self.category_repository.list_categories().await?;
        if existing
            .iter()
            .any(|c| c.name.to_lowercase() == name.to_lowercase())
        {
            return Err(anyhow!("La categoría \"{}\" ya existe", name));
        }

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now().to_rfc3339(),
        };

        self.category_repository.store_category(&category).await?;
        info!("Created category {} ({})", category.name, category.id);

        Ok(category)
    }

    /// Delete a category. Products that pointed at it keep their stale
    /// `category_id` and simply render as uncategorized.
    pub async fn delete_category(&self, category_id: &str) -> Result<()> {
        if !self.category_repository.delete_category(category_id).await? {
            return Err(anyhow!("Categoría no encontrada: {}", category_id));
        }
        info!("Deleted category {}", category_id);
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.category_repository.list_categories().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{CategoryRepository, FileConnection, ProductRepository};
    use tempfile::{tempdir, TempDir};

    fn create_test_service() -> (CatalogService, TempDir) {
        let tmp = tempdir().unwrap();
        let connection = FileConnection::new(tmp.path()).unwrap();
        let service = CatalogService::new(
            Arc::new(ProductRepository::new(connection.clone())),
            Arc::new(CategoryRepository::new(connection)),
        );
        (service, tmp)
    }

    fn product_request(name: &str, price: f64) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            description: None,
            price,
            image_url: None,
            category_id: None,
        }
    }

    #[tokio::test]
    async fn create_product_requires_name_and_positive_price() {
        let (service, _tmp) = create_test_service();

        assert!(service.create_product(product_request("  ", 10.0)).await.is_err());
        assert!(service.create_product(product_request("Rosa", 0.0)).await.is_err());
        assert!(service.create_product(product_request("Rosa", -5.0)).await.is_err());

        let product = service
            .create_product(product_request("Rosa Roja", 45.0))
            .await
            .unwrap();
        assert!(product.active);
        assert_eq!(product.name, "Rosa Roja");
    }

    #[tokio::test]
    async fn create_product_rejects_unknown_category() {
        let (service, _tmp) = create_test_service();

        let mut request = product_request("Rosa", 45.0);
        request.category_id = Some("ghost".to_string());

        assert!(service.create_product(request).await.is_err());
    }

    #[tokio::test]
    async fn storefront_listing_excludes_hidden_products() {
        let (service, _tmp) = create_test_service();

        let visible = service
            .create_product(product_request("Rosa", 45.0))
            .await
            .unwrap();
        let hidden = service
            .create_product(product_request("Girasol", 20.0))
            .await
            .unwrap();
        service.set_product_active(&hidden.id, false).await.unwrap();

        let storefront = service.list_storefront_products().await.unwrap();
        assert_eq!(storefront.len(), 1);
        assert_eq!(storefront[0].product.id, visible.id);

        let admin = service.list_all_products().await.unwrap();
        assert_eq!(admin.len(), 2);
    }

    #[tokio::test]
    async fn listings_resolve_category_names() {
        let (service, _tmp) = create_test_service();

        let category = service
            .create_category(CreateCategoryRequest {
                name: "Rosas".to_string(),
            })
            .await
            .unwrap();

        let mut request = product_request("Rosa Roja", 45.0);
        request.category_id = Some(category.id.clone());
        service.create_product(request).await.unwrap();

        let entries = service.list_storefront_products().await.unwrap();
        assert_eq!(entries[0].category_name.as_deref(), Some("Rosas"));
    }

    #[tokio::test]
    async fn deleting_category_orphans_products() {
        let (service, _tmp) = create_test_service();

        let category = service
            .create_category(CreateCategoryRequest {
                name: "Rosas".to_string(),
            })
            .await
            .unwrap();

        let mut request = product_request("Rosa Roja", 45.0);
        request.category_id = Some(category.id.clone());
        let product = service.create_product(request).await.unwrap();

        service.delete_category(&category.id).await.unwrap();

        let entries = service.list_all_products().await.unwrap();
        assert_eq!(entries[0].product.id, product.id);
        assert!(entries[0].category_name.is_none());
    }

    #[tokio::test]
    async fn duplicate_category_name_is_rejected() {
        let (service, _tmp) = create_test_service();

        service
            .create_category(CreateCategoryRequest {
                name: "Rosas".to_string(),
            })
            .await
            .unwrap();

        let result = service
            .create_category(CreateCategoryRequest {
                name: "rosas".to_string(),
            })
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_product_keeps_visibility_and_creation_time() {
        let (service, _tmp) = create_test_service();

        let product = service
            .create_product(product_request("Rosa", 45.0))
            .await
            .unwrap();
        service.set_product_active(&product.id, false).await.unwrap();

        let updated = service
            .update_product(
                &product.id,
                UpdateProductRequest {
                    name: "Rosa Premium".to_string(),
                    description: Some("Docena".to_string()),
                    price: 60.0,
                    image_url: None,
                    category_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Rosa Premium");
        assert_eq!(updated.price, 60.0);
        assert!(!updated.active);
        assert_eq!(updated.created_at, product.created_at);
    }
}

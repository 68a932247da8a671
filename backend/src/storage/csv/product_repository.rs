//! # CSV Product Repository
//!
//! File-based product storage. The whole catalog lives in a single
//! `products.csv` with a header row:
//!
//! ```csv
//! id,name,description,price,image_url,category_id,active,created_at
//! 3f2a...,Rosa Roja,Docena de rosas,45.0,https://...,9b1c...,true,2025-01-20T10:00:00Z
//! ```
//!
//! Optional columns are stored as empty strings. Rows that fail to parse
//! are skipped with a warning so one bad row never takes the catalog down.

use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use crate::storage::{connection::FileConnection, traits::ProductStorage};
use shared::Product;

/// CSV record structure for products
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRecord {
    id: String,
    name: String,
    description: String,
    price: f64,
    image_url: String,
    category_id: String,
    active: bool,
    created_at: String,
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        ProductRecord {
            id: product.id,
            name: product.name,
            description: product.description.unwrap_or_default(),
            price: product.price,
            image_url: product.image_url.unwrap_or_default(),
            category_id: product.category_id.unwrap_or_default(),
            active: product.active,
            created_at: product.created_at,
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let none_if_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        Product {
            id: record.id,
            name: record.name,
            description: none_if_empty(record.description),
            price: record.price,
            image_url: none_if_empty(record.image_url),
            category_id: none_if_empty(record.category_id),
            active: record.active,
            created_at: record.created_at,
        }
    }
}

/// CSV-based product repository.
#[derive(Clone)]
pub struct ProductRepository {
    connection: FileConnection,
}

impl ProductRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    /// Ensure the products CSV file exists with its header row.
    fn ensure_file_exists(&self) -> Result<()> {
        let path = self.connection.products_file();

        if !path.exists() {
            let header = "id,name,description,price,image_url,category_id,active,created_at\n";
            std::fs::write(&path, header)?;
            debug!("Created products CSV file: {:?}", path);
        }

        Ok(())
    }

    /// Read every product from the CSV file.
    fn read_products(&self) -> Result<Vec<Product>> {
        self.ensure_file_exists()?;

        let file = File::open(self.connection.products_file())?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut products = Vec::new();

        for result in csv_reader.deserialize::<ProductRecord>() {
            match result {
                Ok(record) => products.push(Product::from(record)),
                Err(e) => {
                    warn!("Failed to parse product record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(products)
    }

    /// Rewrite the full CSV file atomically.
    fn write_products(&self, products: &[Product]) -> Result<()> {
        let path = self.connection.products_file();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let writer = BufWriter::new(temp_file);
            let mut csv_writer = Writer::from_writer(writer);

            for product in products {
                csv_writer.serialize(ProductRecord::from(product.clone()))?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!("Wrote {} products to {:?}", products.len(), path);
        Ok(())
    }
}

#[async_trait]
impl ProductStorage for ProductRepository {
    async fn store_product(&self, product: &Product) -> Result<()> {
        let mut products = self.read_products()?;
        products.push(product.clone());
        self.write_products(&products)
    }

    async fn get_product(&self, product_id: &str) -> Result<Option<Product>> {
        let products = self.read_products()?;
        Ok(products.into_iter().find(|p| p.id == product_id))
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let mut products = self.read_products()?;
        // Most recently created first, matching the admin listing order
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let mut products = self.read_products()?;

        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => return Err(anyhow::anyhow!("Product not found: {}", product.id)),
        }

        self.write_products(&products)
    }

    async fn delete_product(&self, product_id: &str) -> Result<bool> {
        let mut products = self.read_products()?;
        let before = products.len();
        products.retain(|p| p.id != product_id);

        if products.len() == before {
            return Ok(false);
        }

        self.write_products(&products)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_product(id: &str, name: &str, created_at: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: Some("Docena de rosas".to_string()),
            price: 45.0,
            image_url: None,
            category_id: Some("cat-1".to_string()),
            active: true,
            created_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn store_and_get_product() {
        let tmp = tempdir().unwrap();
        let repo = ProductRepository::new(FileConnection::new(tmp.path()).unwrap());

        let product = sample_product("p1", "Rosa Roja", "2025-01-20T10:00:00Z");
        repo.store_product(&product).await.unwrap();

        let loaded = repo.get_product("p1").await.unwrap();
        assert_eq!(loaded, Some(product));
    }

    #[tokio::test]
    async fn get_missing_product_returns_none() {
        let tmp = tempdir().unwrap();
        let repo = ProductRepository::new(FileConnection::new(tmp.path()).unwrap());

        assert!(repo.get_product("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_products_newest_first() {
        let tmp = tempdir().unwrap();
        let repo = ProductRepository::new(FileConnection::new(tmp.path()).unwrap());

        repo.store_product(&sample_product("p1", "Rosa", "2025-01-01T00:00:00Z"))
            .await
            .unwrap();
        repo.store_product(&sample_product("p2", "Girasol", "2025-02-01T00:00:00Z"))
            .await
            .unwrap();

        let products = repo.list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "p2");
        assert_eq!(products[1].id, "p1");
    }

    #[tokio::test]
    async fn update_product_replaces_record() {
        let tmp = tempdir().unwrap();
        let repo = ProductRepository::new(FileConnection::new(tmp.path()).unwrap());

        let mut product = sample_product("p1", "Rosa Roja", "2025-01-20T10:00:00Z");
        repo.store_product(&product).await.unwrap();

        product.price = 50.0;
        product.active = false;
        repo.update_product(&product).await.unwrap();

        let loaded = repo.get_product("p1").await.unwrap().unwrap();
        assert_eq!(loaded.price, 50.0);
        assert!(!loaded.active);
    }

    #[tokio::test]
    async fn update_missing_product_fails() {
        let tmp = tempdir().unwrap();
        let repo = ProductRepository::new(FileConnection::new(tmp.path()).unwrap());

        let product = sample_product("ghost", "Fantasma", "2025-01-20T10:00:00Z");
        assert!(repo.update_product(&product).await.is_err());
    }

    #[tokio::test]
    async fn delete_product_reports_existence() {
        let tmp = tempdir().unwrap();
        let repo = ProductRepository::new(FileConnection::new(tmp.path()).unwrap());

        repo.store_product(&sample_product("p1", "Rosa", "2025-01-20T10:00:00Z"))
            .await
            .unwrap();

        assert!(repo.delete_product("p1").await.unwrap());
        assert!(!repo.delete_product("p1").await.unwrap());
        assert!(repo.get_product("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn optional_fields_survive_round_trip() {
        let tmp = tempdir().unwrap();
        let repo = ProductRepository::new(FileConnection::new(tmp.path()).unwrap());

        let product = Product {
            id: "p1".to_string(),
            name: "Orquídea".to_string(),
            description: None,
            price: 120.0,
            image_url: None,
            category_id: None,
            active: true,
            created_at: "2025-01-20T10:00:00Z".to_string(),
        };
        repo.store_product(&product).await.unwrap();

        let loaded = repo.get_product("p1").await.unwrap().unwrap();
        assert_eq!(loaded, product);
    }
}

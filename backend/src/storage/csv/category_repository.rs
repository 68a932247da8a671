//! # CSV Category Repository
//!
//! Categories live in `categories.csv` with a header row:
//!
//! ```csv
//! id,name,created_at
//! 9b1c...,Rosas,2025-01-20T10:00:00Z
//! ```

use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use crate::storage::{connection::FileConnection, traits::CategoryStorage};
use shared::Category;

/// CSV record structure for categories
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CategoryRecord {
    id: String,
    name: String,
    created_at: String,
}

impl From<Category> for CategoryRecord {
    fn from(category: Category) -> Self {
        CategoryRecord {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
        }
    }
}

/// CSV-based category repository.
#[derive(Clone)]
pub struct CategoryRepository {
    connection: FileConnection,
}

impl CategoryRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn ensure_file_exists(&self) -> Result<()> {
        let path = self.connection.categories_file();

        if !path.exists() {
            std::fs::write(&path, "id,name,created_at\n")?;
            debug!("Created categories CSV file: {:?}", path);
        }

        Ok(())
    }

    fn read_categories(&self) -> Result<Vec<Category>> {
        self.ensure_file_exists()?;

        let file = File::open(self.connection.categories_file())?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut categories = Vec::new();

        for result in csv_reader.deserialize::<CategoryRecord>() {
            match result {
                Ok(record) => categories.push(Category::from(record)),
                Err(e) => {
                    warn!("Failed to parse category record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(categories)
    }

    fn write_categories(&self, categories: &[Category]) -> Result<()> {
        let path = self.connection.categories_file();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let writer = BufWriter::new(temp_file);
            let mut csv_writer = Writer::from_writer(writer);

            for category in categories {
                csv_writer.serialize(CategoryRecord::from(category.clone()))?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

#[async_trait]
impl CategoryStorage for CategoryRepository {
    async fn store_category(&self, category: &Category) -> Result<()> {
        let mut categories = self.read_categories()?;
        categories.push(category.clone());
        self.write_categories(&categories)
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<Category>> {
        let categories = self.read_categories()?;
        Ok(categories.into_iter().find(|c| c.id == category_id))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.read_categories()?;
        // Oldest first, matching the storefront navigation order
        categories.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(categories)
    }

    async fn delete_category(&self, category_id: &str) -> Result<bool> {
        let mut categories = self.read_categories()?;
        let before = categories.len();
        categories.retain(|c| c.id != category_id);

        if categories.len() == before {
            return Ok(false);
        }

        self.write_categories(&categories)?;
        Ok(true)
    }
}

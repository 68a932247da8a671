//! File-backed storage connection.
//!
//! `FileConnection` owns the base data directory and hands out the paths
//! the repositories read and write. The directory is created on demand so
//! a fresh install starts from an empty store.

use anyhow::{anyhow, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the application folder inside the user's data directory.
const DATA_DIR_NAME: &str = "Floristeria";

/// Manages the base directory all storage files live in.
#[derive(Clone)]
pub struct FileConnection {
    base_directory: PathBuf,
}

impl FileConnection {
    /// Create a connection rooted at the given directory, creating it if
    /// it does not exist yet.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default per-user data directory.
    pub fn new_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine the user data directory"))?;
        let base = data_dir.join(DATA_DIR_NAME);
        info!("Using data directory: {}", base.display());
        Self::new(base)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Path of the persisted cart (JSON envelope).
    pub fn cart_file(&self) -> PathBuf {
        self.base_directory.join("cart.json")
    }

    /// Path of the product catalog CSV.
    pub fn products_file(&self) -> PathBuf {
        self.base_directory.join("products.csv")
    }

    /// Path of the category CSV.
    pub fn categories_file(&self) -> PathBuf {
        self.base_directory.join("categories.csv")
    }

    /// Path of the social links CSV.
    pub fn social_links_file(&self) -> PathBuf {
        self.base_directory.join("social_links.csv")
    }

    /// Path of the business profile document.
    pub fn business_file(&self) -> PathBuf {
        self.base_directory.join("business.yaml")
    }
}

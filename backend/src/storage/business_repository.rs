//! # Business Profile Repository
//!
//! The store's own record is a single YAML document (`business.yaml`). A
//! missing file means the profile has never been configured; an unreadable
//! file is treated the same way, with a warning, so a corrupted document
//! never takes the application down.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::fs;

use crate::storage::{connection::FileConnection, traits::BusinessProfileStorage};
use shared::BusinessProfile;

/// YAML-backed business profile repository.
#[derive(Clone)]
pub struct BusinessRepository {
    connection: FileConnection,
}

impl BusinessRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl BusinessProfileStorage for BusinessRepository {
    async fn get_profile(&self) -> Result<Option<BusinessProfile>> {
        let path = self.connection.business_file();

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read business profile {}", path.display()))?;

        match serde_yaml::from_str::<BusinessProfile>(&content) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("Business profile is unreadable ({}), treating as unconfigured", e);
                Ok(None)
            }
        }
    }

    async fn save_profile(&self, profile: &BusinessProfile) -> Result<()> {
        let path = self.connection.business_file();
        let content = serde_yaml::to_string(profile)
            .context("Failed to serialize business profile")?;

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        info!("Saved business profile for {}", profile.store_name);
        Ok(())
    }
}

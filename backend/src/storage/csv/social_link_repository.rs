//! # CSV Social Link Repository
//!
//! Footer social links live in `social_links.csv` with a header row:
//!
//! ```csv
//! id,name,url,created_at
//! 5d0e...,Instagram,https://instagram.com/floristeria,2025-01-20T10:00:00Z
//! ```

use anyhow::Result;
use async_trait::async_trait;
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use crate::storage::{connection::FileConnection, traits::SocialLinkStorage};
use shared::SocialLink;

/// CSV record structure for social links
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SocialLinkRecord {
    id: String,
    name: String,
    url: String,
    created_at: String,
}

impl From<SocialLink> for SocialLinkRecord {
    fn from(link: SocialLink) -> Self {
        SocialLinkRecord {
            id: link.id,
            name: link.name,
            url: link.url,
            created_at: link.created_at,
        }
    }
}

impl From<SocialLinkRecord> for SocialLink {
    fn from(record: SocialLinkRecord) -> Self {
        SocialLink {
            id: record.id,
            name: record.name,
            url: record.url,
            created_at: record.created_at,
        }
    }
}

/// CSV-based social link repository.
#[derive(Clone)]
pub struct SocialLinkRepository {
    connection: FileConnection,
}

impl SocialLinkRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn ensure_file_exists(&self) -> Result<()> {
        let path = self.connection.social_links_file();

        if !path.exists() {
            std::fs::write(&path, "id,name,url,created_at\n")?;
            debug!("Created social links CSV file: {:?}", path);
        }

        Ok(())
    }

    fn read_links(&self) -> Result<Vec<SocialLink>> {
        self.ensure_file_exists()?;

        let file = File::open(self.connection.social_links_file())?;
        let reader = BufReader::new(file);
        let mut csv_reader = Reader::from_reader(reader);

        let mut links = Vec::new();

        for result in csv_reader.deserialize::<SocialLinkRecord>() {
            match result {
                Ok(record) => links.push(SocialLink::from(record)),
                Err(e) => {
                    warn!("Failed to parse social link record: {}. Skipping.", e);
                    continue;
                }
            }
        }

        Ok(links)
    }

    fn write_links(&self, links: &[SocialLink]) -> Result<()> {
        let path = self.connection.social_links_file();
        let temp_path = path.with_extension("csv.tmp");

        {
            let temp_file = File::create(&temp_path)?;
            let writer = BufWriter::new(temp_file);
            let mut csv_writer = Writer::from_writer(writer);

            for link in links {
                csv_writer.serialize(SocialLinkRecord::from(link.clone()))?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

#[async_trait]
impl SocialLinkStorage for SocialLinkRepository {
    async fn store_link(&self, link: &SocialLink) -> Result<()> {
        let mut links = self.read_links()?;
        links.push(link.clone());
        self.write_links(&links)
    }

    async fn list_links(&self) -> Result<Vec<SocialLink>> {
        let mut links = self.read_links()?;
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(links)
    }

    async fn update_link(&self, link: &SocialLink) -> Result<()> {
        let mut links = self.read_links()?;

        match links.iter_mut().find(|l| l.id == link.id) {
            Some(existing) => *existing = link.clone(),
            None => return Err(anyhow::anyhow!("Social link not found: {}", link.id)),
        }

        self.write_links(&links)
    }

    async fn delete_link(&self, link_id: &str) -> Result<bool> {
        let mut links = self.read_links()?;
        let before = links.len();
        links.retain(|l| l.id != link_id);

        if links.len() == before {
            return Ok(false);
        }

        self.write_links(&links)?;
        Ok(true)
    }
}

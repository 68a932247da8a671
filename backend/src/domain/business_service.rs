//! Business profile domain logic.
//!
//! Handles the store's own record (name, location, phones, order greeting),
//! the footer social links, and the contact-page message that is forwarded
//! to the store's WhatsApp.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::order_message::OrderMessageService;
use crate::storage::{BusinessProfileStorage, SocialLinkStorage};
use shared::{
    BusinessProfile, ContactMessageRequest, ContactMessageResponse, CreateSocialLinkRequest,
    SocialLink, SocialLinksResponse, UpdateBusinessProfileRequest, UpdateSocialLinkRequest,
};

/// Networks a link can be created for.
const AVAILABLE_NETWORKS: &[&str] = &["Facebook", "Instagram", "TikTok", "YouTube", "X"];

/// Business profile and social link service.
#[derive(Clone)]
pub struct BusinessService {
    profile_repository: Arc<dyn BusinessProfileStorage>,
    social_link_repository: Arc<dyn SocialLinkStorage>,
    message_service: OrderMessageService,
}

impl BusinessService {
    pub fn new(
        profile_repository: Arc<dyn BusinessProfileStorage>,
        social_link_repository: Arc<dyn SocialLinkStorage>,
        message_service: OrderMessageService,
    ) -> Self {
        Self {
            profile_repository,
            social_link_repository,
            message_service,
        }
    }

    // -- Profile ------------------------------------------------------------

    /// Load the profile; `None` until the back office saves it once.
    pub async fn get_profile(&self) -> Result<Option<BusinessProfile>> {
        self.profile_repository.get_profile().await
    }

    pub async fn update_profile(
        &self,
        request: UpdateBusinessProfileRequest,
    ) -> Result<BusinessProfile> {
        let store_name = request.store_name.trim().to_string();
        if store_name.is_empty() {
            return Err(anyhow!("El nombre de la tienda es obligatorio"));
        }

        let profile = BusinessProfile {
            store_name,
            location: request.location,
            display_phone: request.display_phone,
            whatsapp_phone: request.whatsapp_phone,
            order_greeting: request.order_greeting,
            updated_at: Utc::now().to_rfc3339(),
        };

        self.profile_repository.save_profile(&profile).await?;
        info!("Updated business profile");

        Ok(profile)
    }

    // -- Social links -------------------------------------------------------

    pub async fn list_social_links(&self) -> Result<SocialLinksResponse> {
        let links = self.social_link_repository.list_links().await?;

        let available_networks = AVAILABLE_NETWORKS
            .iter()
            .filter(|network| !links.iter().any(|l| l.name == **network))
            .map(|network| network.to_string())
            .collect();

        Ok(SocialLinksResponse {
            links,
            available_networks,
        })
    }

    pub async fn add_social_link(&self, request: CreateSocialLinkRequest) -> Result<SocialLink> {
        let name = request.name.trim().to_string();
        let url = request.url.trim().to_string();

        if !AVAILABLE_NETWORKS.contains(&name.as_str()) {
            return Err(anyhow!("Red social no soportada: {}", name));
        }
        if url.is_empty() {
            return Err(anyhow!("Ingresa la URL del perfil"));
        }

        let existing = self.social_link_repository.list_links().await?;
        if existing.iter().any(|l| l.name == name) {
            return Err(anyhow!("Ya agregaste un enlace para {}", name));
        }

        let link = SocialLink {
            id: Uuid::new_v4().to_string(),
            name,
            url,
            created_at: Utc::now().to_rfc3339(),
        };

        self.social_link_repository.store_link(&link).await?;
        info!("Added social link for {}", link.name);

        Ok(link)
    }

    pub async fn update_social_link(
        &self,
        link_id: &str,
        request: UpdateSocialLinkRequest,
    ) -> Result<SocialLink> {
        let url = request.url.trim().to_string();
        if url.is_empty() {
            return Err(anyhow!("Ingresa la URL del perfil"));
        }

        let links = self.social_link_repository.list_links().await?;
        let mut link = links
            .into_iter()
            .find(|l| l.id == link_id)
            .ok_or_else(|| anyhow!("Enlace no encontrado: {}", link_id))?;

        link.url = url;
        self.social_link_repository.update_link(&link).await?;

        Ok(link)
    }

    pub async fn delete_social_link(&self, link_id: &str) -> Result<()> {
        if !self.social_link_repository.delete_link(link_id).await? {
            return Err(anyhow!("Enlace no encontrado: {}", link_id));
        }
        info!("Deleted social link {}", link_id);
        Ok(())
    }

    // -- Contact messages ---------------------------------------------------

    /// Compose the contact-page WhatsApp message. All three fields are
    /// required; the business WhatsApp number must be configured.
    pub async fn compose_contact_message(
        &self,
        request: ContactMessageRequest,
    ) -> Result<ContactMessageResponse> {
        let name = request.name.trim();
        let phone = request.phone.trim();
        let message = request.message.trim();

        if name.is_empty() || phone.is_empty() || message.is_empty() {
            return Err(anyhow!("Por favor completa todos los campos"));
        }

        let profile = self.get_profile().await?;
        let business_phone = profile.as_ref().and_then(|p| p.whatsapp_phone.as_deref());

        let composed = self
            .message_service
            .compose_contact(name, phone, message, business_phone)?;

        Ok(ContactMessageResponse {
            whatsapp_url: composed.whatsapp_url,
            notification: "Te llevamos a WhatsApp para enviar tu mensaje".to_string(),
        })
    }
}

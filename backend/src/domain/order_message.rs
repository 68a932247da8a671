//! Order and contact message composition.
//!
//! Turns cart contents plus the validated checkout form into the plain-text
//! WhatsApp message and its pre-filled compose link. Everything here is
//! pure input-to-output; opening the link is the caller's job.

use log::info;
use thiserror::Error;
use url::Url;

use shared::{CartLine, DeliveryType};

/// Failures while composing a message or its deep link.
#[derive(Debug, Error, PartialEq)]
pub enum OrderMessageError {
    /// The business WhatsApp number is missing or too short to be dialable.
    #[error("El número de contacto no está configurado")]
    PhoneNotConfigured,
    #[error("No se pudo generar el enlace de WhatsApp")]
    LinkBuild,
}

/// The validated order details the serializer renders.
#[derive(Debug, Clone)]
pub struct OrderDetails {
    pub customer_name: String,
    pub delivery_type: DeliveryType,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time_slot: String,
    /// Only rendered for delivery orders
    pub district: String,
    /// Only rendered for delivery orders
    pub address: String,
    /// Only rendered for delivery orders
    pub phone: String,
    pub dedication: String,
    pub observation: String,
}

/// Configuration for message rendering and link building.
#[derive(Debug, Clone)]
pub struct OrderMessageConfig {
    /// Currency prefix for rendered amounts
    pub currency_prefix: String,
    /// Country calling code prepended to bare 9-digit numbers
    pub country_code: String,
    /// Deep link host, e.g. `https://wa.me`
    pub link_base: String,
    /// Greeting used when the business has not configured one
    pub default_greeting: String,
    /// Placeholder when no dedication card was requested
    pub no_dedication: String,
    /// Placeholder when no observation was left
    pub no_observation: String,
}

impl Default for OrderMessageConfig {
    fn default() -> Self {
        Self {
            currency_prefix: "S/. ".to_string(),
            country_code: "51".to_string(),
            link_base: "https://wa.me".to_string(),
            default_greeting: "¡Hola! Quisiera hacer el siguiente pedido:".to_string(),
            no_dedication: "Sin tarjeta".to_string(),
            no_observation: "Ninguna".to_string(),
        }
    }
}

/// A composed message ready to hand to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedMessage {
    /// Digits-only destination number
    pub destination_phone: String,
    /// The plain-text message body
    pub message: String,
    /// `https://wa.me/<phone>?text=<encoded message>`
    pub whatsapp_url: String,
}

/// Message composition service.
#[derive(Clone)]
pub struct OrderMessageService {
    config: OrderMessageConfig,
}

impl OrderMessageService {
    pub fn new() -> Self {
        Self {
            config: OrderMessageConfig::default(),
        }
    }

    pub fn with_config(config: OrderMessageConfig) -> Self {
        Self { config }
    }

    /// Normalize the stored business number into deep-link digits.
    ///
    /// Non-digits are stripped; a bare 9-digit local number gets the
    /// country code prepended; anything still shorter than 9 digits is a
    /// configuration error rather than a malformed link.
    pub fn normalize_business_phone(&self, raw: &str) -> Result<String, OrderMessageError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

        let digits = if digits.len() == 9 {
            format!("{}{}", self.config.country_code, digits)
        } else {
            digits
        };

        if digits.len() < 9 {
            return Err(OrderMessageError::PhoneNotConfigured);
        }

        Ok(digits)
    }

    /// Format an amount with the store currency, fixed two decimals.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.config.currency_prefix, amount)
    }

    /// Render the full order message. Block order is fixed: greeting,
    /// one block per line item, delivery data, total, dedication,
    /// observation. Address, district, and contact phone appear only for
    /// delivery orders.
    pub fn render_order_message(
        &self,
        lines: &[CartLine],
        details: &OrderDetails,
        greeting: Option<&str>,
    ) -> String {
        let greeting = match greeting {
            Some(g) if !g.trim().is_empty() => g.trim(),
            _ => &self.config.default_greeting,
        };

        let mut out = format!("*{}*\n", greeting);

        for line in lines {
            out.push_str(&format!("\n*{}*\n", line.name));
            out.push_str(&format!("Cantidad: x{}\n", line.quantity));
            out.push_str(&format!("Subtotal: {}\n", self.format_amount(line.subtotal())));
        }

        out.push_str("\n*Datos de entrega:*\n");
        out.push_str(&format!("Nombre: {}\n", details.customer_name));
        out.push_str(&format!("Entrega: {}\n", delivery_label(details.delivery_type)));
        out.push_str(&format!("Fecha: {}\n", details.date));
        if !details.time_slot.is_empty() {
            out.push_str(&format!("Horario: {}\n", details.time_slot));
        }
        if details.delivery_type == DeliveryType::Delivery {
            out.push_str(&format!("Distrito: {}\n", details.district));
            out.push_str(&format!("Dirección: {}\n", details.address));
            out.push_str(&format!("Celular: {}\n", details.phone));
        }

        let total: f64 = lines.iter().map(CartLine::subtotal).sum();
        out.push_str(&format!("\n*Total: {}*\n", self.format_amount(total)));

        let dedication = non_blank_or(&details.dedication, &self.config.no_dedication);
        let observation = non_blank_or(&details.observation, &self.config.no_observation);
        out.push_str(&format!("\nDedicatoria: {}\n", dedication));
        out.push_str(&format!("Observación: {}\n", observation));

        out
    }

    /// Build the pre-filled compose link for a destination and message.
    pub fn deep_link(&self, phone_digits: &str, message: &str) -> Result<String, OrderMessageError> {
        let base = format!("{}/{}", self.config.link_base, phone_digits);
        let mut url = Url::parse(&base).map_err(|_| OrderMessageError::LinkBuild)?;
        url.query_pairs_mut().append_pair("text", message);
        Ok(url.to_string())
    }

    /// Compose a full order: normalize the destination, render the message,
    /// build the link.
    pub fn compose_order(
        &self,
        lines: &[CartLine],
        details: &OrderDetails,
        business_phone: Option<&str>,
        greeting: Option<&str>,
    ) -> Result<ComposedMessage, OrderMessageError> {
        let raw_phone = business_phone.ok_or(OrderMessageError::PhoneNotConfigured)?;
        let destination_phone = self.normalize_business_phone(raw_phone)?;
        let message = self.render_order_message(lines, details, greeting);
        let whatsapp_url = self.deep_link(&destination_phone, &message)?;

        info!("Composed order message for {} line(s)", lines.len());

        Ok(ComposedMessage {
            destination_phone,
            message,
            whatsapp_url,
        })
    }

    /// Compose a contact-page message.
    pub fn compose_contact(
        &self,
        name: &str,
        phone: &str,
        message: &str,
        business_phone: Option<&str>,
    ) -> Result<ComposedMessage, OrderMessageError> {
        let raw_phone = business_phone.ok_or(OrderMessageError::PhoneNotConfigured)?;
        let destination_phone = self.normalize_business_phone(raw_phone)?;

        let body = format!(
            "*Hola, vengo de la web y quisiera contactarme:*\n\n*Nombre:* {}\n*Celular:* {}\n*Mensaje:* {}",
            name, phone, message
        );
        let whatsapp_url = self.deep_link(&destination_phone, &body)?;

        Ok(ComposedMessage {
            destination_phone,
            message: body,
            whatsapp_url,
        })
    }
}

impl Default for OrderMessageService {
    fn default() -> Self {
        Self::new()
    }
}

fn delivery_label(delivery_type: DeliveryType) -> &'static str {
    match delivery_type {
        DeliveryType::Delivery => "Delivery a domicilio",
        DeliveryType::Pickup => "Recojo en tienda",
    }
}

fn non_blank_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rosa_line() -> CartLine {
        CartLine {
            product_id: "p1".to_string(),
            name: "Rosa Roja".to_string(),
            unit_price: 45.0,
            image_url: None,
            category_label: Some("Rosas".to_string()),
            quantity: 2,
        }
    }

    fn pickup_details(name: &str) -> OrderDetails {
        OrderDetails {
            customer_name: name.to_string(),
            delivery_type: DeliveryType::Pickup,
            date: "2025-06-01".to_string(),
            time_slot: "09:00 - 11:00".to_string(),
            district: "Chiclayo".to_string(),
            address: "Av. Balta 123".to_string(),
            phone: "912345678".to_string(),
            dedication: String::new(),
            observation: String::new(),
        }
    }

    #[test]
    fn nine_digit_phone_gets_country_code() {
        let service = OrderMessageService::new();
        let phone = service.normalize_business_phone("987654321").unwrap();
        assert_eq!(phone, "51987654321");
        assert_eq!(phone.len(), 11);
    }

    #[test]
    fn formatted_phone_is_stripped_to_digits() {
        let service = OrderMessageService::new();
        let phone = service.normalize_business_phone("+51 987 654 321").unwrap();
        assert_eq!(phone, "51987654321");
    }

    #[test]
    fn short_phone_is_a_configuration_error() {
        let service = OrderMessageService::new();
        assert_eq!(
            service.normalize_business_phone("12345"),
            Err(OrderMessageError::PhoneNotConfigured)
        );
        assert_eq!(
            service.normalize_business_phone(""),
            Err(OrderMessageError::PhoneNotConfigured)
        );
    }

    #[test]
    fn missing_phone_is_a_configuration_error() {
        let service = OrderMessageService::new();
        let result = service.compose_order(&[rosa_line()], &pickup_details("Ana"), None, None);
        assert_eq!(result, Err(OrderMessageError::PhoneNotConfigured));
    }

    #[test]
    fn pickup_message_omits_address_and_district() {
        let service = OrderMessageService::new();
        let message =
            service.render_order_message(&[rosa_line()], &pickup_details("Ana"), None);

        assert!(message.contains("Rosa Roja"));
        assert!(message.contains("x2"));
        assert!(message.contains("90.00"));
        assert!(message.contains("Recojo en tienda"));
        assert!(!message.contains("Dirección"));
        assert!(!message.contains("Distrito"));
        assert!(!message.contains("Av. Balta"));
    }

    #[test]
    fn delivery_message_includes_address_district_and_phone() {
        let service = OrderMessageService::new();
        let mut details = pickup_details("Ana");
        details.delivery_type = DeliveryType::Delivery;

        let message = service.render_order_message(&[rosa_line()], &details, None);

        assert!(message.contains("Distrito: Chiclayo"));
        assert!(message.contains("Dirección: Av. Balta 123"));
        assert!(message.contains("Celular: 912345678"));
        assert!(message.contains("Delivery a domicilio"));
    }

    #[test]
    fn blank_dedication_and_observation_use_placeholders() {
        let service = OrderMessageService::new();
        let message =
            service.render_order_message(&[rosa_line()], &pickup_details("Ana"), None);

        assert!(message.contains("Dedicatoria: Sin tarjeta"));
        assert!(message.contains("Observación: Ninguna"));
    }

    #[test]
    fn filled_dedication_is_rendered_verbatim() {
        let service = OrderMessageService::new();
        let mut details = pickup_details("Ana");
        details.dedication = "Feliz cumpleaños".to_string();

        let message = service.render_order_message(&[rosa_line()], &details, None);

        assert!(message.contains("Dedicatoria: Feliz cumpleaños"));
    }

    #[test]
    fn total_sums_all_line_subtotals() {
        let service = OrderMessageService::new();
        let girasol = CartLine {
            product_id: "p2".to_string(),
            name: "Girasol".to_string(),
            unit_price: 20.0,
            image_url: None,
            category_label: None,
            quantity: 3,
        };

        let message = service.render_order_message(
            &[rosa_line(), girasol],
            &pickup_details("Ana"),
            None,
        );

        assert!(message.contains("*Total: S/. 150.00*"));
    }

    #[test]
    fn custom_greeting_replaces_default() {
        let service = OrderMessageService::new();
        let message = service.render_order_message(
            &[rosa_line()],
            &pickup_details("Ana"),
            Some("Hola, me gustaría hacer un pedido..."),
        );

        assert!(message.starts_with("*Hola, me gustaría hacer un pedido...*"));
    }

    #[test]
    fn deep_link_embeds_phone_and_encodes_message() {
        let service = OrderMessageService::new();
        let url = service.deep_link("51987654321", "hola *mundo*").unwrap();

        assert!(url.starts_with("https://wa.me/51987654321?text="));
        assert!(!url.contains(' '));
        assert!(url.contains("hola"));
    }

    #[test]
    fn compose_order_produces_full_result() {
        let service = OrderMessageService::new();
        let composed = service
            .compose_order(
                &[rosa_line()],
                &pickup_details("Ana"),
                Some("987654321"),
                None,
            )
            .unwrap();

        assert_eq!(composed.destination_phone, "51987654321");
        assert!(composed.whatsapp_url.starts_with("https://wa.me/51987654321?text="));
        assert!(composed.message.contains("Rosa Roja"));
        assert!(composed.message.contains("*Total: S/. 90.00*"));
    }

    #[test]
    fn contact_message_follows_template() {
        let service = OrderMessageService::new();
        let composed = service
            .compose_contact("Ana", "912345678", "¿Tienen orquídeas?", Some("987654321"))
            .unwrap();

        assert!(composed.message.contains("*Nombre:* Ana"));
        assert!(composed.message.contains("*Celular:* 912345678"));
        assert!(composed.message.contains("*Mensaje:* ¿Tienen orquídeas?"));
        assert!(composed.whatsapp_url.starts_with("https://wa.me/51987654321?text="));
    }
}

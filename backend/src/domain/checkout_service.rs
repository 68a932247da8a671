//! Checkout domain logic: the cart → checkout → submitted flow.
//!
//! The service owns the in-memory checkout session (which panel view is
//! open, the form as typed, the field errors from the last submit attempt)
//! and enforces the validation rules. Submitting a valid form hands the
//! cart and form to the order message serializer, clears the cart, and
//! resets the session.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use log::info;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::domain::business_service::BusinessService;
use crate::domain::cart_service::CartService;
use crate::domain::order_message::{OrderDetails, OrderMessageError, OrderMessageService};
use shared::{
    CheckoutField, CheckoutFieldError, CheckoutFormState, CheckoutSessionState,
    CheckoutSubmitResponse, CheckoutValidationError, CheckoutView, DeliveryType, TimeSlot,
    TimeSlotsResponse, UpdateCheckoutFieldRequest,
};

/// Date format used by the checkout form.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Failures the checkout flow can surface to the user.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Tu carrito está vacío")]
    EmptyCart,
    /// One aggregate notification; the field-level messages are stored on
    /// the session for the UI to render next to each input.
    #[error("Por favor completa los campos marcados")]
    Validation(Vec<CheckoutFieldError>),
    #[error(transparent)]
    Message(#[from] OrderMessageError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Districts, time slots, and phone rules for the checkout form.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Districts delivery is offered in
    pub districts: Vec<String>,
    /// Districts that only receive afternoon deliveries
    pub restricted_districts: Vec<String>,
    /// First hour offered to restricted districts
    pub restricted_start_hour: u32,
    pub time_slots: Vec<TimeSlot>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        let slot = |label: &str, start_hour: u32| TimeSlot {
            label: label.to_string(),
            start_hour,
        };

        Self {
            districts: vec![
                "Chiclayo".to_string(),
                "José Leonardo Ortiz".to_string(),
                "La Victoria".to_string(),
                "Pimentel".to_string(),
                "Lambayeque".to_string(),
                "Monsefú".to_string(),
                "Reque".to_string(),
            ],
            restricted_districts: vec![
                "Chiclayo".to_string(),
                "José Leonardo Ortiz".to_string(),
                "La Victoria".to_string(),
            ],
            restricted_start_hour: 13,
            time_slots: vec![
                slot("09:00 - 11:00", 9),
                slot("11:00 - 13:00", 11),
                slot("13:00 - 15:00", 13),
                slot("15:00 - 17:00", 15),
                slot("17:00 - 19:00", 17),
            ],
        }
    }
}

/// Checkout service holding the session state for the open panel.
#[derive(Clone)]
pub struct CheckoutService {
    config: CheckoutConfig,
    session: Arc<Mutex<CheckoutSessionState>>,
    cart_service: CartService,
    business_service: BusinessService,
    message_service: OrderMessageService,
}

impl CheckoutService {
    pub fn new(cart_service: CartService, business_service: BusinessService) -> Self {
        Self::with_config(CheckoutConfig::default(), cart_service, business_service)
    }

    pub fn with_config(
        config: CheckoutConfig,
        cart_service: CartService,
        business_service: BusinessService,
    ) -> Self {
        Self {
            config,
            session: Arc::new(Mutex::new(CheckoutSessionState::default())),
            cart_service,
            business_service,
            message_service: OrderMessageService::new(),
        }
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Current session as the UI renders it.
    pub fn session_state(&self) -> CheckoutSessionState {
        self.session.lock().unwrap().clone()
    }

    /// Move from the cart view into the checkout form. Requires at least
    /// one line item; the form always starts blank.
    pub fn open_checkout(&self) -> Result<CheckoutSessionState, CheckoutError> {
        if self.cart_service.snapshot().lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut session = self.session.lock().unwrap();
        session.view = CheckoutView::Checkout;
        session.form = CheckoutFormState::default();
        session.errors.clear();

        Ok(session.clone())
    }

    /// Close the panel: back to the cart view, form discarded, errors
    /// cleared. Cart line items are untouched.
    pub fn close_panel(&self) -> CheckoutSessionState {
        let mut session = self.session.lock().unwrap();
        *session = CheckoutSessionState::default();
        session.clone()
    }

    /// Edit one field. The field's previous validation error is cleared;
    /// everything is re-evaluated only on the next submit attempt.
    pub fn update_field(&self, request: UpdateCheckoutFieldRequest) -> CheckoutSessionState {
        let mut session = self.session.lock().unwrap();

        match request.field {
            CheckoutField::Name => session.form.name = request.value,
            CheckoutField::DeliveryType => {
                session.form.delivery_type = match request.value.as_str() {
                    "delivery" => Some(DeliveryType::Delivery),
                    "pickup" => Some(DeliveryType::Pickup),
                    _ => None,
                }
            }
            CheckoutField::Date => session.form.date = request.value,
            CheckoutField::TimeSlot => session.form.time_slot = request.value,
            CheckoutField::District => session.form.district = request.value,
            CheckoutField::Address => session.form.address = request.value,
            CheckoutField::Phone => {
                session.form.phone = Self::normalize_phone_input(&request.value)
            }
            CheckoutField::Dedication => session.form.dedication = request.value,
            CheckoutField::Observation => session.form.observation = request.value,
        }

        session.errors.retain(|e| e.field != request.field);
        session.clone()
    }

    /// Normalize customer phone input as typed: keep digits only, drop
    /// leading digits until a '9' arrives, cap at 9 digits.
    pub fn normalize_phone_input(raw: &str) -> String {
        let mut out = String::new();

        for c in raw.chars() {
            if !c.is_ascii_digit() {
                continue;
            }
            if out.is_empty() && c != '9' {
                continue;
            }
            out.push(c);
            if out.len() == 9 {
                break;
            }
        }

        out
    }

    /// Slots currently offered for a district and date, with a notice when
    /// filtering leaves nothing.
    pub fn available_time_slots(
        &self,
        district: Option<&str>,
        date: Option<&str>,
    ) -> TimeSlotsResponse {
        let date = date.and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok());
        let slots = self.filter_time_slots(district, date, Local::now().naive_local());

        let notice = slots.is_empty().then(|| {
            "No hay horarios disponibles para la fecha y el distrito seleccionados".to_string()
        });

        TimeSlotsResponse { slots, notice }
    }

    /// Two independent rules, both must pass: restricted districts only get
    /// slots from `restricted_start_hour` on, and same-day orders only get
    /// slots starting after the current hour.
    fn filter_time_slots(
        &self,
        district: Option<&str>,
        date: Option<NaiveDate>,
        now: NaiveDateTime,
    ) -> Vec<TimeSlot> {
        self.config
            .time_slots
            .iter()
            .filter(|slot| {
                if let Some(district) = district {
                    let restricted = self
                        .config
                        .restricted_districts
                        .iter()
                        .any(|r| r == district);
                    if restricted && slot.start_hour < self.config.restricted_start_hour {
                        return false;
                    }
                }
                if date == Some(now.date()) && slot.start_hour <= now.hour() {
                    return false;
                }
                true
            })
            .cloned()
            .collect()
    }

    /// Run every validation rule over the form.
    fn validation_errors(
        &self,
        form: &CheckoutFormState,
        now: NaiveDateTime,
    ) -> Vec<CheckoutValidationError> {
        let mut errors = Vec::new();

        if form.name.trim().is_empty() {
            errors.push(CheckoutValidationError::EmptyName);
        }

        if form.delivery_type.is_none() {
            errors.push(CheckoutValidationError::MissingDeliveryType);
        }

        let parsed_date = if form.date.trim().is_empty() {
            errors.push(CheckoutValidationError::MissingDate);
            None
        } else {
            match NaiveDate::parse_from_str(form.date.trim(), DATE_FORMAT) {
                Ok(date) if date < now.date() => {
                    errors.push(CheckoutValidationError::DateInPast);
                    Some(date)
                }
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(CheckoutValidationError::InvalidDate);
                    None
                }
            }
        };

        let district_for_slots = match form.delivery_type {
            Some(DeliveryType::Delivery) if !form.district.trim().is_empty() => {
                Some(form.district.trim())
            }
            _ => None,
        };

        if form.time_slot.trim().is_empty() {
            errors.push(CheckoutValidationError::MissingTimeSlot);
        } else {
            let offered = self.filter_time_slots(district_for_slots, parsed_date, now);
            if !offered.iter().any(|s| s.label == form.time_slot.trim()) {
                errors.push(CheckoutValidationError::SlotUnavailable);
            }
        }

        if form.delivery_type == Some(DeliveryType::Delivery) {
            let district = form.district.trim();
            if district.is_empty() {
                errors.push(CheckoutValidationError::MissingDistrict);
            } else if !self.config.districts.iter().any(|d| d == district) {
                errors.push(CheckoutValidationError::UnknownDistrict);
            }

            if form.address.trim().is_empty() {
                errors.push(CheckoutValidationError::EmptyAddress);
            }

            let phone = form.phone.trim();
            if phone.is_empty() {
                errors.push(CheckoutValidationError::MissingPhone);
            } else if !Self::is_valid_customer_phone(phone) {
                errors.push(CheckoutValidationError::InvalidPhone);
            }
        }

        errors
    }

    /// Exactly 9 digits starting with '9'.
    fn is_valid_customer_phone(phone: &str) -> bool {
        phone.len() == 9
            && phone.starts_with('9')
            && phone.chars().all(|c| c.is_ascii_digit())
    }

    /// User-facing message and target field for a validation error.
    pub fn error_message(error: &CheckoutValidationError) -> CheckoutFieldError {
        let (field, message) = match error {
            CheckoutValidationError::EmptyName => (CheckoutField::Name, "Ingresa tu nombre"),
            CheckoutValidationError::MissingDeliveryType => (
                CheckoutField::DeliveryType,
                "Selecciona cómo quieres recibir tu pedido",
            ),
            CheckoutValidationError::MissingDate => {
                (CheckoutField::Date, "Selecciona la fecha de entrega")
            }
            CheckoutValidationError::InvalidDate => (CheckoutField::Date, "La fecha no es válida"),
            CheckoutValidationError::DateInPast => (
                CheckoutField::Date,
                "La fecha no puede ser anterior a hoy",
            ),
            CheckoutValidationError::MissingTimeSlot => {
                (CheckoutField::TimeSlot, "Selecciona un horario")
            }
            CheckoutValidationError::SlotUnavailable => (
                CheckoutField::TimeSlot,
                "El horario elegido ya no está disponible",
            ),
            CheckoutValidationError::MissingDistrict => {
                (CheckoutField::District, "Selecciona tu distrito")
            }
            CheckoutValidationError::UnknownDistrict => (
                CheckoutField::District,
                "No hacemos entregas en ese distrito",
            ),
            CheckoutValidationError::EmptyAddress => {
                (CheckoutField::Address, "Ingresa la dirección de entrega")
            }
            CheckoutValidationError::MissingPhone => {
                (CheckoutField::Phone, "Ingresa tu número de celular")
            }
            CheckoutValidationError::InvalidPhone => (
                CheckoutField::Phone,
                "El celular debe tener 9 dígitos y empezar con 9",
            ),
        };

        CheckoutFieldError {
            field,
            message: message.to_string(),
        }
    }

    /// Attempt to submit the order.
    ///
    /// On validation failure the session stays in the checkout view with
    /// field errors recorded. On success the order message is composed,
    /// the cart is cleared silently, and the session resets; the response
    /// carries the deep link for the caller to open.
    pub async fn submit(&self) -> Result<CheckoutSubmitResponse, CheckoutError> {
        let cart = self.cart_service.snapshot();
        if cart.lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let form = self.session.lock().unwrap().form.clone();
        let now = Local::now().naive_local();

        let errors = self.validation_errors(&form, now);
        if !errors.is_empty() {
            let field_errors: Vec<CheckoutFieldError> =
                errors.iter().map(Self::error_message).collect();
            let mut session = self.session.lock().unwrap();
            session.errors = field_errors.clone();
            return Err(CheckoutError::Validation(field_errors));
        }

        let profile = self.business_service.get_profile().await?;
        let (business_phone, greeting) = match profile {
            Some(p) => (p.whatsapp_phone, p.order_greeting),
            None => (None, None),
        };

        // Validation guarantees the delivery type is set.
        let details = OrderDetails {
            customer_name: form.name.trim().to_string(),
            delivery_type: form.delivery_type.unwrap(),
            date: form.date.trim().to_string(),
            time_slot: form.time_slot.trim().to_string(),
            district: form.district.trim().to_string(),
            address: form.address.trim().to_string(),
            phone: form.phone.trim().to_string(),
            dedication: form.dedication,
            observation: form.observation,
        };

        let composed = self.message_service.compose_order(
            &cart.lines,
            &details,
            business_phone.as_deref(),
            greeting.as_deref(),
        )?;

        let cleared = self.cart_service.clear(false).await?;
        *self.session.lock().unwrap() = CheckoutSessionState::default();

        info!(
            "Order submitted: {} line(s), destination {}",
            cart.lines.len(),
            composed.destination_phone
        );

        Ok(CheckoutSubmitResponse {
            whatsapp_url: composed.whatsapp_url,
            message: composed.message,
            destination_phone: composed.destination_phone,
            notification: "¡Pedido listo! Confírmalo en WhatsApp".to_string(),
            cart: cleared.cart,
        })
    }
}

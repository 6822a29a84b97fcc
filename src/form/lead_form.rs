use crate::model::lead::{LeadLine, LeadSubmission, Selection};
use crate::repository::catalog_repo::CatalogRepository;
use crate::service::pricing_service::{
    compute_total, estimate_shipping, format_price, pallet_count, should_show_total, ShippingEstimate,
};
use crate::util::notifier::{DeliveryHook, DeliveryOutcome, NotificationDispatcher};
use crate::util::sanitize::{
    is_valid_phone, normalize_quantity, parse_quantity, strip_digits, strip_letters, Filtered, DEFAULT_QUANTITY,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub const MSG_FIRST_NAME_REQUIRED: &str = "First name is required";
pub const MSG_LAST_NAME_REQUIRED: &str = "Last name is required";
pub const MSG_PHONE_REQUIRED: &str = "Phone number is required";
pub const MSG_PHONE_INVALID: &str = "Enter a valid phone number";
pub const MSG_PRODUCTS_REQUIRED: &str = "Select at least one product";
pub const MSG_DIGITS_IN_NAME: &str = "Digits are not allowed in names";
pub const MSG_LETTERS_IN_PHONE: &str = "Only digits are allowed in phone numbers";

pub const SUBMIT_LABEL: &str = "Send request";
pub const SUBMITTING_LABEL: &str = "Sending...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Phone,
    Products,
}

pub type FieldErrors = BTreeMap<Field, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Validating,
    Submitting,
    Success,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Cannot {action} while the form is {state:?}")]
    InvalidState { action: &'static str, state: FormState },

    #[error("Unknown product: {0}")]
    UnknownProduct(String),

    #[error("Product is not selected: {0}")]
    NotSelected(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// Validation failed; the form is back in `Editing`.
    Invalid(FieldErrors),
    /// The lead went out (or at least was attempted); the form is in `Success`.
    Sent,
}

/// State of one "request a quote" form session.
pub struct LeadForm {
    catalog: Arc<dyn CatalogRepository>,
    preselected: Option<String>,
    state: FormState,
    first_name: String,
    last_name: String,
    phone: String,
    message: String,
    selections: Vec<Selection>,
    quantity_inputs: HashMap<String, String>,
    errors: FieldErrors,
    attempted: bool,
    delivery_hook: Option<DeliveryHook>,
}

impl LeadForm {
    /// Opens an empty form, or one with a single product selected when opened
    /// from that product's page.
    pub fn open(catalog: Arc<dyn CatalogRepository>, preselected: Option<&str>) -> Self {
        let preselected = match preselected {
            Some(id) if catalog.find_by_id(id).is_some() => Some(id.to_string()),
            Some(id) => {
                warn!(product_id = %id, "Ignoring unknown preselected product");
                None
            }
            None => None,
        };

        let mut form = LeadForm {
            catalog,
            preselected,
            state: FormState::Editing,
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            message: String::new(),
            selections: Vec::new(),
            quantity_inputs: HashMap::new(),
            errors: FieldErrors::new(),
            attempted: false,
            delivery_hook: None,
        };
        form.reset();
        form
    }

    pub fn with_delivery_hook(mut self, hook: DeliveryHook) -> Self {
        self.delivery_hook = Some(hook);
        self
    }

    pub fn set_delivery_hook(&mut self, hook: DeliveryHook) {
        self.delivery_hook = Some(hook);
    }

    fn reset(&mut self) {
        self.first_name.clear();
        self.last_name.clear();
        self.phone.clear();
        self.message.clear();
        self.selections.clear();
        self.quantity_inputs.clear();
        self.errors.clear();
        self.attempted = false;
        if let Some(id) = self.preselected.clone() {
            self.add_selection(id);
        }
    }

    fn transition(&mut self, next: FormState) {
        debug!(from = ?self.state, to = ?next, "Lead form transition");
        self.state = next;
    }

    fn ensure_state(&self, expected: FormState, action: &'static str) -> Result<(), FormError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FormError::InvalidState { action, state: self.state })
        }
    }

    fn add_selection(&mut self, id: String) {
        self.quantity_inputs.insert(id.clone(), DEFAULT_QUANTITY.to_string());
        self.selections.push(Selection::new(id, DEFAULT_QUANTITY));
    }

    fn selection_mut(&mut self, id: &str) -> Result<&mut Selection, FormError> {
        self.selections
            .iter_mut()
            .find(|s| s.product_id == id)
            .ok_or_else(|| FormError::NotSelected(id.to_string()))
    }

    // ---- products ----

    /// Selects the product at quantity 1, or drops its selection. Returns
    /// whether the product is selected afterwards.
    pub fn toggle_product(&mut self, id: &str) -> Result<bool, FormError> {
        self.ensure_state(FormState::Editing, "toggle a product")?;
        if self.catalog.find_by_id(id).is_none() {
            return Err(FormError::UnknownProduct(id.to_string()));
        }

        let selected = if let Some(pos) = self.selections.iter().position(|s| s.product_id == id) {
            self.selections.remove(pos);
            self.quantity_inputs.remove(id);
            false
        } else {
            self.add_selection(id.to_string());
            true
        };

        self.revalidate_products();
        debug!(product_id = %id, selected, total = self.total(), "Product toggled");
        Ok(selected)
    }

    /// Keystroke in a quantity field. Not clamped until blur.
    pub fn change_quantity(&mut self, id: &str, text: &str) -> Result<(), FormError> {
        self.ensure_state(FormState::Editing, "change a quantity")?;
        let parsed = parse_quantity(text);
        let selection = self.selection_mut(id)?;
        if let Some(quantity) = parsed {
            selection.quantity = quantity;
        }
        self.quantity_inputs.insert(id.to_string(), text.to_string());
        Ok(())
    }

    /// Quantity field lost focus: anything unparseable or below the minimum
    /// falls back to 1.
    pub fn blur_quantity(&mut self, id: &str) -> Result<f64, FormError> {
        self.ensure_state(FormState::Editing, "change a quantity")?;
        let text = self.quantity_inputs.get(id).cloned().unwrap_or_default();
        let quantity = normalize_quantity(&text);
        self.selection_mut(id)?.quantity = quantity;
        if parse_quantity(&text) != Some(quantity) {
            self.quantity_inputs.insert(id.to_string(), quantity.to_string());
        }
        Ok(quantity)
    }

    fn normalize_all_quantities(&mut self) {
        for selection in &mut self.selections {
            let text = self.quantity_inputs.entry(selection.product_id.clone()).or_default();
            let quantity = normalize_quantity(text);
            if parse_quantity(text) != Some(quantity) {
                *text = quantity.to_string();
            }
            selection.quantity = quantity;
        }
    }

    // ---- text fields ----

    pub fn set_first_name(&mut self, input: &str) -> Result<(), FormError> {
        self.ensure_state(FormState::Editing, "edit the first name")?;
        let filtered = strip_digits(input);
        self.first_name = filtered.value.clone();
        self.revalidate_name(Field::FirstName, &filtered, MSG_FIRST_NAME_REQUIRED);
        Ok(())
    }

    pub fn set_last_name(&mut self, input: &str) -> Result<(), FormError> {
        self.ensure_state(FormState::Editing, "edit the last name")?;
        let filtered = strip_digits(input);
        self.last_name = filtered.value.clone();
        self.revalidate_name(Field::LastName, &filtered, MSG_LAST_NAME_REQUIRED);
        Ok(())
    }

    pub fn set_phone(&mut self, input: &str) -> Result<(), FormError> {
        self.ensure_state(FormState::Editing, "edit the phone number")?;
        let filtered = strip_letters(input);
        self.phone = filtered.value.clone();

        let pending = if self.attempted { phone_error(&self.phone) } else { None };
        if filtered.stripped {
            self.errors.insert(Field::Phone, MSG_LETTERS_IN_PHONE.to_string());
        } else if let Some(msg) = pending {
            self.errors.insert(Field::Phone, msg.to_string());
        } else {
            self.errors.remove(&Field::Phone);
        }
        Ok(())
    }

    pub fn set_message(&mut self, input: &str) -> Result<(), FormError> {
        self.ensure_state(FormState::Editing, "edit the message")?;
        self.message = input.to_string();
        Ok(())
    }

    fn revalidate_name(&mut self, field: Field, filtered: &Filtered, required: &str) {
        if filtered.stripped {
            self.errors.insert(field, MSG_DIGITS_IN_NAME.to_string());
        } else if self.attempted && filtered.value.trim().is_empty() {
            self.errors.insert(field, required.to_string());
        } else {
            self.errors.remove(&field);
        }
    }

    fn revalidate_products(&mut self) {
        if self.attempted && self.selections.is_empty() {
            self.errors.insert(Field::Products, MSG_PRODUCTS_REQUIRED.to_string());
        } else {
            self.errors.remove(&Field::Products);
        }
    }

    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.first_name.trim().is_empty() {
            errors.insert(Field::FirstName, MSG_FIRST_NAME_REQUIRED.to_string());
        }
        if self.last_name.trim().is_empty() {
            errors.insert(Field::LastName, MSG_LAST_NAME_REQUIRED.to_string());
        }
        if let Some(msg) = phone_error(&self.phone) {
            errors.insert(Field::Phone, msg.to_string());
        }
        if self.selections.is_empty() {
            errors.insert(Field::Products, MSG_PRODUCTS_REQUIRED.to_string());
        }
        errors
    }

    // ---- submission ----

    /// Validates and, when the form is complete, moves to `Submitting` and
    /// returns the lead to send. `None` means the form is back in `Editing`
    /// with its errors set.
    #[instrument(skip(self))]
    pub fn begin_submit(&mut self) -> Result<Option<LeadSubmission>, FormError> {
        self.ensure_state(FormState::Editing, "submit")?;
        self.normalize_all_quantities();
        self.transition(FormState::Validating);
        self.attempted = true;

        let errors = self.validate();
        if !errors.is_empty() {
            let fields: Vec<Field> = errors.keys().copied().collect();
            info!(fields = ?fields, "Lead form has validation errors");
            self.errors = errors;
            self.transition(FormState::Editing);
            return Ok(None);
        }

        self.errors.clear();
        let lead = self.build_submission();
        self.transition(FormState::Submitting);
        Ok(Some(lead))
    }

    /// Records the delivery outcome and shows success whatever it was.
    pub fn complete_submit(&mut self, outcome: &DeliveryOutcome) -> Result<(), FormError> {
        self.ensure_state(FormState::Submitting, "complete a submission")?;
        match outcome {
            DeliveryOutcome::Delivered { status, .. } => info!(status, "Lead delivered"),
            DeliveryOutcome::Rejected { status, body } => {
                warn!(status, body = %body, "Lead was not relayed")
            }
            DeliveryOutcome::Failed { reason } => warn!(reason = %reason, "Lead was not relayed"),
        }
        if let Some(hook) = &self.delivery_hook {
            hook(outcome);
        }
        self.transition(FormState::Success);
        Ok(())
    }

    /// Validate, send once, and land in `Success` regardless of delivery.
    pub async fn submit(&mut self, dispatcher: &dyn NotificationDispatcher) -> Result<SubmitResult, FormError> {
        let lead = match self.begin_submit()? {
            Some(lead) => lead,
            None => return Ok(SubmitResult::Invalid(self.errors.clone())),
        };
        let outcome = dispatcher.dispatch(&lead).await;
        self.complete_submit(&outcome)?;
        Ok(SubmitResult::Sent)
    }

    pub fn start_new_order(&mut self) -> Result<(), FormError> {
        self.ensure_state(FormState::Success, "start a new order")?;
        self.reset();
        self.transition(FormState::Editing);
        Ok(())
    }

    fn build_submission(&self) -> LeadSubmission {
        let lines = self
            .selections
            .iter()
            .filter_map(|s| {
                let product = self.catalog.find_by_id(&s.product_id)?;
                Some(LeadLine {
                    name: product.name.clone(),
                    quantity: s.quantity,
                    unit: product.unit_for(s.quantity).to_string(),
                })
            })
            .collect();

        LeadSubmission {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            lines,
            message: self.message.clone(),
            total_price: self.formatted_total(),
        }
    }

    // ---- view ----

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selections.iter().any(|s| s.product_id == id)
    }

    /// Text currently shown in a product's quantity field.
    pub fn quantity_input(&self, id: &str) -> Option<&str> {
        self.quantity_inputs.get(id).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn total(&self) -> f64 {
        compute_total(&self.selections, self.catalog.as_ref())
    }

    pub fn formatted_total(&self) -> String {
        format_price(self.total())
    }

    pub fn total_visible(&self) -> bool {
        should_show_total(self.total())
    }

    pub fn shipping_estimate(&self) -> Option<ShippingEstimate> {
        estimate_shipping(pallet_count(&self.selections, self.catalog.as_ref()))
    }

    pub fn submit_disabled(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submit_disabled() {
            SUBMITTING_LABEL
        } else {
            SUBMIT_LABEL
        }
    }
}

fn phone_error(phone: &str) -> Option<&'static str> {
    if phone.trim().is_empty() {
        Some(MSG_PHONE_REQUIRED)
    } else if !is_valid_phone(phone) {
        Some(MSG_PHONE_INVALID)
    } else {
        None
    }
}

use serde::{Deserialize, Serialize};

/// One chosen product and its quantity within a single form session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub product_id: String,
    pub quantity: f64,
}

impl Selection {
    pub fn new(product_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A selection expanded for transport.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadLine {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

/// What the form hands to the notification dispatcher on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadSubmission {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub lines: Vec<LeadLine>,
    pub message: String,
    pub total_price: String,
}

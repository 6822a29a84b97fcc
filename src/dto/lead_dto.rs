use crate::model::lead::{LeadLine, LeadSubmission};
use serde::{Deserialize, Serialize};
use std::fmt;

use validator::Validate;

/// Quantity as it travels over the wire. Older form variants sent strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for QuantityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            QuantityValue::Number(n) => write!(f, "{}", n.to_string().replace('.', ",")),
            QuantityValue::Text(s) => write!(f, "{}", s.trim()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LeadProductDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    pub quantity: QuantityValue,

    #[validate(length(max = 50))]
    pub unit: String,
}

/// Body posted to the lead webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LeadPayload {
    #[validate(length(min = 1, max = 100))]
    pub firstname: String,

    #[validate(length(min = 1, max = 100))]
    pub lastname: String,

    #[validate(length(min = 1, max = 40))]
    pub phone: String,

    #[validate(length(min = 1), nested)]
    pub products: Vec<LeadProductDto>,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,

    #[serde(rename = "totalPrice", default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<String>,
}

impl From<&LeadLine> for LeadProductDto {
    fn from(line: &LeadLine) -> Self {
        LeadProductDto {
            name: line.name.clone(),
            quantity: QuantityValue::Number(line.quantity),
            unit: line.unit.clone(),
        }
    }
}

impl From<&LeadSubmission> for LeadPayload {
    fn from(lead: &LeadSubmission) -> Self {
        LeadPayload {
            firstname: lead.first_name.clone(),
            lastname: lead.last_name.clone(),
            phone: lead.phone.clone(),
            products: lead.lines.iter().map(LeadProductDto::from).collect(),
            message: lead.message.clone(),
            total_price: Some(lead.total_price.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

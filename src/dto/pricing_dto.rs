use crate::model::lead::Selection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineDto {
    pub product_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub line_total: f64,
    pub formatted_line_total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDto {
    pub pallets: u32,
    pub label: String,
}

/// Priced view of a set of selections.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuote {
    pub lines: Vec<QuoteLineDto>,
    pub total: f64,
    pub formatted_total: String,
    pub show_total: bool,
    pub shipping: Option<ShippingDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

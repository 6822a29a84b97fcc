use crate::dto::pricing_dto::{OrderQuote, QuoteLineDto, ShippingDto};
use crate::model::lead::Selection;
use crate::model::product::Product;
use crate::repository::catalog_repo::CatalogRepository;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Unit that counts towards the shipping estimate.
pub const PALLET_UNIT: &str = "pall";

pub fn line_total(product: &Product, quantity: f64) -> f64 {
    if !product.has_price() || !quantity.is_finite() || quantity <= 0.0 {
        return 0.0;
    }
    product.price * quantity
}

/// Sum of `price * quantity` over the selections. Unknown products and
/// unpriced ("contact us") products contribute nothing. A sum that overflows
/// to infinity counts as no total at all.
pub fn compute_total(selections: &[Selection], catalog: &dyn CatalogRepository) -> f64 {
    let total = selections.iter().fold(0.0, |total, selection| {
        match catalog.find_by_id(&selection.product_id) {
            Some(product) => total + line_total(product, selection.quantity),
            None => {
                debug!(product_id = %selection.product_id, "Skipping unknown product in total");
                total
            }
        }
    });
    if total.is_finite() {
        total
    } else {
        warn!("Order total overflowed, reporting none");
        0.0
    }
}

pub fn should_show_total(total: f64) -> bool {
    total.is_finite() && total > 0.0
}

/// Swedish display format: `12345.6` -> `"12 345,60 kr"`.
pub fn format_price(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round();
    let cents = if cents.is_finite() { cents } else { 0.0 };
    // every digit of the rounded value, however large
    let digits = format!("{:03.0}", cents);
    let (whole, fraction) = digits.split_at(digits.len() - 2);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0.0 { "-" } else { "" };
    format!("{}{},{} kr", sign, grouped, fraction)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShippingEstimate {
    Cost(f64),
    Free,
}

impl ShippingEstimate {
    pub fn label(&self) -> String {
        match self {
            ShippingEstimate::Cost(cost) => format_price(*cost),
            ShippingEstimate::Free => "Fri frakt".to_string(),
        }
    }
}

/// Shipping tier for a number of pallets. `None` when nothing ships on pallets.
pub fn estimate_shipping(pallets: u32) -> Option<ShippingEstimate> {
    match pallets {
        0 => None,
        1 => Some(ShippingEstimate::Cost(1000.0)),
        2 => Some(ShippingEstimate::Cost(750.0)),
        3 => Some(ShippingEstimate::Cost(500.0)),
        _ => Some(ShippingEstimate::Free),
    }
}

/// Pallets needed for the selections, fractional pallets rounded up.
pub fn pallet_count(selections: &[Selection], catalog: &dyn CatalogRepository) -> u32 {
    let pallets: f64 = selections
        .iter()
        .filter(|s| s.quantity.is_finite() && s.quantity > 0.0)
        .filter(|s| {
            catalog
                .find_by_id(&s.product_id)
                .map(|p| p.unit == PALLET_UNIT)
                .unwrap_or(false)
        })
        .map(|s| s.quantity)
        .sum();
    pallets.ceil() as u32
}

pub struct PricingService {
    catalog: Arc<dyn CatalogRepository>,
}

impl PricingService {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    pub fn total(&self, selections: &[Selection]) -> f64 {
        compute_total(selections, self.catalog.as_ref())
    }

    #[instrument(skip(self, selections), fields(count = selections.len()))]
    pub fn quote(&self, selections: &[Selection]) -> OrderQuote {
        let lines: Vec<QuoteLineDto> = selections
            .iter()
            .filter_map(|s| {
                let product = self.catalog.find_by_id(&s.product_id)?;
                let total = line_total(product, s.quantity);
                Some(QuoteLineDto {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    quantity: s.quantity,
                    unit: product.unit_for(s.quantity).to_string(),
                    line_total: total,
                    formatted_line_total: format_price(total),
                })
            })
            .collect();

        let total = self.total(selections);
        let pallets = pallet_count(selections, self.catalog.as_ref());
        let shipping = estimate_shipping(pallets).map(|estimate| ShippingDto {
            pallets,
            label: estimate.label(),
        });
        debug!(total, pallets, "Quote computed");

        OrderQuote {
            lines,
            total,
            formatted_total: format_price(total),
            show_total: should_show_total(total),
            shipping,
        }
    }
}

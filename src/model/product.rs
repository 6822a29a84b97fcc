use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Varmepellets,
    Stroprodukter,
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "varmepellets" => Ok(Category::Varmepellets),
            "stroprodukter" => Ok(Category::Stroprodukter),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpecs {
    pub shipping: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub category: Category,
    /// Price per `unit` in SEK. Zero means "contact us".
    pub price: f64,
    pub unit: String,
    pub unit_plural: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    pub specs: ProductSpecs,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Unit label matching the given quantity ("1 pall", "3 pallar").
    pub fn unit_for(&self, quantity: f64) -> &str {
        if quantity == 1.0 {
            &self.unit
        } else {
            &self.unit_plural
        }
    }

    pub fn has_price(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

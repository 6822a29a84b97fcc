use crate::model::product::{Category, Product};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info, instrument};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Read-only product catalog. Built once and shared.
pub trait CatalogRepository: Send + Sync {
    fn all(&self) -> &[Product];
    fn find_by_id(&self, id: &str) -> Option<&Product>;
    fn find_by_category(&self, category: Category) -> Vec<&Product>;
}

#[derive(Debug, Clone)]
pub struct InMemoryCatalogRepository {
    products: Vec<Product>,
}

impl InMemoryCatalogRepository {
    /// Build a catalog from products, rejecting duplicate ids and bad prices.
    pub fn from_products(products: Vec<Product>) -> RepositoryResult<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            if product.id.trim().is_empty() {
                return Err(RepositoryError::validation("Product id cannot be empty"));
            }
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(RepositoryError::validation(format!(
                    "Product {} has an invalid price: {}",
                    product.id, product.price
                )));
            }
            if !seen.insert(product.id.as_str()) {
                return Err(RepositoryError::already_exists(format!("Duplicate product id: {}", product.id)));
            }
        }
        Ok(Self { products })
    }

    pub fn from_json_str(json: &str) -> RepositoryResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::from_products(products)
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        info!("Loading catalog from file");
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            error!("Failed to read catalog file: {}", e);
            RepositoryError::from(e)
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!("Loaded {} products", catalog.products.len());
        Ok(catalog)
    }

    /// The catalog bundled with the crate.
    pub fn builtin() -> RepositoryResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }
}

impl CatalogRepository for InMemoryCatalogRepository {
    fn all(&self) -> &[Product] {
        &self.products
    }

    fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn find_by_category(&self, category: Category) -> Vec<&Product> {
        self.products.iter().filter(|p| p.category == category).collect()
    }
}

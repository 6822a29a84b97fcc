use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::dto::pricing_dto::{PricingRequest, ProductQuery};
use crate::model::product::Category;
use crate::repository::catalog_repo::CatalogRepository;
use crate::service::pricing_service::PricingService;
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::sanitize::MAX_QUANTITY;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct CatalogState {
    pub catalog: Arc<dyn CatalogRepository>,
    pub pricing: Arc<PricingService>,
}

// Handler: List products, optionally by category
pub async fn list_products_handler(
    State(state): State<CatalogState>,
    Query(query): Query<ProductQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let products = match query.category.as_deref() {
        Some(raw) => {
            let category: Category = raw.parse().map_err(|e: String| {
                HandlerError::new(HandlerErrorKind::BadRequest, e)
            })?;
            state.catalog.find_by_category(category).into_iter().cloned().collect::<Vec<_>>()
        }
        None => state.catalog.all().to_vec(),
    };
    debug!("[list_products_handler] Returning {} products", products.len());
    Ok(Json(products))
}

// Handler: Get one product
pub async fn get_product_handler(
    State(state): State<CatalogState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let product = state.catalog.find_by_id(&id).cloned().ok_or_else(|| {
        HandlerError::new(HandlerErrorKind::NotFound, format!("Product not found: {}", id))
    })?;
    Ok(Json(product))
}

// Handler: Price a set of selections
pub async fn quote_handler(
    State(state): State<CatalogState>,
    Json(payload): Json<PricingRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[quote_handler] Pricing {} selections", payload.selections.len());
    let out_of_range = |q: f64| !q.is_finite() || q < 0.0 || q > MAX_QUANTITY;
    if let Some(bad) = payload.selections.iter().find(|s| out_of_range(s.quantity)) {
        return Err(HandlerError::new(
            HandlerErrorKind::Validation,
            format!("Invalid quantity for {}", bad.product_id),
        ));
    }
    Ok(Json(state.pricing.quote(&payload.selections)))
}

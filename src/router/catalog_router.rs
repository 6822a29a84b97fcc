use axum::{Router, routing::{get, post}};
use crate::handler::catalog_handler::{
    list_products_handler,
    get_product_handler,
    quote_handler,
    CatalogState,
};
use crate::repository::catalog_repo::CatalogRepository;
use crate::service::pricing_service::PricingService;
use std::sync::Arc;


pub fn catalog_router(catalog: Arc<dyn CatalogRepository>) -> Router {
    let state = CatalogState {
        pricing: Arc::new(PricingService::new(catalog.clone())),
        catalog,
    };

    Router::new()
        .route("/products", get(list_products_handler))
        .route("/products/{id}", get(get_product_handler))
        .route("/pricing/quote", post(quote_handler))
        .with_state(state)
}

pub mod catalog_router;
pub mod lead_router;

pub mod catalog_handler;
pub mod lead_handler;

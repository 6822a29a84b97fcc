pub mod pricing_service;
pub mod lead_relay_service;

pub mod lead_dto;
pub mod pricing_dto;

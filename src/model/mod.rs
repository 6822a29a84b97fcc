pub mod product;
pub mod lead;

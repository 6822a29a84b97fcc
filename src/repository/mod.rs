pub mod repository_error;
pub mod catalog_repo;

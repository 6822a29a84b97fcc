use laxapellets_backend::model::product::Category;
use laxapellets_backend::repository::catalog_repo::{CatalogRepository, InMemoryCatalogRepository};
use laxapellets_backend::repository::repository_error::RepositoryError;

const TWO_PRODUCTS: &str = r#"[
  {"id":"a","name":"A","slug":"a","category":"varmepellets","price":100,
   "unit":"pall","unitPlural":"pallar","specs":{"shipping":"Pall"}},
  {"id":"b","name":"B","slug":"b","category":"stroprodukter","price":0,
   "unit":"ton","unitPlural":"ton","specs":{"shipping":"Bulk","size":"8mm"},"inStock":false}
]"#;

#[test]
fn test_builtin_catalog_loads() {
    let catalog = InMemoryCatalogRepository::builtin().expect("builtin catalog");
    assert!(!catalog.all().is_empty());

    let stropellets = catalog.find_by_id("stropellets").expect("stropellets");
    assert_eq!(stropellets.price, 2198.0);
    assert_eq!(stropellets.unit, "pall");
    assert_eq!(stropellets.unit_plural, "pallar");
}

#[test]
fn test_builtin_catalog_categories() {
    let catalog = InMemoryCatalogRepository::builtin().unwrap();
    let heating = catalog.find_by_category(Category::Varmepellets);
    let bedding = catalog.find_by_category(Category::Stroprodukter);
    assert!(!heating.is_empty());
    assert!(!bedding.is_empty());
    assert_eq!(heating.len() + bedding.len(), catalog.all().len());
}

#[test]
fn test_from_json_defaults() {
    let catalog = InMemoryCatalogRepository::from_json_str(TWO_PRODUCTS).unwrap();
    let a = catalog.find_by_id("a").unwrap();
    assert!(a.in_stock);
    assert_eq!(a.description, "");
    let b = catalog.find_by_id("b").unwrap();
    assert!(!b.in_stock);
    assert!(!b.has_price());
    assert_eq!(b.specs.size.as_deref(), Some("8mm"));
}

#[test]
fn test_unit_for_quantity() {
    let catalog = InMemoryCatalogRepository::from_json_str(TWO_PRODUCTS).unwrap();
    let a = catalog.find_by_id("a").unwrap();
    assert_eq!(a.unit_for(1.0), "pall");
    assert_eq!(a.unit_for(2.0), "pallar");
    assert_eq!(a.unit_for(0.5), "pallar");
}

#[test]
fn test_duplicate_ids_rejected() {
    let json = TWO_PRODUCTS.replace("\"id\":\"b\"", "\"id\":\"a\"");
    let err = InMemoryCatalogRepository::from_json_str(&json).unwrap_err();
    assert!(matches!(err, RepositoryError::AlreadyExists(_)));
}

#[test]
fn test_negative_price_rejected() {
    let json = TWO_PRODUCTS.replace("\"price\":100", "\"price\":-1");
    let err = InMemoryCatalogRepository::from_json_str(&json).unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError(_)));
}

#[test]
fn test_malformed_json_rejected() {
    let err = InMemoryCatalogRepository::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, RepositoryError::SerializationError(_)));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("catalog-{}.json", std::process::id()));
    std::fs::write(&path, TWO_PRODUCTS).unwrap();
    let catalog = InMemoryCatalogRepository::load(&path).unwrap();
    assert_eq!(catalog.all().len(), 2);
    let _ = std::fs::remove_file(&path);

    let missing = InMemoryCatalogRepository::load(&path).unwrap_err();
    assert!(matches!(missing, RepositoryError::IoError(_)));
}

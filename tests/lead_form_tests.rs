use async_trait::async_trait;
use laxapellets_backend::form::lead_form::*;
use laxapellets_backend::model::lead::{LeadSubmission, Selection};
use laxapellets_backend::model::product::{Category, Product, ProductSpecs};
use laxapellets_backend::repository::catalog_repo::{CatalogRepository, InMemoryCatalogRepository};
use laxapellets_backend::util::notifier::{DeliveryOutcome, NotificationDispatcher};
use std::sync::{Arc, Mutex};

/// Records every lead and answers with a fixed outcome.
struct MockDispatcher {
    outcome: DeliveryOutcome,
    sent: Mutex<Vec<LeadSubmission>>,
}

impl MockDispatcher {
    fn answering(outcome: DeliveryOutcome) -> Self {
        Self { outcome, sent: Mutex::new(Vec::new()) }
    }

    fn failing() -> Self {
        Self::answering(DeliveryOutcome::Failed { reason: "connection refused".to_string() })
    }

    fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationDispatcher for MockDispatcher {
    async fn dispatch(&self, lead: &LeadSubmission) -> DeliveryOutcome {
        self.sent.lock().unwrap().push(lead.clone());
        self.outcome.clone()
    }
}

fn product(id: &str, name: &str, price: f64, unit: &str, unit_plural: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        slug: id.to_string(),
        category: Category::Stroprodukter,
        price,
        unit: unit.to_string(),
        unit_plural: unit_plural.to_string(),
        image: String::new(),
        description: String::new(),
        specs: ProductSpecs { shipping: "Pall".to_string(), size: None, weight: None },
        in_stock: true,
    }
}

fn catalog() -> Arc<dyn CatalogRepository> {
    Arc::new(
        InMemoryCatalogRepository::from_products(vec![
            product("stropellets", "Ströpellets", 2198.0, "pall", "pallar"),
            product("laxa-finspan", "Laxå Finspån", 3598.0, "pall", "pallar"),
            product("bulk", "Ströpellets bulk 8mm", 0.0, "ton", "ton"),
        ])
        .unwrap(),
    )
}

fn filled_form(preselected: Option<&str>) -> LeadForm {
    let mut form = LeadForm::open(catalog(), preselected);
    form.set_first_name("Anna").unwrap();
    form.set_last_name("Berg").unwrap();
    form.set_phone("070-123 45 67").unwrap();
    form
}

// ---- opening ----

#[test]
fn test_open_without_context_is_empty() {
    let form = LeadForm::open(catalog(), None);
    assert_eq!(form.state(), FormState::Editing);
    assert!(form.selections().is_empty());
    assert!(form.errors().is_empty());
    assert!(!form.total_visible());
    assert_eq!(form.submit_label(), SUBMIT_LABEL);
}

#[test]
fn test_open_from_product_page_preselects_it() {
    let form = LeadForm::open(catalog(), Some("stropellets"));
    assert_eq!(form.selections(), &[Selection::new("stropellets", 1.0)]);
    assert_eq!(form.quantity_input("stropellets"), Some("1"));
    assert_eq!(form.first_name(), "");
    assert_eq!(form.formatted_total(), "2 198,00 kr");
    assert!(form.total_visible());
}

#[test]
fn test_open_with_unknown_product_selects_nothing() {
    let form = LeadForm::open(catalog(), Some("nope"));
    assert!(form.selections().is_empty());
}

// ---- products and quantities ----

#[test]
fn test_toggle_adds_then_removes_selection() {
    let mut form = LeadForm::open(catalog(), None);
    assert!(form.toggle_product("laxa-finspan").unwrap());
    assert_eq!(form.selections(), &[Selection::new("laxa-finspan", 1.0)]);
    assert_eq!(form.total(), 3598.0);

    assert!(!form.toggle_product("laxa-finspan").unwrap());
    assert!(form.selections().is_empty());
    assert!(form.quantity_input("laxa-finspan").is_none());
    assert_eq!(form.total(), 0.0);
    assert!(!form.total_visible());
}

#[test]
fn test_toggle_unknown_product_is_rejected() {
    let mut form = LeadForm::open(catalog(), None);
    assert_eq!(
        form.toggle_product("ghost"),
        Err(FormError::UnknownProduct("ghost".to_string()))
    );
}

#[test]
fn test_unpriced_product_keeps_total_hidden() {
    let mut form = LeadForm::open(catalog(), None);
    form.toggle_product("bulk").unwrap();
    assert_eq!(form.selections().len(), 1);
    assert!(!form.total_visible());
    assert!(form.shipping_estimate().is_none());
}

#[test]
fn test_change_quantity_is_not_clamped_while_typing() {
    let mut form = LeadForm::open(catalog(), Some("stropellets"));
    form.change_quantity("stropellets", "").unwrap();
    assert_eq!(form.quantity_input("stropellets"), Some(""));
    assert_eq!(form.selections()[0].quantity, 1.0);

    form.change_quantity("stropellets", "0").unwrap();
    assert_eq!(form.selections()[0].quantity, 0.0);
    assert_eq!(form.total(), 0.0);

    form.change_quantity("stropellets", "2.5").unwrap();
    assert_eq!(form.selections()[0].quantity, 2.5);
    assert_eq!(form.formatted_total(), "5 495,00 kr");
}

#[test]
fn test_change_quantity_of_unselected_product_fails() {
    let mut form = LeadForm::open(catalog(), None);
    assert_eq!(
        form.change_quantity("stropellets", "3"),
        Err(FormError::NotSelected("stropellets".to_string()))
    );
}

#[test]
fn test_blur_resets_invalid_quantities_to_one() {
    for typed in ["abc", "0", "0.05", "-2", ""] {
        let mut form = LeadForm::open(catalog(), Some("stropellets"));
        form.change_quantity("stropellets", "3").unwrap();
        form.change_quantity("stropellets", typed).unwrap();
        assert_eq!(form.blur_quantity("stropellets").unwrap(), 1.0, "typed {:?}", typed);
        assert_eq!(form.quantity_input("stropellets"), Some("1"));
        assert_eq!(form.formatted_total(), "2 198,00 kr");
    }
}

#[test]
fn test_huge_quantities_never_show_a_bogus_total() {
    let mut form = LeadForm::open(catalog(), Some("stropellets"));

    form.change_quantity("stropellets", "1e20").unwrap();
    assert!(form.total_visible());
    assert!(form.formatted_total().starts_with("219 800 000 000"));

    form.change_quantity("stropellets", "1e306").unwrap();
    assert!(!form.total_visible());
    assert_eq!(form.total(), 0.0);

    assert_eq!(form.blur_quantity("stropellets").unwrap(), 1.0);
    assert_eq!(form.quantity_input("stropellets"), Some("1"));
    assert_eq!(form.formatted_total(), "2 198,00 kr");
}

#[test]
fn test_blur_caps_quantity_at_maximum() {
    let mut form = LeadForm::open(catalog(), Some("stropellets"));
    form.change_quantity("stropellets", "1000").unwrap();
    assert_eq!(form.blur_quantity("stropellets").unwrap(), 1000.0);

    form.change_quantity("stropellets", "1001").unwrap();
    assert_eq!(form.blur_quantity("stropellets").unwrap(), 1.0);
}

#[test]
fn test_submit_sends_bounded_quantity_and_readable_total() {
    let mut form = filled_form(Some("stropellets"));
    form.change_quantity("stropellets", "1e20").unwrap();
    let lead = form.begin_submit().unwrap().expect("valid form");
    assert_eq!(lead.lines[0].quantity, 1.0);
    assert_eq!(lead.total_price, "2 198,00 kr");
}

#[test]
fn test_blur_keeps_valid_fractional_quantity() {
    let mut form = LeadForm::open(catalog(), Some("stropellets"));
    form.change_quantity("stropellets", "0.1").unwrap();
    assert_eq!(form.blur_quantity("stropellets").unwrap(), 0.1);
    assert_eq!(form.quantity_input("stropellets"), Some("0.1"));
}

#[test]
fn test_shipping_estimate_follows_pallets() {
    let mut form = LeadForm::open(catalog(), Some("stropellets"));
    assert_eq!(form.shipping_estimate().map(|s| s.label()), Some("1 000,00 kr".to_string()));
    form.toggle_product("laxa-finspan").unwrap();
    form.change_quantity("laxa-finspan", "3").unwrap();
    assert_eq!(form.shipping_estimate().map(|s| s.label()), Some("Fri frakt".to_string()));
}

// ---- text fields ----

#[test]
fn test_digits_are_stripped_from_names() {
    let mut form = LeadForm::open(catalog(), None);
    form.set_first_name("An5na").unwrap();
    assert_eq!(form.first_name(), "Anna");
    assert_eq!(form.error(Field::FirstName), Some(MSG_DIGITS_IN_NAME));

    form.set_first_name("Anna").unwrap();
    assert_eq!(form.error(Field::FirstName), None);

    form.set_last_name("B3rg").unwrap();
    assert_eq!(form.last_name(), "Brg");
    assert_eq!(form.error(Field::LastName), Some(MSG_DIGITS_IN_NAME));
}

#[test]
fn test_letters_are_stripped_from_phone() {
    let mut form = LeadForm::open(catalog(), None);
    form.set_phone("070-1a23").unwrap();
    assert_eq!(form.phone(), "070-123");
    assert_eq!(form.error(Field::Phone), Some(MSG_LETTERS_IN_PHONE));

    form.set_phone("070-123").unwrap();
    assert_eq!(form.error(Field::Phone), None);

    form.set_phone("070-12Ö3").unwrap();
    assert_eq!(form.phone(), "070-123");
    assert_eq!(form.error(Field::Phone), Some(MSG_LETTERS_IN_PHONE));
}

#[test]
fn test_required_errors_clear_as_fields_are_filled() {
    let mut form = LeadForm::open(catalog(), None);
    form.begin_submit().unwrap();
    assert_eq!(form.error(Field::FirstName), Some(MSG_FIRST_NAME_REQUIRED));

    form.set_first_name("Anna").unwrap();
    assert_eq!(form.error(Field::FirstName), None);

    form.set_first_name("").unwrap();
    assert_eq!(form.error(Field::FirstName), Some(MSG_FIRST_NAME_REQUIRED));

    form.toggle_product("stropellets").unwrap();
    assert_eq!(form.error(Field::Products), None);
    form.toggle_product("stropellets").unwrap();
    assert_eq!(form.error(Field::Products), Some(MSG_PRODUCTS_REQUIRED));
}

// ---- submission ----

#[tokio::test]
async fn test_submit_without_products_makes_no_call() {
    let dispatcher = MockDispatcher::failing();
    let mut form = filled_form(None);

    let result = form.submit(&dispatcher).await.unwrap();

    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(dispatcher.calls(), 0);
    match result {
        SubmitResult::Invalid(errors) => {
            assert_eq!(errors.get(&Field::Products).map(String::as_str), Some(MSG_PRODUCTS_REQUIRED));
            assert_eq!(errors.len(), 1);
        }
        other => panic!("expected invalid, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_with_empty_form_reports_every_field() {
    let dispatcher = MockDispatcher::failing();
    let mut form = LeadForm::open(catalog(), None);

    form.submit(&dispatcher).await.unwrap();

    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(form.error(Field::FirstName), Some(MSG_FIRST_NAME_REQUIRED));
    assert_eq!(form.error(Field::LastName), Some(MSG_LAST_NAME_REQUIRED));
    assert_eq!(form.error(Field::Phone), Some(MSG_PHONE_REQUIRED));
    assert_eq!(form.error(Field::Products), Some(MSG_PRODUCTS_REQUIRED));
    assert_eq!(dispatcher.calls(), 0);
}

#[tokio::test]
async fn test_submit_rejects_phone_without_digits() {
    let dispatcher = MockDispatcher::failing();
    let mut form = filled_form(Some("stropellets"));
    form.set_phone("---").unwrap();

    form.submit(&dispatcher).await.unwrap();

    assert_eq!(form.error(Field::Phone), Some(MSG_PHONE_INVALID));
    assert_eq!(dispatcher.calls(), 0);
}

#[test]
fn test_begin_submit_moves_to_submitting() {
    let mut form = filled_form(Some("stropellets"));
    let lead = form.begin_submit().unwrap().expect("valid form");

    assert_eq!(form.state(), FormState::Submitting);
    assert!(form.submit_disabled());
    assert_eq!(form.submit_label(), SUBMITTING_LABEL);
    assert_eq!(lead.first_name, "Anna");
    assert_eq!(lead.lines.len(), 1);
    assert_eq!(lead.lines[0].name, "Ströpellets");
    assert_eq!(lead.lines[0].unit, "pall");
    assert_eq!(lead.total_price, "2 198,00 kr");

    // no editing while the request is in flight
    assert!(matches!(
        form.toggle_product("laxa-finspan"),
        Err(FormError::InvalidState { state: FormState::Submitting, .. })
    ));
}

#[test]
fn test_begin_submit_normalizes_pending_quantity() {
    let mut form = filled_form(Some("stropellets"));
    form.change_quantity("stropellets", "abc").unwrap();
    let lead = form.begin_submit().unwrap().expect("valid form");
    assert_eq!(lead.lines[0].quantity, 1.0);
}

#[tokio::test]
async fn test_product_page_scenario_with_failing_relay() {
    let dispatcher = MockDispatcher::failing();
    let mut form = LeadForm::open(catalog(), Some("stropellets"));

    assert_eq!(form.selections(), &[Selection::new("stropellets", 1.0)]);
    assert_eq!(form.formatted_total(), "2 198,00 kr");

    form.change_quantity("stropellets", "3").unwrap();
    assert_eq!(form.formatted_total(), "6 594,00 kr");

    form.set_first_name("Anna").unwrap();
    form.set_last_name("Berg").unwrap();
    form.set_phone("070-123").unwrap();

    let lead = form.begin_submit().unwrap().expect("valid form");
    assert_eq!(form.state(), FormState::Submitting);

    let outcome = dispatcher.dispatch(&lead).await;
    assert!(!outcome.is_delivered());
    form.complete_submit(&outcome).unwrap();
    assert_eq!(form.state(), FormState::Success);

    let sent = dispatcher.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].lines[0].quantity, 3.0);
    assert_eq!(sent[0].lines[0].unit, "pallar");
    assert_eq!(sent[0].total_price, "6 594,00 kr");
}

#[tokio::test]
async fn test_submit_succeeds_for_every_delivery_outcome() {
    let outcomes = vec![
        DeliveryOutcome::Delivered { status: 200, body: serde_json::json!({"success": true}) },
        DeliveryOutcome::Rejected { status: 500, body: "{\"error\":\"boom\"}".to_string() },
        DeliveryOutcome::Failed { reason: "timeout".to_string() },
    ];
    for outcome in outcomes {
        let dispatcher = MockDispatcher::answering(outcome);
        let mut form = filled_form(Some("laxa-finspan"));
        assert_eq!(form.submit(&dispatcher).await.unwrap(), SubmitResult::Sent);
        assert_eq!(form.state(), FormState::Success);
        assert_eq!(dispatcher.calls(), 1);
    }
}

#[tokio::test]
async fn test_delivery_hook_sees_the_outcome() {
    let seen: Arc<Mutex<Vec<DeliveryOutcome>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let dispatcher = MockDispatcher::failing();
    let mut form = filled_form(Some("stropellets"))
        .with_delivery_hook(Arc::new(move |outcome: &DeliveryOutcome| {
            sink.lock().unwrap().push(outcome.clone());
        }));

    form.submit(&dispatcher).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(matches!(seen[0], DeliveryOutcome::Failed { .. }));
}

#[tokio::test]
async fn test_start_new_order_reseeds_preselected_product() {
    let dispatcher = MockDispatcher::failing();
    let mut form = filled_form(Some("stropellets"));
    form.toggle_product("laxa-finspan").unwrap();
    form.set_message("Leverans till gården").unwrap();
    form.submit(&dispatcher).await.unwrap();

    form.start_new_order().unwrap();

    assert_eq!(form.state(), FormState::Editing);
    assert_eq!(form.first_name(), "");
    assert_eq!(form.last_name(), "");
    assert_eq!(form.phone(), "");
    assert_eq!(form.message(), "");
    assert!(form.errors().is_empty());
    assert_eq!(form.selections(), &[Selection::new("stropellets", 1.0)]);
}

#[tokio::test]
async fn test_start_new_order_from_generic_entry_is_empty() {
    let dispatcher = MockDispatcher::failing();
    let mut form = filled_form(None);
    form.toggle_product("stropellets").unwrap();
    form.submit(&dispatcher).await.unwrap();

    form.start_new_order().unwrap();

    assert!(form.selections().is_empty());
    assert!(!form.total_visible());
}

#[test]
fn test_start_new_order_only_from_success() {
    let mut form = LeadForm::open(catalog(), None);
    assert!(matches!(
        form.start_new_order(),
        Err(FormError::InvalidState { state: FormState::Editing, .. })
    ));
}

#[tokio::test]
async fn test_no_editing_after_success() {
    let dispatcher = MockDispatcher::failing();
    let mut form = filled_form(Some("stropellets"));
    form.submit(&dispatcher).await.unwrap();

    assert!(form.set_first_name("Eva").is_err());
    assert!(form.change_quantity("stropellets", "2").is_err());
    assert!(form.begin_submit().is_err());
    assert_eq!(dispatcher.calls(), 1);
}

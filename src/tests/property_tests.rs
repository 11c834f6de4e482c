// Property record behavior outside the lifecycle: creation defaults and the
// boundary between plain updates and lifecycle-managed fields.

use crate::context::SessionContext;
use crate::db::properties;
use crate::domain::property::{GardenOrientation, NewProperty, PropertyState};
use crate::errors::EstateError;
use crate::tests::utils::{init_test_db, listed_property, test_ctx};
use chrono::{Months, NaiveDate, Utc};

#[test]
fn creation_applies_documented_defaults() -> Result<(), EstateError> {
    let db = init_test_db();

    let prop = properties::create(
        &db,
        &SessionContext::new(77),
        NewProperty {
            name: "Defaulted listing".to_string(),
            expected_price: 100_000,
            ..Default::default()
        },
    )?;

    let today = Utc::now().date_naive();
    assert_eq!(
        prop.date_availability,
        today.checked_add_months(Months::new(3)).unwrap()
    );
    assert_eq!(prop.bedrooms, 2);
    assert_eq!(prop.state, PropertyState::New);
    assert!(prop.active);
    assert_eq!(prop.selling_price, 0);
    // Salesperson defaults to the session user.
    assert_eq!(prop.salesperson_id, Some(77));
    Ok(())
}

#[test]
fn explicit_fields_win_over_defaults() -> Result<(), EstateError> {
    let db = init_test_db();
    let availability = NaiveDate::from_ymd_opt(2027, 1, 15).unwrap();

    let prop = properties::create(
        &db,
        &test_ctx(),
        NewProperty {
            name: "Explicit listing".to_string(),
            expected_price: 100_000,
            date_availability: Some(availability),
            bedrooms: Some(4),
            salesperson_id: Some(9),
            garden: true,
            garden_area: 25,
            garden_orientation: Some(GardenOrientation::West),
            ..Default::default()
        },
    )?;

    assert_eq!(prop.date_availability, availability);
    assert_eq!(prop.bedrooms, 4);
    assert_eq!(prop.salesperson_id, Some(9));
    assert_eq!(prop.garden_orientation, Some(GardenOrientation::West));
    assert_eq!(prop.total_area(), 25);
    Ok(())
}

#[test]
fn creation_rejects_a_non_positive_expected_price() {
    let db = init_test_db();

    let result = properties::create(
        &db,
        &test_ctx(),
        NewProperty {
            name: "Free house".to_string(),
            expected_price: 0,
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(EstateError::Validation(_))));
}

#[test]
fn plain_updates_never_touch_lifecycle_fields() -> Result<(), EstateError> {
    let db = init_test_db();
    let prop = listed_property(&db, "Edited listing", 100_000);
    properties::set_selling_price(&db, prop.id, 95_000)?;

    // Simulate an editor sending back a stale record with lifecycle fields
    // altered: only the editable columns may land.
    let mut edited = prop.clone();
    edited.description = Some("South-facing, renovated 2024".to_string());
    edited.living_area = 95;
    edited.selling_price = 1;
    edited.state = PropertyState::Sold;
    edited.buyer_id = Some(12345);
    properties::update(&db, &edited)?;

    let stored = properties::find(&db, prop.id)?;
    assert_eq!(
        stored.description.as_deref(),
        Some("South-facing, renovated 2024")
    );
    assert_eq!(stored.living_area, 95);
    assert_eq!(stored.selling_price, 95_000);
    assert_eq!(stored.state, PropertyState::New);
    assert_eq!(stored.buyer_id, None);
    Ok(())
}

#[test]
fn debug_export_writes_readable_json() -> Result<(), EstateError> {
    let db = init_test_db();
    let prop = listed_property(&db, "Exported listing", 100_000);

    let path = std::env::temp_dir().join("estate_debug_export.json");
    properties::save_properties_debug(&[prop], path.to_str().unwrap())
        .expect("export failed");

    let text = std::fs::read_to_string(&path).expect("read failed");
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("invalid JSON");
    assert_eq!(parsed[0]["name"], "Exported listing");
    assert_eq!(parsed[0]["state"], "new");
    Ok(())
}

#[test]
fn updating_a_missing_property_fails() {
    let db = init_test_db();
    let mut ghost = listed_property(&db, "Ghost base", 100_000);
    ghost.id = 999_999;

    let result = properties::update(&db, &ghost);
    assert!(matches!(result, Err(EstateError::NotFound)));
}

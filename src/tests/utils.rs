use crate::context::SessionContext;
use crate::db::connection::{init_db, Database};
use crate::db::properties;
use crate::domain::property::{NewProperty, Property};

/// Initialize a fresh in-memory test DB using the production schema.
pub fn init_test_db() -> Database {
    let db = Database::new(":memory:");

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn test_ctx() -> SessionContext {
    SessionContext::new(1)
}

/// Creates a minimal listing with the given expected price.
pub fn listed_property(db: &Database, name: &str, expected_price: i64) -> Property {
    properties::create(
        db,
        &test_ctx(),
        NewProperty {
            name: name.to_string(),
            expected_price,
            ..Default::default()
        },
    )
    .expect("property creation failed")
}

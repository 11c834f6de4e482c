// src/domain/property_type.rs

use serde::Serialize;

/// Classification category for properties, ordered by sequence then name.
/// Reverse links (properties of the type, offers across them) are queried
/// from the db layer rather than stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyType {
    pub id: i64,
    pub name: String,
    pub sequence: i64,
}

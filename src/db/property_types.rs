// src/db/property_types.rs

use crate::db::connection::Database;
use crate::db::properties::{map_property, PROPERTY_COLUMNS};
use crate::domain::property::Property;
use crate::domain::property_type::PropertyType;
use crate::errors::EstateError;
use rusqlite::{params, Row};

fn map_type(row: &Row) -> rusqlite::Result<PropertyType> {
    Ok(PropertyType {
        id: row.get("id")?,
        name: row.get("name")?,
        sequence: row.get("sequence")?,
    })
}

pub fn create(db: &Database, name: &str, sequence: Option<i64>) -> Result<PropertyType, EstateError> {
    if name.trim().is_empty() {
        return Err(EstateError::Validation(
            "a property type needs a non-empty name".to_string(),
        ));
    }
    let sequence = sequence.unwrap_or(1);

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO property_types (name, sequence) VALUES (?1, ?2)",
            params![name, sequence],
        )?;
        Ok(PropertyType {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            sequence,
        })
    })
}

/// Types in display order: sequence first, then name.
pub fn list(db: &Database) -> Result<Vec<PropertyType>, EstateError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare("SELECT id, name, sequence FROM property_types ORDER BY sequence, name")?;
        let rows = stmt.query_map([], map_type)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    })
}

/// Derived: number of offers across all properties of the type.
pub fn offer_count(db: &Database, type_id: i64) -> Result<i64, EstateError> {
    db.with_conn(|conn| {
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM offers o
            JOIN properties p ON o.property_id = p.id
            WHERE p.property_type_id = ?1
            "#,
            params![type_id],
            |row| row.get(0),
        )?;
        Ok(count)
    })
}

/// Reverse link: the properties classified under a type.
pub fn properties_of(db: &Database, type_id: i64) -> Result<Vec<Property>, EstateError> {
    db.with_conn(|conn| {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE property_type_id = ?1 ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![type_id], map_property)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    })
}

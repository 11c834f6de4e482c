// src/db/tags.rs

use crate::db::connection::Database;
use crate::db::properties::find_in as find_property_in;
use crate::domain::tag::Tag;
use crate::errors::EstateError;
use rusqlite::{params, Row};

fn map_tag(row: &Row) -> rusqlite::Result<Tag> {
    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
    })
}

/// Creates a tag. Names are unique; a duplicate surfaces as a validation
/// failure from the UNIQUE constraint.
pub fn create(db: &Database, name: &str, color: Option<&str>) -> Result<Tag, EstateError> {
    if name.trim().is_empty() {
        return Err(EstateError::Validation(
            "a tag needs a non-empty name".to_string(),
        ));
    }

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO tags (name, color) VALUES (?1, ?2)",
            params![name, color],
        )?;
        let id = conn.last_insert_rowid();
        Ok(Tag {
            id,
            name: name.to_string(),
            color: color.map(|c| c.to_string()),
        })
    })
}

pub fn list(db: &Database) -> Result<Vec<Tag>, EstateError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare("SELECT id, name, color FROM tags ORDER BY name")?;
        let rows = stmt.query_map([], map_tag)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    })
}

/// Attaches a tag to a property. Attaching twice is a no-op.
pub fn attach(db: &Database, property_id: i64, tag_id: i64) -> Result<(), EstateError> {
    db.with_conn(|conn| {
        find_property_in(conn, property_id)?;
        conn.execute(
            "INSERT OR IGNORE INTO property_tags (property_id, tag_id) VALUES (?1, ?2)",
            params![property_id, tag_id],
        )?;
        Ok(())
    })
}

pub fn detach(db: &Database, property_id: i64, tag_id: i64) -> Result<(), EstateError> {
    db.with_conn(|conn| {
        conn.execute(
            "DELETE FROM property_tags WHERE property_id = ?1 AND tag_id = ?2",
            params![property_id, tag_id],
        )?;
        Ok(())
    })
}

pub fn for_property(db: &Database, property_id: i64) -> Result<Vec<Tag>, EstateError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT t.id, t.name, t.color
            FROM tags t
            JOIN property_tags pt ON pt.tag_id = t.id
            WHERE pt.property_id = ?1
            ORDER BY t.name
            "#,
        )?;
        let rows = stmt.query_map(params![property_id], map_tag)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    })
}

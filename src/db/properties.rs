// src/db/properties.rs

use crate::accounting::SoldListener;
use crate::context::SessionContext;
use crate::db::connection::Database;
use crate::domain::property::{
    validate_expected_price, validate_selling_price, NewProperty, Property, PropertyState,
};
use crate::errors::EstateError;
use chrono::{Months, Utc};
use rusqlite::{params, Connection, Row};
use std::fs::File;
use std::io::BufWriter;

pub(crate) const PROPERTY_COLUMNS: &str = r#"
    id, name, description, postcode, date_availability, expected_price,
    selling_price, bedrooms, living_area, facades, garage, garden,
    garden_area, garden_orientation, active, state, property_type_id,
    salesperson_id, buyer_id
"#;

pub(crate) fn map_property(row: &Row) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        postcode: row.get("postcode")?,
        date_availability: row.get("date_availability")?,
        expected_price: row.get("expected_price")?,
        selling_price: row.get("selling_price")?,
        bedrooms: row.get("bedrooms")?,
        living_area: row.get("living_area")?,
        facades: row.get("facades")?,
        garage: row.get("garage")?,
        garden: row.get("garden")?,
        garden_area: row.get("garden_area")?,
        garden_orientation: row.get("garden_orientation")?,
        active: row.get("active")?,
        state: row.get("state")?,
        property_type_id: row.get("property_type_id")?,
        salesperson_id: row.get("salesperson_id")?,
        buyer_id: row.get("buyer_id")?,
    })
}

/// Loads a property on an existing connection, so lifecycle transactions can
/// reuse it mid-flight.
pub(crate) fn find_in(conn: &Connection, property_id: i64) -> Result<Property, EstateError> {
    let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1");
    let prop = conn.query_row(&sql, params![property_id], map_property)?;
    Ok(prop)
}

/// Creates a property with defaults applied: availability three months from
/// today, two bedrooms, state `new`, and the session user as salesperson when
/// none is given.
pub fn create(
    db: &Database,
    ctx: &SessionContext,
    input: NewProperty,
) -> Result<Property, EstateError> {
    validate_expected_price(input.expected_price)?;

    let today = Utc::now().date_naive();
    let date_availability = input
        .date_availability
        .unwrap_or_else(|| today.checked_add_months(Months::new(3)).unwrap_or(today));
    let bedrooms = input.bedrooms.unwrap_or(2);
    let salesperson_id = input.salesperson_id.unwrap_or(ctx.current_user_id);

    db.with_conn(|conn| {
        conn.execute(
            r#"
            INSERT INTO properties (
                name, description, postcode, date_availability, expected_price,
                bedrooms, living_area, facades, garage, garden, garden_area,
                garden_orientation, property_type_id, salesperson_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                &input.name,
                &input.description,
                &input.postcode,
                date_availability,
                input.expected_price,
                bedrooms,
                input.living_area,
                input.facades,
                input.garage,
                input.garden,
                input.garden_area,
                input.garden_orientation,
                input.property_type_id,
                salesperson_id,
            ],
        )?;
        let id = conn.last_insert_rowid();
        log::info!("property {id} created");
        find_in(conn, id)
    })
}

pub fn find(db: &Database, property_id: i64) -> Result<Property, EstateError> {
    db.with_conn(|conn| find_in(conn, property_id))
}

/// Rewrites the externally editable columns of a property.
///
/// Selling price, buyer, state, and the active flag are lifecycle-managed and
/// deliberately not written here.
pub fn update(db: &Database, prop: &Property) -> Result<(), EstateError> {
    validate_expected_price(prop.expected_price)?;

    db.with_conn(|conn| {
        let changed = conn.execute(
            r#"
            UPDATE properties SET
                name = ?1, description = ?2, postcode = ?3, date_availability = ?4,
                expected_price = ?5, bedrooms = ?6, living_area = ?7, facades = ?8,
                garage = ?9, garden = ?10, garden_area = ?11, garden_orientation = ?12,
                property_type_id = ?13, salesperson_id = ?14
            WHERE id = ?15
            "#,
            params![
                &prop.name,
                &prop.description,
                &prop.postcode,
                prop.date_availability,
                prop.expected_price,
                prop.bedrooms,
                prop.living_area,
                prop.facades,
                prop.garage,
                prop.garden,
                prop.garden_area,
                prop.garden_orientation,
                prop.property_type_id,
                prop.salesperson_id,
                prop.id,
            ],
        )?;
        if changed == 0 {
            return Err(EstateError::NotFound);
        }
        Ok(())
    })
}

/// Writes the selling price, enforcing the 90%-of-expected floor. Rejected
/// writes leave the stored record untouched.
pub fn set_selling_price(db: &Database, property_id: i64, price: i64) -> Result<(), EstateError> {
    db.with_conn(|conn| {
        let prop = find_in(conn, property_id)?;
        validate_selling_price(prop.expected_price, price)?;
        conn.execute(
            "UPDATE properties SET selling_price = ?1 WHERE id = ?2",
            params![price, property_id],
        )?;
        Ok(())
    })
}

/// Soft delete: clears the active flag. Properties are never hard-deleted.
pub fn archive(db: &Database, property_id: i64) -> Result<(), EstateError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE properties SET active = 0 WHERE id = ?1",
            params![property_id],
        )?;
        if changed == 0 {
            return Err(EstateError::NotFound);
        }
        Ok(())
    })
}

pub fn list_active(db: &Database) -> Result<Vec<Property>, EstateError> {
    db.with_conn(|conn| {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE active = 1 ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], map_property)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    })
}

/// Derived: the best (maximum) offer price on a property, 0 when it has no
/// offers.
pub fn best_price(db: &Database, property_id: i64) -> Result<i64, EstateError> {
    db.with_conn(|conn| {
        find_in(conn, property_id)?;
        let best: i64 = conn.query_row(
            "SELECT COALESCE(MAX(price), 0) FROM offers WHERE property_id = ?1",
            params![property_id],
            |row| row.get(0),
        )?;
        Ok(best)
    })
}

/// Marks a property sold and notifies the registered listeners within the
/// same transaction, so the sale and its invoice commit or roll back as one.
///
/// Selling a canceled property is forbidden.
pub fn sell(
    db: &Database,
    property_id: i64,
    listeners: &[&dyn SoldListener],
) -> Result<Property, EstateError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let prop = find_in(&tx, property_id)?;
        if prop.state == PropertyState::Canceled {
            return Err(EstateError::UserAction(
                "a canceled property cannot be sold".to_string(),
            ));
        }

        tx.execute(
            "UPDATE properties SET state = ?1 WHERE id = ?2",
            params![PropertyState::Sold, property_id],
        )?;
        let sold = find_in(&tx, property_id)?;

        for listener in listeners {
            listener.on_property_sold(&tx, &sold)?;
        }

        tx.commit()?;
        log::info!("property {property_id} sold");
        Ok(sold)
    })
}

/// Marks a property canceled. Canceling a sold property is forbidden.
pub fn cancel(db: &Database, property_id: i64) -> Result<Property, EstateError> {
    db.with_conn(|conn| {
        let prop = find_in(conn, property_id)?;
        if prop.state == PropertyState::Sold {
            return Err(EstateError::UserAction(
                "a sold property cannot be canceled".to_string(),
            ));
        }

        conn.execute(
            "UPDATE properties SET state = ?1 WHERE id = ?2",
            params![PropertyState::Canceled, property_id],
        )?;
        log::info!("property {property_id} canceled");
        find_in(conn, property_id)
    })
}

pub fn save_properties_debug(properties: &[Property], filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, properties)?;
    Ok(())
}

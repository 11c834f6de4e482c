// src/db/offers.rs

use crate::db::connection::Database;
use crate::db::properties::find_in as find_property_in;
use crate::domain::offer::{validate_offer_price, NewOffer, Offer, OfferStatus};
use crate::domain::property::PropertyState;
use crate::errors::EstateError;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};

const OFFER_COLUMNS: &str =
    "id, price, status, partner_id, property_id, validity, create_date";

fn map_offer(row: &Row) -> rusqlite::Result<Offer> {
    Ok(Offer {
        id: row.get("id")?,
        price: row.get("price")?,
        status: row.get("status")?,
        partner_id: row.get("partner_id")?,
        property_id: row.get("property_id")?,
        validity: row.get("validity")?,
        create_date: row.get("create_date")?,
    })
}

fn find_in(conn: &Connection, offer_id: i64) -> Result<Offer, EstateError> {
    let sql = format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = ?1");
    let offer = conn.query_row(&sql, params![offer_id], map_offer)?;
    Ok(offer)
}

pub fn find(db: &Database, offer_id: i64) -> Result<Offer, EstateError> {
    db.with_conn(|conn| find_in(conn, offer_id))
}

pub fn for_property(db: &Database, property_id: i64) -> Result<Vec<Offer>, EstateError> {
    db.with_conn(|conn| {
        let sql = format!("SELECT {OFFER_COLUMNS} FROM offers WHERE property_id = ?1 ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![property_id], map_offer)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    })
}

/// Places an offer against an existing property. The first offer on a fresh
/// listing moves it from `new` to `offer_received`.
pub fn create(db: &Database, input: NewOffer) -> Result<Offer, EstateError> {
    validate_offer_price(input.price)?;

    let validity = input.validity.unwrap_or(7);
    let create_date = input
        .create_date
        .unwrap_or_else(|| Utc::now().date_naive());

    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let prop = find_property_in(&tx, input.property_id)?;
        tx.execute(
            r#"
            INSERT INTO offers (price, partner_id, property_id, validity, create_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                input.price,
                input.partner_id,
                input.property_id,
                validity,
                create_date,
            ],
        )?;
        let id = tx.last_insert_rowid();

        if prop.state == PropertyState::New {
            tx.execute(
                "UPDATE properties SET state = ?1 WHERE id = ?2",
                params![PropertyState::OfferReceived, prop.id],
            )?;
        }

        let offer = find_in(&tx, id)?;
        tx.commit()?;
        log::info!("offer {id} placed on property {}", input.property_id);
        Ok(offer)
    })
}

/// Accepts an offer: the offer becomes `accepted`, the property takes the
/// offer's price and bidder as selling price and buyer, moves to
/// `offer_accepted`, and every other offer on the property is refused. At
/// most one offer per property is accepted at any time; the whole step is one
/// transaction.
pub fn accept(db: &Database, offer_id: i64) -> Result<(), EstateError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let offer = find_in(&tx, offer_id)?;
        let prop = find_property_in(&tx, offer.property_id)?;

        match prop.state {
            PropertyState::Sold | PropertyState::Canceled => {
                return Err(EstateError::UserAction(format!(
                    "cannot accept an offer on a {} property",
                    prop.state.as_str()
                )));
            }
            _ => {}
        }

        tx.execute(
            "UPDATE offers SET status = ?1 WHERE id = ?2",
            params![OfferStatus::Accepted, offer_id],
        )?;
        tx.execute(
            r#"
            UPDATE properties
            SET selling_price = ?1, buyer_id = ?2, state = ?3
            WHERE id = ?4
            "#,
            params![
                offer.price,
                offer.partner_id,
                PropertyState::OfferAccepted,
                prop.id,
            ],
        )?;
        // Refusal is idempotent: offers already refused are left as they are.
        tx.execute(
            r#"
            UPDATE offers SET status = ?1
            WHERE property_id = ?2 AND id != ?3
              AND (status IS NULL OR status != ?1)
            "#,
            params![OfferStatus::Refused, prop.id, offer_id],
        )?;

        tx.commit()?;
        log::info!("offer {offer_id} accepted on property {}", prop.id);
        Ok(())
    })
}

/// Refuses an offer. Refusing an already refused offer is a no-op. Refusing
/// the currently accepted offer reverses the acceptance: the property drops
/// back to `offer_received` and its selling price and buyer are cleared.
pub fn refuse(db: &Database, offer_id: i64) -> Result<(), EstateError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let offer = find_in(&tx, offer_id)?;
        if offer.status == Some(OfferStatus::Refused) {
            return Ok(());
        }
        let was_accepted = offer.status == Some(OfferStatus::Accepted);

        tx.execute(
            "UPDATE offers SET status = ?1 WHERE id = ?2",
            params![OfferStatus::Refused, offer_id],
        )?;

        if was_accepted {
            let prop = find_property_in(&tx, offer.property_id)?;
            if prop.state == PropertyState::OfferAccepted {
                tx.execute(
                    r#"
                    UPDATE properties
                    SET state = ?1, selling_price = 0, buyer_id = NULL
                    WHERE id = ?2
                    "#,
                    params![PropertyState::OfferReceived, prop.id],
                )?;
            }
        }

        tx.commit()?;
        log::info!("offer {offer_id} refused");
        Ok(())
    })
}

/// Removes an offer. Removing the accepted offer reverses the acceptance
/// first; removing the last offer returns the property to `new`.
pub fn remove(db: &Database, offer_id: i64) -> Result<(), EstateError> {
    db.with_conn(|conn| {
        let tx = conn.transaction()?;

        let offer = find_in(&tx, offer_id)?;
        let prop = find_property_in(&tx, offer.property_id)?;

        if offer.status == Some(OfferStatus::Accepted)
            && prop.state == PropertyState::OfferAccepted
        {
            tx.execute(
                r#"
                UPDATE properties
                SET state = ?1, selling_price = 0, buyer_id = NULL
                WHERE id = ?2
                "#,
                params![PropertyState::OfferReceived, prop.id],
            )?;
        }

        tx.execute("DELETE FROM offers WHERE id = ?1", params![offer_id])?;

        let remaining: i64 = tx.query_row(
            "SELECT COUNT(*) FROM offers WHERE property_id = ?1",
            params![prop.id],
            |row| row.get(0),
        )?;
        if remaining == 0 {
            // Only open listings revert; sold or canceled properties keep
            // their terminal state.
            tx.execute(
                "UPDATE properties SET state = ?1 WHERE id = ?2 AND state IN (?3, ?4)",
                params![
                    PropertyState::New,
                    prop.id,
                    PropertyState::OfferReceived,
                    PropertyState::OfferAccepted,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    })
}

/// Rewrites the validity window in days; the deadline derives from it.
pub fn set_validity(db: &Database, offer_id: i64, validity: i64) -> Result<Offer, EstateError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE offers SET validity = ?1 WHERE id = ?2",
            params![validity, offer_id],
        )?;
        if changed == 0 {
            return Err(EstateError::NotFound);
        }
        find_in(conn, offer_id)
    })
}

/// Writes the deadline by recomputing validity from the creation date, so the
/// two derivations stay mutually consistent.
pub fn set_deadline(db: &Database, offer_id: i64, deadline: NaiveDate) -> Result<Offer, EstateError> {
    db.with_conn(|conn| {
        let mut offer = find_in(conn, offer_id)?;
        offer.set_date_deadline(deadline);
        conn.execute(
            "UPDATE offers SET validity = ?1 WHERE id = ?2",
            params![offer.validity, offer_id],
        )?;
        Ok(offer)
    })
}

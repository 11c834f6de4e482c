// src/accounting/invoicing.rs

use crate::accounting::{Invoice, InvoiceLine, SoldListener, MOVE_TYPE_OUT_INVOICE};
use crate::db::connection::Database;
use crate::domain::property::Property;
use crate::errors::EstateError;
use chrono::Utc;
use rusqlite::{params, Connection};

/// Commission charged on the selling price.
pub const COMMISSION_RATE: f64 = 0.06;
/// Flat administrative fee added to every sale invoice.
pub const ADMIN_FEE: f64 = 100.0;

/// Accounting listener that records an invoice for the buyer when a property
/// is sold: 6% of the selling price plus the administrative fee.
pub struct DbInvoicing;

impl SoldListener for DbInvoicing {
    fn on_property_sold(&self, conn: &Connection, property: &Property) -> Result<(), EstateError> {
        let buyer_id = property.buyer_id.ok_or_else(|| {
            EstateError::Validation("cannot invoice a sale without a buyer".to_string())
        })?;

        conn.execute(
            "INSERT INTO invoices (partner_id, move_type, created_at) VALUES (?1, ?2, ?3)",
            params![buyer_id, MOVE_TYPE_OUT_INVOICE, Utc::now().naive_utc()],
        )?;
        let invoice_id = conn.last_insert_rowid();

        let mut stmt = conn.prepare(
            r#"
            INSERT INTO invoice_lines (invoice_id, description, quantity, unit_price)
            VALUES (?1, ?2, 1, ?3)
            "#,
        )?;
        stmt.execute(params![
            invoice_id,
            "6% of the selling price",
            property.selling_price as f64 * COMMISSION_RATE,
        ])?;
        stmt.execute(params![
            invoice_id,
            "An additional 100.00 from administrative fees",
            ADMIN_FEE,
        ])?;

        log::info!(
            "invoice {invoice_id} created for buyer {buyer_id} on property {}",
            property.id
        );
        Ok(())
    }
}

/// All invoices billed to a partner, lines included, newest last.
pub fn invoices_for_partner(db: &Database, partner_id: i64) -> Result<Vec<Invoice>, EstateError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT id, partner_id, move_type FROM invoices WHERE partner_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![partner_id], |row| {
            Ok(Invoice {
                id: row.get("id")?,
                partner_id: row.get("partner_id")?,
                move_type: row.get("move_type")?,
                lines: Vec::new(),
            })
        })?;

        let mut invoices = Vec::new();
        for row in rows {
            invoices.push(row?);
        }

        let mut line_stmt = conn.prepare(
            r#"
            SELECT description, quantity, unit_price
            FROM invoice_lines
            WHERE invoice_id = ?1
            ORDER BY id
            "#,
        )?;
        for invoice in &mut invoices {
            let lines = line_stmt.query_map(params![invoice.id], |row| {
                Ok(InvoiceLine {
                    description: row.get("description")?,
                    quantity: row.get("quantity")?,
                    unit_price: row.get("unit_price")?,
                })
            })?;
            for line in lines {
                invoice.lines.push(line?);
            }
        }
        Ok(invoices)
    })
}

// src/accounting/mod.rs
//
// External accounting collaborator. The property lifecycle knows nothing
// about invoicing; it invokes the registered `SoldListener`s after the state
// transition, and the invoicing implementation lives here.

pub mod invoicing;

use crate::domain::property::Property;
use crate::errors::EstateError;
use rusqlite::Connection;
use serde::Serialize;

/// Document type marker for customer invoices.
pub const MOVE_TYPE_OUT_INVOICE: &str = "out_invoice";

/// One (description, quantity, unit price) line on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
}

/// An invoice-like record billed to a partner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub id: i64,
    pub partner_id: i64,
    pub move_type: String,
    pub lines: Vec<InvoiceLine>,
}

/// Extension point invoked by the property lifecycle once per successful
/// sale, after the state write and on the same transaction, so a failing
/// listener rolls the sale back.
pub trait SoldListener {
    fn on_property_sold(&self, conn: &Connection, property: &Property) -> Result<(), EstateError>;
}

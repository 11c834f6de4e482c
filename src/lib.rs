//! Business-record management for real-estate listings: properties, offers,
//! tags, and property types, plus the lifecycle that takes a property from
//! listing to sale.
//!
//! Persistence goes through the rusqlite-backed [`db::connection::Database`];
//! the accounting collaborator hangs off the [`accounting::SoldListener`]
//! extension point and is notified once per successful sale.

pub mod accounting;
pub mod context;
pub mod db;
pub mod domain;
pub mod errors;

#[cfg(test)]
mod tests;

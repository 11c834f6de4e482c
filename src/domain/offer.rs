// src/domain/offer.rs

use crate::errors::EstateError;
use chrono::{Duration, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

/// Terminal status of an offer. An offer with no status yet is still open,
/// modeled as `Option<OfferStatus>` on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Accepted,
    Refused,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferStatus::Accepted => "accepted",
            OfferStatus::Refused => "refused",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accepted" => Some(OfferStatus::Accepted),
            "refused" => Some(OfferStatus::Refused),
            _ => None,
        }
    }
}

impl ToSql for OfferStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for OfferStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        OfferStatus::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

/// A bid from a prospective buyer on a property.
///
/// The deadline is not stored: it derives from `create_date + validity`, and
/// writing a deadline recomputes validity so the two stay consistent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub id: i64,
    pub price: i64,
    pub status: Option<OfferStatus>,
    pub partner_id: i64,
    pub property_id: i64,
    pub validity: i64,
    pub create_date: NaiveDate,
}

impl Offer {
    /// Derived: creation date plus validity in days.
    pub fn date_deadline(&self) -> NaiveDate {
        self.create_date + Duration::days(self.validity)
    }

    /// Inverse derivation: writing the deadline recomputes validity as the
    /// day-count difference from the creation date.
    pub fn set_date_deadline(&mut self, deadline: NaiveDate) {
        self.validity = (deadline - self.create_date).num_days();
    }
}

/// Input for placing an offer. Validity defaults to 7 days and the creation
/// date to today when not given.
#[derive(Debug, Clone)]
pub struct NewOffer {
    pub price: i64,
    pub partner_id: i64,
    pub property_id: i64,
    pub validity: Option<i64>,
    pub create_date: Option<NaiveDate>,
}

pub fn validate_offer_price(price: i64) -> Result<(), EstateError> {
    if price <= 0 {
        return Err(EstateError::Validation(
            "an offer price must be strictly positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_created_on(date: NaiveDate, validity: i64) -> Offer {
        Offer {
            id: 1,
            price: 150_000,
            status: None,
            partner_id: 7,
            property_id: 3,
            validity,
            create_date: date,
        }
    }

    #[test]
    fn deadline_derives_from_validity() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let offer = offer_created_on(day, 7);
        assert_eq!(
            offer.date_deadline(),
            NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()
        );
    }

    #[test]
    fn setting_deadline_recomputes_validity() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut offer = offer_created_on(day, 7);

        offer.set_date_deadline(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert_eq!(offer.validity, 10);

        // Round-trip: writing the derived deadline back reproduces validity.
        let deadline = offer.date_deadline();
        offer.set_date_deadline(deadline);
        assert_eq!(offer.validity, 10);
    }

    #[test]
    fn offer_price_must_be_positive() {
        assert!(validate_offer_price(0).is_err());
        assert!(validate_offer_price(-100).is_err());
        assert!(validate_offer_price(1).is_ok());
    }
}

// src/domain/property.rs

use crate::errors::EstateError;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

/// Lifecycle state of a property listing.
///
/// `new → offer_received → offer_accepted → sold`, with `canceled` reachable
/// from any non-sold state. Sale is blocked from `canceled` and cancellation
/// from `sold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyState {
    New,
    OfferReceived,
    OfferAccepted,
    Sold,
    Canceled,
}

impl PropertyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyState::New => "new",
            PropertyState::OfferReceived => "offer_received",
            PropertyState::OfferAccepted => "offer_accepted",
            PropertyState::Sold => "sold",
            PropertyState::Canceled => "canceled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(PropertyState::New),
            "offer_received" => Some(PropertyState::OfferReceived),
            "offer_accepted" => Some(PropertyState::OfferAccepted),
            "sold" => Some(PropertyState::Sold),
            "canceled" => Some(PropertyState::Canceled),
            _ => None,
        }
    }
}

impl ToSql for PropertyState {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for PropertyState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        PropertyState::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

/// Compass orientation of the garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GardenOrientation {
    North,
    South,
    East,
    West,
}

impl GardenOrientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GardenOrientation::North => "north",
            GardenOrientation::South => "south",
            GardenOrientation::East => "east",
            GardenOrientation::West => "west",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "north" => Some(GardenOrientation::North),
            "south" => Some(GardenOrientation::South),
            "east" => Some(GardenOrientation::East),
            "west" => Some(GardenOrientation::West),
            _ => None,
        }
    }
}

impl ToSql for GardenOrientation {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for GardenOrientation {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        GardenOrientation::parse(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

/// A property listing as stored in the `properties` table.
///
/// Selling price, buyer, and state are lifecycle-managed: plain updates never
/// touch them, only offer acceptance and the sell/cancel actions do.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub postcode: Option<String>,
    pub date_availability: NaiveDate,
    pub expected_price: i64,
    pub selling_price: i64,
    pub bedrooms: i64,
    pub living_area: i64,
    pub facades: i64,
    pub garage: bool,
    pub garden: bool,
    pub garden_area: i64,
    pub garden_orientation: Option<GardenOrientation>,
    pub active: bool,
    pub state: PropertyState,
    pub property_type_id: Option<i64>,
    pub salesperson_id: Option<i64>,
    pub buyer_id: Option<i64>,
}

impl Property {
    /// Derived: living area plus garden area.
    pub fn total_area(&self) -> i64 {
        self.living_area + self.garden_area
    }
}

/// Input for creating a property. Unset optionals receive defaults:
/// availability three months out, two bedrooms, salesperson from the session.
#[derive(Debug, Clone, Default)]
pub struct NewProperty {
    pub name: String,
    pub description: Option<String>,
    pub postcode: Option<String>,
    pub date_availability: Option<NaiveDate>,
    pub expected_price: i64,
    pub bedrooms: Option<i64>,
    pub living_area: i64,
    pub facades: i64,
    pub garage: bool,
    pub garden: bool,
    pub garden_area: i64,
    pub garden_orientation: Option<GardenOrientation>,
    pub property_type_id: Option<i64>,
    pub salesperson_id: Option<i64>,
}

pub fn validate_expected_price(expected_price: i64) -> Result<(), EstateError> {
    if expected_price <= 0 {
        return Err(EstateError::Validation(
            "expected price must be strictly positive".to_string(),
        ));
    }
    Ok(())
}

/// A nonzero selling price must be at least 90% of the expected price.
/// Zero means "not sold yet" and is exempt.
pub fn validate_selling_price(expected_price: i64, selling_price: i64) -> Result<(), EstateError> {
    if selling_price < 0 {
        return Err(EstateError::Validation(
            "selling price must be positive".to_string(),
        ));
    }
    if selling_price != 0 && selling_price * 10 < expected_price * 9 {
        return Err(EstateError::Validation(
            "selling price cannot be lower than 90% of the expected price".to_string(),
        ));
    }
    Ok(())
}

/// Field defaults suggested to an interactive editor when the garden flag is
/// toggled. This is a pre-commit UI assist only; `create` and `update` never
/// apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GardenPreview {
    pub garden_area: i64,
    pub garden_orientation: Option<GardenOrientation>,
}

pub fn preview_garden_toggle(garden: bool) -> GardenPreview {
    if garden {
        GardenPreview {
            garden_area: 10,
            garden_orientation: Some(GardenOrientation::North),
        }
    } else {
        GardenPreview {
            garden_area: 0,
            garden_orientation: None,
        }
    }
}

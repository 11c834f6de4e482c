pub mod offer;
pub mod property;
pub mod property_type;
pub mod tag;

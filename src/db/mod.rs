pub mod connection;
pub mod offers;
pub mod properties;
pub mod property_types;
pub mod tags;

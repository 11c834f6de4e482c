mod property_tests;
pub mod utils;

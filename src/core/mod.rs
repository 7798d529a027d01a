pub mod config;
pub mod error;
pub mod expense;
pub mod group;
pub mod person;

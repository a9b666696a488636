pub mod cache;
pub mod openmeteo;

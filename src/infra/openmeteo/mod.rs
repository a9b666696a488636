mod client;
pub mod parse;

pub use client::OpenMeteo;

//! Record encoders

pub mod json;

pub use json::JsonEncoder;

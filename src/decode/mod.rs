// Fri Oct 16 2026 - Alex

pub mod decoder;
pub mod error;
pub mod value;

pub use decoder::{c_field_string, RawDecoder};
pub use error::DecodeError;
pub use value::{Record, Value};

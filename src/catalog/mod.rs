// Thu Oct 15 2026 - Alex

pub mod abi;
pub mod types;

pub use abi::ForeignAbi;
pub use types::{DataModel, Endian, TypeCatalog};

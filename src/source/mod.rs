// Thu Oct 15 2026 - Alex

pub mod decl;

pub use decl::{SourceDecl, SourceField, SourceType};

// Fri Oct 16 2026 - Alex

pub mod catalog;
pub mod config;
pub mod decode;
pub mod emit;
pub mod kstat;
pub mod output;
pub mod source;
pub mod structure;
pub mod ui;
pub mod utils;

pub use catalog::{ForeignAbi, TypeCatalog};
pub use config::Config;
pub use decode::RawDecoder;
pub use emit::{MirrorDeclaration, MirrorEmitter, TargetAbi, TargetLanguage};
pub use source::SourceDecl;
pub use structure::{LayoutBuilder, LayoutDescriptor, LayoutValidator, StructureError};

// Thu Oct 15 2026 - Alex

pub mod alignment;
pub mod builder;
pub mod error;
pub mod field;
pub mod layout;
pub mod serializer;
pub mod type_info;
pub mod validator;

pub use alignment::Alignment;
pub use builder::LayoutBuilder;
pub use error::StructureError;
pub use field::FieldDescriptor;
pub use layout::{LayoutDescriptor, PlacedField, Placement, Slot};
pub use serializer::SerializableLayout;
pub use type_info::{FieldType, ScalarKind, ScalarType};
pub use validator::{LayoutValidator, ReferenceLayout, ValidationReport};

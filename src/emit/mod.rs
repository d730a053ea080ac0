// Fri Oct 16 2026 - Alex

pub mod declaration;
pub mod emitter;
pub mod render;
pub mod target;

pub use declaration::{MirrorDeclaration, MirrorField, MirrorType};
pub use emitter::{EmitOptions, MirrorEmitter};
pub use target::{TargetAbi, TargetLanguage, TargetType};

// Fri Oct 16 2026 - Alex

use crate::emit::{render, TargetLanguage, TargetType};
use crate::structure::Alignment;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorType {
    Scalar(TargetType),
    /// Another emitted declaration, by its target-language name.
    Record(String),
    /// Explicit padding bytes.
    Padding(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorField {
    pub name: String,
    /// `None` for padding inserted by the emitter.
    pub source_name: Option<String>,
    pub ty: MirrorType,
    pub array_len: Option<usize>,
    pub offset: u64,
    pub size: u64,
}

impl MirrorField {
    pub fn is_padding(&self) -> bool {
        self.source_name.is_none()
    }
}

/// A struct declaration in a target language plus the declarations of the
/// nested structs it uses, which render ahead of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorDeclaration {
    pub(crate) language: TargetLanguage,
    pub(crate) name: String,
    pub(crate) source_name: String,
    pub(crate) abi: String,
    pub(crate) fields: Vec<MirrorField>,
    pub(crate) dependencies: Vec<MirrorDeclaration>,
    pub(crate) size: u64,
    pub(crate) alignment: Alignment,
}

impl MirrorDeclaration {
    pub fn language(&self) -> TargetLanguage {
        self.language
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn abi(&self) -> &str {
        &self.abi
    }

    pub fn fields(&self) -> &[MirrorField] {
        &self.fields
    }

    pub fn dependencies(&self) -> &[MirrorDeclaration] {
        &self.dependencies
    }

    /// Size the target compiler will give this declaration.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn field_by_source(&self, source_name: &str) -> Option<&MirrorField> {
        self.fields
            .iter()
            .find(|field| field.source_name.as_deref() == Some(source_name))
    }

    /// Source names of the non-padding fields, in emitted order.
    pub fn source_order(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|field| field.source_name.as_deref())
            .collect()
    }

    pub fn render(&self) -> String {
        render::render_all(self)
    }
}

impl fmt::Display for MirrorDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

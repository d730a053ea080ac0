// Thu Oct 15 2026 - Alex

use crate::structure::Alignment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the bytes of a scalar are interpreted. Layout only depends on size
/// and alignment; the kind steers target type selection and decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Signed,
    Unsigned,
    Char,
    Float,
}

impl ScalarKind {
    pub fn is_integer(self) -> bool {
        !matches!(self, Self::Float)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
            Self::Char => "char",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

/// A foreign scalar type as the foreign ABI defines it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScalarType {
    name: String,
    size: u64,
    alignment: Alignment,
    kind: ScalarKind,
}

impl ScalarType {
    pub fn new(name: impl Into<String>, size: u64, alignment: Alignment, kind: ScalarKind) -> Self {
        Self {
            name: name.into(),
            size,
            alignment,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.name, self.size, self.alignment)
    }
}

/// Element type of a field: a catalog scalar, or a nested layout owned by
/// the same parent and referenced by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(ScalarType),
    Nested(String),
}

impl FieldType {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(scalar) => scalar.name(),
            Self::Nested(name) => name,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(scalar) => write!(f, "{}", scalar.name()),
            Self::Nested(name) => write!(f, "struct {}", name),
        }
    }
}

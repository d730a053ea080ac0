// Thu Oct 15 2026 - Alex

use crate::structure::{Alignment, ScalarKind, ScalarType, StructureError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    Little,
    Big,
}

/// C data model of a foreign ABI. Decides which target type tables apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataModel {
    Ilp32,
    Lp64,
}

impl DataModel {
    pub fn pointer_size(self) -> u64 {
        match self {
            Self::Ilp32 => 4,
            Self::Lp64 => 8,
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => f.write_str("little"),
            Self::Big => f.write_str("big"),
        }
    }
}

impl FromStr for DataModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ilp32" => Ok(Self::Ilp32),
            "lp64" => Ok(Self::Lp64),
            other => Err(format!("unknown data model: {}", other)),
        }
    }
}

impl fmt::Display for DataModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ilp32 => f.write_str("ILP32"),
            Self::Lp64 => f.write_str("LP64"),
        }
    }
}

/// The scalar types of one foreign ABI, by foreign name.
///
/// A catalog is a plain value: build one per ABI and pass it to whoever
/// needs it. Nothing here looks at the host's own primitive sizes.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    abi: String,
    endian: Endian,
    data_model: DataModel,
    types: IndexMap<String, ScalarType>,
}

impl TypeCatalog {
    pub fn new(abi: impl Into<String>, endian: Endian, data_model: DataModel) -> Self {
        Self {
            abi: abi.into(),
            endian,
            data_model,
            types: IndexMap::new(),
        }
    }

    pub fn register(
        &mut self,
        name: &str,
        size: u64,
        alignment: usize,
        kind: ScalarKind,
    ) -> Result<&mut Self, StructureError> {
        if name.trim().is_empty() {
            return Err(StructureError::EmptyName(format!("catalog {}", self.abi)));
        }
        if self.types.contains_key(name) {
            return Err(StructureError::DuplicateType(name.to_string()));
        }
        let alignment = Alignment::new(alignment)?;
        self.types
            .insert(name.to_string(), ScalarType::new(name, size, alignment, kind));
        Ok(self)
    }

    /// Registers `alias` with the same size, alignment and kind as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<&mut Self, StructureError> {
        let original = self
            .types
            .get(target)
            .cloned()
            .ok_or_else(|| StructureError::UnknownType {
                layout: format!("catalog {}", self.abi),
                field: alias.to_string(),
                type_name: target.to_string(),
            })?;
        self.register(
            alias,
            original.size(),
            original.alignment().as_usize(),
            original.kind(),
        )
    }

    /// Fails with `UnknownType` for anything not registered; there is no
    /// fallback size.
    pub fn lookup(&self, name: &str) -> Result<&ScalarType, StructureError> {
        self.types.get(name).ok_or_else(|| StructureError::UnknownType {
            layout: format!("catalog {}", self.abi),
            field: String::new(),
            type_name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScalarType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn abi(&self) -> &str {
        &self.abi
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    pub fn data_model(&self) -> DataModel {
        self.data_model
    }
}

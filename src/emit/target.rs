// Fri Oct 16 2026 - Alex

use crate::catalog::DataModel;
use crate::structure::{Alignment, ScalarKind, ScalarType, StructureError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    Rust,
    Go,
    C,
}

impl TargetLanguage {
    pub fn all() -> &'static [TargetLanguage] {
        &[Self::Rust, Self::Go, Self::C]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Go => "go",
            Self::C => "c",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "go" | "golang" => Ok(Self::Go),
            "c" | "h" => Ok(Self::C),
            other => Err(format!("unknown target language: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    name: String,
    size: u64,
    alignment: Alignment,
    kind: ScalarKind,
}

impl TargetType {
    pub fn new(name: &str, size: u64, alignment: Alignment, kind: ScalarKind) -> Self {
        Self {
            name: name.to_string(),
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

    /// Same size, at least as strictly aligned, and an interpretation that
    /// does not turn integers into floats or back.
    pub fn can_hold(&self, source: &ScalarType) -> bool {
        self.size == source.size()
            && self.alignment >= source.alignment()
            && self.kind.is_integer() == source.kind().is_integer()
    }
}

/// Scalar types available in one target language under one data model.
#[derive(Debug, Clone)]
pub struct TargetAbi {
    language: TargetLanguage,
    data_model: DataModel,
    types: Vec<TargetType>,
    byte_type: String,
}

impl TargetAbi {
    pub fn new(language: TargetLanguage, data_model: DataModel) -> Self {
        let wide = match data_model {
            DataModel::Lp64 => 8,
            DataModel::Ilp32 => 4,
        };
        let table: Vec<(&str, u64, usize, ScalarKind)> = match language {
            TargetLanguage::Rust => vec![
                ("core::ffi::c_char", 1, 1, ScalarKind::Char),
                ("i8", 1, 1, ScalarKind::Signed),
                ("u8", 1, 1, ScalarKind::Unsigned),
                ("i16", 2, 2, ScalarKind::Signed),
                ("u16", 2, 2, ScalarKind::Unsigned),
                ("i32", 4, 4, ScalarKind::Signed),
                ("u32", 4, 4, ScalarKind::Unsigned),
                ("i64", 8, wide, ScalarKind::Signed),
                ("u64", 8, wide, ScalarKind::Unsigned),
                ("f32", 4, 4, ScalarKind::Float),
                ("f64", 8, wide, ScalarKind::Float),
            ],
            // cgo renders C char as int8
            TargetLanguage::Go => vec![
                ("int8", 1, 1, ScalarKind::Signed),
                ("uint8", 1, 1, ScalarKind::Unsigned),
                ("int16", 2, 2, ScalarKind::Signed),
                ("uint16", 2, 2, ScalarKind::Unsigned),
                ("int32", 4, 4, ScalarKind::Signed),
                ("uint32", 4, 4, ScalarKind::Unsigned),
                ("int64", 8, wide, ScalarKind::Signed),
                ("uint64", 8, wide, ScalarKind::Unsigned),
                ("float32", 4, 4, ScalarKind::Float),
                ("float64", 8, wide, ScalarKind::Float),
            ],
            TargetLanguage::C => vec![
                ("char", 1, 1, ScalarKind::Char),
                ("int8_t", 1, 1, ScalarKind::Signed),
                ("uint8_t", 1, 1, ScalarKind::Unsigned),
                ("int16_t", 2, 2, ScalarKind::Signed),
                ("uint16_t", 2, 2, ScalarKind::Unsigned),
                ("int32_t", 4, 4, ScalarKind::Signed),
                ("uint32_t", 4, 4, ScalarKind::Unsigned),
                ("int64_t", 8, wide, ScalarKind::Signed),
                ("uint64_t", 8, wide, ScalarKind::Unsigned),
                ("float", 4, 4, ScalarKind::Float),
                ("double", 8, wide, ScalarKind::Float),
            ],
        };

        let mut abi = Self {
            language,
            data_model,
            types: Vec::new(),
            byte_type: String::new(),
        };
        for (name, size, align, kind) in table {
            // every table alignment above is a power of two
            if let Ok(alignment) = Alignment::new(align) {
                abi.types.push(TargetType::new(name, size, alignment, kind));
            }
        }
        abi.byte_type = match language {
            TargetLanguage::Rust => "u8",
            TargetLanguage::Go => "byte",
            TargetLanguage::C => "uint8_t",
        }
        .to_string();
        abi
    }

    /// A table with no entries, for callers supplying their own types.
    pub fn empty(language: TargetLanguage, data_model: DataModel, byte_type: &str) -> Self {
        Self {
            language,
            data_model,
            types: Vec::new(),
            byte_type: byte_type.to_string(),
        }
    }

    pub fn add_type(&mut self, name: &str, size: u64, alignment: usize, kind: ScalarKind) -> Result<&mut Self, StructureError> {
        let alignment = Alignment::new(alignment)?;
        self.types.push(TargetType::new(name, size, alignment, kind));
        Ok(self)
    }

    /// Picks the target type for a foreign scalar: same kind first, then the
    /// least strict alignment, then table order.
    pub fn select(&self, source: &ScalarType) -> Option<&TargetType> {
        self.types
            .iter()
            .enumerate()
            .filter(|(_, ty)| ty.can_hold(source))
            .min_by_key(|(index, ty)| (ty.kind() != source.kind(), ty.alignment(), *index))
            .map(|(_, ty)| ty)
    }

    pub fn language(&self) -> TargetLanguage {
        self.language
    }

    pub fn data_model(&self) -> DataModel {
        self.data_model
    }

    pub fn types(&self) -> &[TargetType] {
        &self.types
    }

    pub fn byte_type(&self) -> &str {
        &self.byte_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ForeignAbi;

    #[test]
    fn test_select_prefers_matching_kind() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let rust = TargetAbi::new(TargetLanguage::Rust, DataModel::Lp64);
        assert_eq!(rust.select(catalog.lookup("uint_t").unwrap()).unwrap().name(), "u32");
        assert_eq!(rust.select(catalog.lookup("int").unwrap()).unwrap().name(), "i32");
        assert_eq!(rust.select(catalog.lookup("char").unwrap()).unwrap().name(), "core::ffi::c_char");
        assert_eq!(rust.select(catalog.lookup("double").unwrap()).unwrap().name(), "f64");
    }

    #[test]
    fn test_go_char_falls_back_to_int8() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let go = TargetAbi::new(TargetLanguage::Go, DataModel::Lp64);
        assert_eq!(go.select(catalog.lookup("char").unwrap()).unwrap().name(), "int8");
    }

    #[test]
    fn test_no_type_weaker_than_source() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let ilp32 = TargetAbi::new(TargetLanguage::C, DataModel::Ilp32);
        // a 4-aligned uint64_t cannot carry an 8-aligned one
        assert!(ilp32.select(catalog.lookup("uint64_t").unwrap()).is_none());

        let i386 = ForeignAbi::SolarisI386.catalog();
        let lp64 = TargetAbi::new(TargetLanguage::C, DataModel::Lp64);
        let stricter = lp64.select(i386.lookup("uint64_t").unwrap()).unwrap();
        assert_eq!(stricter.alignment().as_usize(), 8);
    }

    #[test]
    fn test_floats_never_hold_integers() {
        let mut abi = TargetAbi::empty(TargetLanguage::C, DataModel::Lp64, "uint8_t");
        abi.add_type("float", 4, 4, ScalarKind::Float).unwrap();
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        assert!(abi.select(catalog.lookup("uint32_t").unwrap()).is_none());
        assert!(abi.select(catalog.lookup("float").unwrap()).is_some());
    }

    #[test]
    fn test_parse_language() {
        assert_eq!("Rust".parse::<TargetLanguage>().unwrap(), TargetLanguage::Rust);
        assert_eq!("golang".parse::<TargetLanguage>().unwrap(), TargetLanguage::Go);
        assert!("pascal".parse::<TargetLanguage>().is_err());
    }
}

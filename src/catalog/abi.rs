// Thu Oct 15 2026 - Alex

use crate::catalog::{DataModel, Endian, TypeCatalog};
use crate::structure::{ScalarKind, StructureError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Foreign ABIs with a built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ForeignAbi {
    SolarisAmd64,
    SolarisI386,
    SolarisSparcv9,
}

impl ForeignAbi {
    pub fn all() -> &'static [ForeignAbi] {
        &[Self::SolarisAmd64, Self::SolarisI386, Self::SolarisSparcv9]
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SolarisAmd64 => "solaris-amd64",
            Self::SolarisI386 => "solaris-i386",
            Self::SolarisSparcv9 => "solaris-sparcv9",
        }
    }

    pub fn endian(self) -> Endian {
        match self {
            Self::SolarisAmd64 | Self::SolarisI386 => Endian::Little,
            Self::SolarisSparcv9 => Endian::Big,
        }
    }

    pub fn data_model(self) -> DataModel {
        match self {
            Self::SolarisAmd64 | Self::SolarisSparcv9 => DataModel::Lp64,
            Self::SolarisI386 => DataModel::Ilp32,
        }
    }

    /// Builds a fresh catalog for this ABI.
    pub fn catalog(self) -> TypeCatalog {
        let mut catalog = TypeCatalog::new(self.name(), self.endian(), self.data_model());
        if let Err(e) = register_solaris(&mut catalog, self) {
            log::error!("built-in catalog {} is inconsistent: {}", self.name(), e);
        }
        catalog
    }
}

fn register_solaris(catalog: &mut TypeCatalog, abi: ForeignAbi) -> Result<(), StructureError> {
    let word = abi.data_model().pointer_size();
    // The i386 psABI only 4-aligns 8-byte scalars.
    let wide_align = match abi {
        ForeignAbi::SolarisI386 => 4,
        ForeignAbi::SolarisAmd64 | ForeignAbi::SolarisSparcv9 => 8,
    };

    catalog
        .register("int8_t", 1, 1, ScalarKind::Signed)?
        .register("uint8_t", 1, 1, ScalarKind::Unsigned)?
        .register("int16_t", 2, 2, ScalarKind::Signed)?
        .register("uint16_t", 2, 2, ScalarKind::Unsigned)?
        .register("int32_t", 4, 4, ScalarKind::Signed)?
        .register("uint32_t", 4, 4, ScalarKind::Unsigned)?
        .register("int64_t", 8, wide_align, ScalarKind::Signed)?
        .register("uint64_t", 8, wide_align, ScalarKind::Unsigned)?
        .register("char", 1, 1, ScalarKind::Char)?
        .register("float", 4, 4, ScalarKind::Float)?
        .register("double", 8, wide_align, ScalarKind::Float)?
        .register("long", word, word as usize, ScalarKind::Signed)?
        .register("ulong_t", word, word as usize, ScalarKind::Unsigned)?
        .register("size_t", word, word as usize, ScalarKind::Unsigned)?
        .register("ssize_t", word, word as usize, ScalarKind::Signed)?
        .register("uintptr_t", word, word as usize, ScalarKind::Unsigned)?
        .register("caddr_t", word, word as usize, ScalarKind::Unsigned)?;

    catalog
        .alias("uchar_t", "uint8_t")?
        .alias("short", "int16_t")?
        .alias("ushort_t", "uint16_t")?
        .alias("int", "int32_t")?
        .alias("uint_t", "uint32_t")?
        .alias("longlong_t", "int64_t")?
        .alias("u_longlong_t", "uint64_t")?
        .alias("hrtime_t", "int64_t")?;

    Ok(())
}

impl fmt::Display for ForeignAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ForeignAbi {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::all()
            .iter()
            .copied()
            .find(|abi| abi.name() == wanted)
            .ok_or_else(|| StructureError::UnknownAbi(s.to_string()))
    }
}

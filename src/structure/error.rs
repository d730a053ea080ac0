// Thu Oct 15 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Unknown type `{type_name}` for field {layout}.{field}")]
    UnknownType {
        layout: String,
        field: String,
        type_name: String,
    },
    #[error("Unsupported construct at {layout}.{field}: {reason}")]
    UnsupportedConstruct {
        layout: String,
        field: String,
        reason: String,
    },
    #[error("No {language} type matches {layout}.{field} (size {size}, alignment {alignment})")]
    NoCompatibleType {
        layout: String,
        field: String,
        language: String,
        size: u64,
        alignment: usize,
    },
    #[error("Size mismatch for {layout}: computed 0x{computed:x}, reference 0x{reference:x}")]
    SizeMismatch {
        layout: String,
        computed: u64,
        reference: u64,
    },
    #[error("Offset mismatch for {layout}.{field}: computed 0x{computed:x}, reference 0x{reference:x}")]
    OffsetMismatch {
        layout: String,
        field: String,
        computed: u64,
        reference: u64,
    },
    #[error("Field not found: {layout}.{field}")]
    FieldNotFound { layout: String, field: String },
    #[error("Duplicate field {layout}.{field}")]
    DuplicateField { layout: String, field: String },
    #[error("Duplicate type name `{0}`")]
    DuplicateType(String),
    #[error("Empty name in {0}")]
    EmptyName(String),
    #[error("Invalid alignment: {0}")]
    InvalidAlignment(usize),
    #[error("Field {layout}.{field} declared out of order (index {order})")]
    InvalidOrder {
        layout: String,
        field: String,
        order: usize,
    },
    #[error("Size of {layout} does not fit in 64 bits at field {field}")]
    SizeOverflow { layout: String, field: String },
    #[error("Unknown ABI: {0}")]
    UnknownAbi(String),
}

impl StructureError {
    /// Name of the layout the error was raised for, when there is one.
    pub fn layout(&self) -> Option<&str> {
        match self {
            Self::UnknownType { layout, .. }
            | Self::UnsupportedConstruct { layout, .. }
            | Self::NoCompatibleType { layout, .. }
            | Self::SizeMismatch { layout, .. }
            | Self::OffsetMismatch { layout, .. }
            | Self::FieldNotFound { layout, .. }
            | Self::DuplicateField { layout, .. }
            | Self::InvalidOrder { layout, .. }
            | Self::SizeOverflow { layout, .. } => Some(layout),
            Self::EmptyName(layout) => Some(layout),
            Self::DuplicateType(_) | Self::InvalidAlignment(_) | Self::UnknownAbi(_) => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownType { field, .. }
            | Self::UnsupportedConstruct { field, .. }
            | Self::NoCompatibleType { field, .. }
            | Self::OffsetMismatch { field, .. }
            | Self::FieldNotFound { field, .. }
            | Self::DuplicateField { field, .. }
            | Self::InvalidOrder { field, .. }
            | Self::SizeOverflow { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_layout_drift(&self) -> bool {
        matches!(self, Self::SizeMismatch { .. } | Self::OffsetMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_carries_names() {
        let err = StructureError::OffsetMismatch {
            layout: "mntinfo_kstat".to_string(),
            field: "mik_vers".to_string(),
            computed: 0x84,
            reference: 0x80,
        };
        assert_eq!(err.layout(), Some("mntinfo_kstat"));
        assert_eq!(err.field(), Some("mik_vers"));
        assert!(err.is_layout_drift());
        assert!(err.to_string().contains("0x84"));
    }

    #[test]
    fn test_catalog_errors_have_no_field() {
        let err = StructureError::InvalidAlignment(3);
        assert!(err.layout().is_none());
        assert!(err.field().is_none());
        assert!(!err.is_layout_drift());
    }
}

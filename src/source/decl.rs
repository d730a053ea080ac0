// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};

/// A foreign struct declaration as handed over by whatever read the header:
/// field names, foreign type names, array lengths, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDecl {
    pub name: String,
    pub fields: Vec<SourceField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceField {
    pub name: String,
    #[serde(flatten)]
    pub ty: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_len: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceType {
    /// A foreign scalar such as `uint32_t` or `uint_t`.
    Scalar { type_name: String },
    /// A struct declared inline. `name` is `None` for `struct { ... } f;`.
    Struct {
        #[serde(rename = "struct_name", default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        fields: Vec<SourceField>,
    },
}

impl SourceDecl {
    pub fn new(name: impl Into<String>, fields: Vec<SourceField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl SourceField {
    pub fn scalar(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: SourceType::Scalar {
                type_name: type_name.into(),
            },
            array_len: None,
        }
    }

    pub fn anonymous(name: impl Into<String>, fields: Vec<SourceField>) -> Self {
        Self {
            name: name.into(),
            ty: SourceType::Struct { name: None, fields },
            array_len: None,
        }
    }

    pub fn named_struct(name: impl Into<String>, struct_name: impl Into<String>, fields: Vec<SourceField>) -> Self {
        Self {
            name: name.into(),
            ty: SourceType::Struct {
                name: Some(struct_name.into()),
                fields,
            },
            array_len: None,
        }
    }

    pub fn array(mut self, len: usize) -> Self {
        self.array_len = Some(len);
        self
    }
}

// Thu Oct 15 2026 - Alex

use crate::structure::FieldType;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    field_type: FieldType,
    array_len: Option<usize>,
    order: usize,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, field_type: FieldType, order: usize) -> Self {
        Self {
            name: name.into(),
            field_type,
            array_len: None,
            order,
        }
    }

    pub fn with_array_len(mut self, len: usize) -> Self {
        self.array_len = Some(len);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// `None` for a plain scalar or record, `Some(n)` for `T name[n]`.
    pub fn array_len(&self) -> Option<usize> {
        self.array_len
    }

    pub fn element_count(&self) -> usize {
        self.array_len.unwrap_or(1)
    }

    pub fn is_array(&self) -> bool {
        self.array_len.is_some()
    }

    pub fn order(&self) -> usize {
        self.order
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.array_len {
            Some(len) => write!(f, "{} {}[{}]", self.field_type, self.name, len),
            None => write!(f, "{} {}", self.field_type, self.name),
        }
    }
}

// Thu Oct 15 2026 - Alex

use crate::structure::LayoutDescriptor;
use serde::Serialize;

/// Flat, JSON-friendly view of a layout and its nested layouts.
#[derive(Debug, Serialize)]
pub struct SerializableLayout {
    name: String,
    size: u64,
    alignment: usize,
    fields: Vec<SerializableField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    nested: Vec<SerializableLayout>,
}

#[derive(Debug, Serialize)]
pub struct SerializableField {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    array_len: Option<usize>,
    offset: u64,
    size: u64,
    alignment: usize,
}

impl From<&LayoutDescriptor> for SerializableLayout {
    fn from(layout: &LayoutDescriptor) -> Self {
        let placement = layout.placement();
        Self {
            name: layout.name().to_string(),
            size: placement.size,
            alignment: placement.alignment.as_usize(),
            fields: layout
                .fields()
                .iter()
                .zip(&placement.fields)
                .map(|(field, placed)| SerializableField {
                    name: field.name().to_string(),
                    type_name: field.field_type().type_name().to_string(),
                    array_len: field.array_len(),
                    offset: placed.offset,
                    size: placed.size,
                    alignment: placed.alignment.as_usize(),
                })
                .collect(),
            nested: layout.nested().iter().map(SerializableLayout::from).collect(),
        }
    }
}

impl SerializableLayout {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

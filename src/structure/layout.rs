// Thu Oct 15 2026 - Alex

use crate::structure::{Alignment, FieldDescriptor, FieldType, StructureError};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

/// One foreign struct: its fields in declaration order and the nested
/// layouts (formerly anonymous) that those fields refer to.
///
/// Descriptors are assembled by [`crate::structure::LayoutBuilder`] and are
/// read-only afterwards. The natural-alignment placement is recomputed on
/// every field push, so reading it never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    field_map: HashMap<String, usize>,
    nested: Vec<LayoutDescriptor>,
    placement: Placement,
}

impl LayoutDescriptor {
    pub(crate) fn new(name: impl Into<String>) -> Result<Self, StructureError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(StructureError::EmptyName("layout".to_string()));
        }
        let placement = Placement::compute(&name, Vec::new())?;
        Ok(Self {
            name,
            fields: Vec::new(),
            field_map: HashMap::new(),
            nested: Vec::new(),
            placement,
        })
    }

    /// Nested layouts must be added before any field that refers to them.
    ///
    /// Adding a layout identical to one already present is a no-op, so two
    /// fields of the same named struct share one definition. A different
    /// layout under a taken name is a `DuplicateType`.
    pub(crate) fn add_nested(&mut self, layout: LayoutDescriptor) -> Result<(), StructureError> {
        if let Some(existing) = self.nested_layout(&layout.name) {
            if *existing == layout {
                return Ok(());
            }
            return Err(StructureError::DuplicateType(layout.name));
        }
        for candidate in layout.type_names() {
            if let (Some(ours), Some(theirs)) = (self.find_type(candidate), layout.find_type(candidate)) {
                if ours != theirs {
                    return Err(StructureError::DuplicateType(candidate.to_string()));
                }
            }
        }
        self.nested.push(layout);
        Ok(())
    }

    pub(crate) fn push_field(&mut self, field: FieldDescriptor) -> Result<(), StructureError> {
        if field.name().trim().is_empty() {
            return Err(StructureError::EmptyName(self.name.clone()));
        }
        if self.field_map.contains_key(field.name()) {
            return Err(StructureError::DuplicateField {
                layout: self.name.clone(),
                field: field.name().to_string(),
            });
        }
        if let Some(last) = self.fields.last() {
            if field.order() <= last.order() {
                return Err(StructureError::InvalidOrder {
                    layout: self.name.clone(),
                    field: field.name().to_string(),
                    order: field.order(),
                });
            }
        }
        if let FieldType::Nested(nested) = field.field_type() {
            if self.nested_layout(nested).is_none() {
                return Err(StructureError::UnsupportedConstruct {
                    layout: self.name.clone(),
                    field: field.name().to_string(),
                    reason: format!("refers to undeclared nested type `{}`", nested),
                });
            }
        }
        if field.array_len() == Some(0) {
            return Err(StructureError::UnsupportedConstruct {
                layout: self.name.clone(),
                field: field.name().to_string(),
                reason: "zero-length array".to_string(),
            });
        }

        let mut slots: Vec<Slot> = self.fields.iter().map(|f| self.slot(f)).collect();
        slots.push(self.slot(&field));
        let placement = Placement::compute(&self.name, slots)?;

        let index = self.fields.len();
        self.field_map.insert(field.name().to_string(), index);
        self.fields.push(field);
        self.placement = placement;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_map.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn nested(&self) -> &[LayoutDescriptor] {
        &self.nested
    }

    pub fn nested_layout(&self, name: &str) -> Option<&LayoutDescriptor> {
        self.nested.iter().find(|layout| layout.name == name)
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn size(&self) -> u64 {
        self.placement.size
    }

    pub fn alignment(&self) -> Alignment {
        self.placement.alignment
    }

    /// Looks `name` up in this layout and every nested layout, depth first.
    pub fn find_type(&self, name: &str) -> Option<&LayoutDescriptor> {
        if self.name == name {
            return Some(self);
        }
        self.nested.iter().find_map(|nested| nested.find_type(name))
    }

    /// This layout's name followed by every nested layout name, depth first.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        for nested in &self.nested {
            names.extend(nested.type_names());
        }
        names
    }

    /// Element size and alignment of a field's type.
    pub fn element_layout(&self, field: &FieldDescriptor) -> (u64, Alignment) {
        match field.field_type() {
            FieldType::Scalar(scalar) => (scalar.size(), scalar.alignment()),
            FieldType::Nested(name) => self
                .nested_layout(name)
                .map(|nested| (nested.size(), nested.alignment()))
                .unwrap_or((0, Alignment::BYTE)),
        }
    }

    fn slot(&self, field: &FieldDescriptor) -> Slot {
        let (element_size, alignment) = self.element_layout(field);
        Slot {
            name: field.name().to_string(),
            type_name: field.field_type().type_name().to_string(),
            order: field.order(),
            element_size,
            count: field.element_count(),
            alignment,
        }
    }
}

/// A field waiting to be placed.
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: String,
    pub type_name: String,
    pub order: usize,
    pub element_size: u64,
    pub count: usize,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedField {
    pub name: String,
    pub type_name: String,
    pub order: usize,
    pub offset: u64,
    pub element_size: u64,
    pub count: usize,
    pub size: u64,
    pub alignment: Alignment,
    pub padding_before: u64,
}

impl PlacedField {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }
}

/// Offsets, total size and alignment of a struct under natural alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub name: String,
    pub size: u64,
    pub alignment: Alignment,
    pub fields: Vec<PlacedField>,
    pub trailing_padding: u64,
}

impl Placement {
    /// Each slot lands on the next multiple of its alignment; the total is
    /// rounded up to the strictest alignment seen. Fails with `SizeOverflow`
    /// instead of wrapping when an array is absurdly long.
    pub fn compute(name: &str, slots: Vec<Slot>) -> Result<Self, StructureError> {
        let overflow = |field: &str| StructureError::SizeOverflow {
            layout: name.to_string(),
            field: field.to_string(),
        };

        let mut offset = 0u64;
        let mut max_align = Alignment::BYTE;
        let mut fields = Vec::with_capacity(slots.len());

        for slot in slots {
            let padding = slot.alignment.padding_for(offset).ok_or_else(|| overflow(&slot.name))?;
            let start = offset + padding;
            let size = slot
                .element_size
                .checked_mul(slot.count as u64)
                .ok_or_else(|| overflow(&slot.name))?;
            let end = start.checked_add(size).ok_or_else(|| overflow(&slot.name))?;
            max_align = max_align.max(slot.alignment);
            fields.push(PlacedField {
                name: slot.name,
                type_name: slot.type_name,
                order: slot.order,
                offset: start,
                element_size: slot.element_size,
                count: slot.count,
                size,
                alignment: slot.alignment,
                padding_before: padding,
            });
            offset = end;
        }

        let last = fields.last().map(|field| field.name.as_str()).unwrap_or_default();
        let trailing_padding = max_align.padding_for(offset).ok_or_else(|| overflow(last))?;
        let size = offset + trailing_padding;
        log::trace!("placed {}: {} fields, {} bytes, align {}", name, fields.len(), size, max_align);

        Ok(Self {
            name: name.to_string(),
            size,
            alignment: max_align,
            fields,
            trailing_padding,
        })
    }

    pub fn field(&self, name: &str) -> Option<&PlacedField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn offsets(&self) -> IndexMap<String, u64> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.offset))
            .collect()
    }

    pub fn total_padding(&self) -> u64 {
        self.fields.iter().map(|f| f.padding_before).sum::<u64>() + self.trailing_padding
    }
}

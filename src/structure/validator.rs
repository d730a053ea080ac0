// Thu Oct 15 2026 - Alex

use crate::emit::MirrorDeclaration;
use crate::structure::{LayoutDescriptor, Placement, StructureError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Independently obtained facts about a foreign struct, usually the
/// compiler's `sizeof`/`offsetof` on the real platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLayout {
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsets: Option<IndexMap<String, u64>>,
}

impl ReferenceLayout {
    pub fn size_only(size: u64) -> Self {
        Self { size, offsets: None }
    }

    pub fn with_offsets<I, K>(size: u64, offsets: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        Self {
            size,
            offsets: Some(offsets.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Everything [`LayoutValidator::audit`] found wrong, not just the first.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub layout: String,
    pub computed_size: u64,
    pub reference_size: u64,
    #[serde(serialize_with = "serialize_issues")]
    pub issues: Vec<StructureError>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    /// First issue, as `validate` would have reported it.
    pub fn into_result(self) -> Result<(), StructureError> {
        match self.issues.into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }
}

fn serialize_issues<S: serde::Serializer>(issues: &[StructureError], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(issues.iter().map(|issue| issue.to_string()))
}

/// Compares computed natural-alignment layouts with references and with
/// emitted mirrors. Any drift is an error: a mirror that is one byte off
/// corrupts every field after it.
pub struct LayoutValidator;

impl LayoutValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn expected_size(&self, layout: &LayoutDescriptor) -> u64 {
        layout.size()
    }

    /// Fails with the size mismatch first, then the first offset mismatch in
    /// field order.
    pub fn validate(
        &self,
        layout: &LayoutDescriptor,
        reference: &ReferenceLayout,
    ) -> Result<Placement, StructureError> {
        let report = self.audit(layout, reference);
        report.into_result()?;
        log::debug!("{} validated at {} bytes", layout.name(), layout.size());
        Ok(layout.placement().clone())
    }

    pub fn audit(&self, layout: &LayoutDescriptor, reference: &ReferenceLayout) -> ValidationReport {
        let placement = layout.placement();
        let mut issues = Vec::new();

        if placement.size != reference.size {
            issues.push(StructureError::SizeMismatch {
                layout: layout.name().to_string(),
                computed: placement.size,
                reference: reference.size,
            });
        }

        if let Some(offsets) = &reference.offsets {
            for field in &placement.fields {
                if let Some(&expected) = offsets.get(&field.name) {
                    if expected != field.offset {
                        issues.push(StructureError::OffsetMismatch {
                            layout: layout.name().to_string(),
                            field: field.name.clone(),
                            computed: field.offset,
                            reference: expected,
                        });
                    }
                }
            }
            for name in offsets.keys() {
                if placement.field(name).is_none() {
                    issues.push(StructureError::FieldNotFound {
                        layout: layout.name().to_string(),
                        field: name.clone(),
                    });
                }
            }
        }

        for issue in &issues {
            log::warn!("{}", issue);
        }

        ValidationReport {
            layout: layout.name().to_string(),
            computed_size: placement.size,
            reference_size: reference.size,
            issues,
        }
    }

    /// Checks that an emitted mirror puts every source field at the source
    /// offset and ends up the source size, including nested declarations.
    /// A declaration with two members of one name is rejected outright.
    pub fn validate_mirror(
        &self,
        layout: &LayoutDescriptor,
        mirror: &MirrorDeclaration,
    ) -> Result<(), StructureError> {
        let mut names = HashSet::new();
        if let Some(dup) = mirror.fields().iter().find(|field| !names.insert(field.name.as_str())) {
            return Err(StructureError::DuplicateField {
                layout: mirror.name().to_string(),
                field: dup.name.clone(),
            });
        }

        for nested in layout.nested() {
            let dependency = mirror
                .dependencies()
                .iter()
                .find(|decl| decl.source_name() == nested.name())
                .ok_or_else(|| StructureError::FieldNotFound {
                    layout: mirror.name().to_string(),
                    field: nested.name().to_string(),
                })?;
            self.validate_mirror(nested, dependency)?;
        }

        let source = layout.placement();
        for field in &source.fields {
            let emitted = mirror.field_by_source(&field.name).ok_or_else(|| StructureError::FieldNotFound {
                layout: mirror.name().to_string(),
                field: field.name.clone(),
            })?;
            if emitted.offset != field.offset {
                return Err(StructureError::OffsetMismatch {
                    layout: layout.name().to_string(),
                    field: field.name.clone(),
                    computed: emitted.offset,
                    reference: field.offset,
                });
            }
        }

        if mirror.size() != source.size {
            return Err(StructureError::SizeMismatch {
                layout: layout.name().to_string(),
                computed: mirror.size(),
                reference: source.size,
            });
        }
        Ok(())
    }
}

impl Default for LayoutValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ForeignAbi;
    use crate::source::{SourceDecl, SourceField};
    use crate::structure::LayoutBuilder;

    fn sample() -> LayoutDescriptor {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new(
            "sample",
            vec![
                SourceField::scalar("flag", "uchar_t"),
                SourceField::scalar("count", "uint64_t"),
                SourceField::scalar("tag", "char").array(3),
            ],
        );
        LayoutBuilder::new(&catalog).build(&decl).unwrap()
    }

    #[test]
    fn test_self_consistency() {
        let layout = sample();
        let validator = LayoutValidator::new();
        let expected = validator.expected_size(&layout);
        assert_eq!(expected, 24);
        let placement = validator
            .validate(&layout, &ReferenceLayout::size_only(expected))
            .unwrap();
        assert_eq!(placement.field("count").unwrap().offset, 8);
    }

    #[test]
    fn test_size_mismatch() {
        let layout = sample();
        let err = LayoutValidator::new()
            .validate(&layout, &ReferenceLayout::size_only(20))
            .unwrap_err();
        assert_eq!(
            err,
            StructureError::SizeMismatch {
                layout: "sample".to_string(),
                computed: 24,
                reference: 20,
            }
        );
    }

    #[test]
    fn test_offset_mismatch_names_field() {
        let layout = sample();
        let reference = ReferenceLayout::with_offsets(24, [("flag", 0), ("count", 4), ("tag", 16)]);
        let err = LayoutValidator::new().validate(&layout, &reference).unwrap_err();
        assert!(matches!(err, StructureError::OffsetMismatch { ref field, computed: 8, reference: 4, .. } if field == "count"));
    }

    #[test]
    fn test_audit_collects_everything() {
        let layout = sample();
        let reference = ReferenceLayout::with_offsets(32, [("count", 4), ("ghost", 0)]);
        let report = LayoutValidator::new().audit(&layout, &reference);
        assert!(!report.passed());
        assert_eq!(report.issues.len(), 3);
        assert!(matches!(report.issues[0], StructureError::SizeMismatch { .. }));
        assert!(matches!(report.issues[2], StructureError::FieldNotFound { .. }));

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("ghost"));
    }

    #[test]
    fn test_mirror_with_duplicate_names_is_rejected() {
        use crate::catalog::DataModel;
        use crate::emit::{MirrorEmitter, TargetAbi, TargetLanguage};

        let layout = sample();
        let target = TargetAbi::new(TargetLanguage::Rust, DataModel::Lp64);
        let mut mirror = MirrorEmitter::new().emit(&layout, &target).unwrap();
        let validator = LayoutValidator::new();
        assert!(validator.validate_mirror(&layout, &mirror).is_ok());

        mirror.fields[2].name = "count".to_string();
        assert_eq!(
            validator.validate_mirror(&layout, &mirror).unwrap_err(),
            StructureError::DuplicateField {
                layout: "Sample".to_string(),
                field: "count".to_string(),
            }
        );
    }

    #[test]
    fn test_reference_from_json() {
        let reference = ReferenceLayout::from_json(r#"{"size": 24, "offsets": {"tag": 16}}"#).unwrap();
        assert!(LayoutValidator::new().validate(&sample(), &reference).is_ok());
    }
}

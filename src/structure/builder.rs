// Thu Oct 15 2026 - Alex

use crate::catalog::TypeCatalog;
use crate::source::{SourceDecl, SourceField, SourceType};
use crate::structure::{FieldDescriptor, FieldType, LayoutDescriptor, StructureError};
use std::collections::HashMap;

/// Turns a [`SourceDecl`] into a [`LayoutDescriptor`] against one catalog.
///
/// Every nested struct becomes a named sub-layout owned by its parent. A
/// nested struct with no name of its own needs a rename, keyed by the
/// dotted path of the field that holds it (`mik_timers`, `outer.inner`).
pub struct LayoutBuilder<'a> {
    catalog: &'a TypeCatalog,
    renames: HashMap<String, String>,
}

impl<'a> LayoutBuilder<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            renames: HashMap::new(),
        }
    }

    pub fn rename(mut self, field_path: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.renames.insert(field_path.into(), type_name.into());
        self
    }

    pub fn with_renames<I, K, V>(mut self, renames: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.renames
            .extend(renames.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build(&self, decl: &SourceDecl) -> Result<LayoutDescriptor, StructureError> {
        log::debug!("building layout {} ({} fields) for {}", decl.name, decl.fields.len(), self.catalog.abi());
        self.build_struct(&decl.name, &decl.fields, "")
    }

    fn build_struct(
        &self,
        name: &str,
        fields: &[SourceField],
        path: &str,
    ) -> Result<LayoutDescriptor, StructureError> {
        let mut layout = LayoutDescriptor::new(name)?;
        if fields.is_empty() {
            return Err(StructureError::UnsupportedConstruct {
                layout: name.to_string(),
                field: path.to_string(),
                reason: "struct has no fields".to_string(),
            });
        }

        for (order, field) in fields.iter().enumerate() {
            let field_path = if path.is_empty() {
                field.name.clone()
            } else {
                format!("{}.{}", path, field.name)
            };

            let field_type = match &field.ty {
                SourceType::Scalar { type_name } => {
                    let scalar = self.catalog.lookup(type_name).map_err(|_| StructureError::UnknownType {
                        layout: name.to_string(),
                        field: field.name.clone(),
                        type_name: type_name.clone(),
                    })?;
                    FieldType::Scalar(scalar.clone())
                }
                SourceType::Struct {
                    name: declared,
                    fields: nested_fields,
                } => {
                    let nested_name = self.nested_name(name, field, declared.as_deref(), &field_path)?;
                    let nested = self.build_struct(&nested_name, nested_fields, &field_path)?;
                    log::debug!(
                        "flattened {}.{} into struct {} ({} bytes)",
                        name,
                        field.name,
                        nested_name,
                        nested.size()
                    );
                    layout.add_nested(nested)?;
                    FieldType::Nested(nested_name)
                }
            };

            let mut descriptor = FieldDescriptor::new(field.name.clone(), field_type, order);
            if let Some(len) = field.array_len {
                descriptor = descriptor.with_array_len(len);
            }
            layout.push_field(descriptor)?;
        }

        Ok(layout)
    }

    /// A caller rename wins over the declared name so that clashing inner
    /// names can be disambiguated.
    fn nested_name(
        &self,
        layout: &str,
        field: &SourceField,
        declared: Option<&str>,
        field_path: &str,
    ) -> Result<String, StructureError> {
        if let Some(renamed) = self.renames.get(field_path) {
            return Ok(renamed.clone());
        }
        match declared {
            Some(declared) if !declared.trim().is_empty() => Ok(declared.to_string()),
            _ => Err(StructureError::UnsupportedConstruct {
                layout: layout.to_string(),
                field: field.name.clone(),
                reason: format!("anonymous struct needs a name (rename `{}`)", field_path),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ForeignAbi;

    fn timers_decl() -> SourceDecl {
        SourceDecl::new(
            "stats",
            vec![
                SourceField::scalar("vers", "uint32_t"),
                SourceField::anonymous(
                    "timers",
                    vec![
                        SourceField::scalar("srtt", "uint32_t"),
                        SourceField::scalar("deviate", "uint32_t"),
                        SourceField::scalar("rtxcur", "uint32_t"),
                    ],
                )
                .array(4),
                SourceField::scalar("server", "char").array(5),
            ],
        )
    }

    #[test]
    fn test_anonymous_struct_without_name_is_rejected() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let err = LayoutBuilder::new(&catalog).build(&timers_decl()).unwrap_err();
        match err {
            StructureError::UnsupportedConstruct { layout, field, .. } => {
                assert_eq!(layout, "stats");
                assert_eq!(field, "timers");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_rename_flattens_into_named_sublayout() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let layout = LayoutBuilder::new(&catalog)
            .rename("timers", "timer")
            .build(&timers_decl())
            .unwrap();

        assert_eq!(layout.nested().len(), 1);
        let timer = layout.nested_layout("timer").unwrap();
        assert_eq!(timer.size(), 12);

        let timers = layout.field("timers").unwrap();
        assert_eq!(timers.field_type(), &FieldType::Nested("timer".to_string()));
        assert_eq!(timers.array_len(), Some(4));
        assert_eq!(layout.placement().field("server").unwrap().offset, 52);
        assert_eq!(layout.size(), 60);
    }

    #[test]
    fn test_unknown_type_names_field_and_layout() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new("broken", vec![SourceField::scalar("when", "timespec_t")]);
        let err = LayoutBuilder::new(&catalog).build(&decl).unwrap_err();
        assert_eq!(
            err,
            StructureError::UnknownType {
                layout: "broken".to_string(),
                field: "when".to_string(),
                type_name: "timespec_t".to_string(),
            }
        );
    }

    #[test]
    fn test_deep_nesting_uses_dotted_paths() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new(
            "outer",
            vec![SourceField::named_struct(
                "a",
                "a_t",
                vec![SourceField::anonymous("b", vec![SourceField::scalar("x", "uint64_t")])],
            )],
        );

        assert!(LayoutBuilder::new(&catalog).rename("b", "b_t").build(&decl).is_err());

        let layout = LayoutBuilder::new(&catalog).rename("a.b", "b_t").build(&decl).unwrap();
        assert_eq!(layout.type_names(), vec!["outer", "a_t", "b_t"]);
        assert_eq!(layout.alignment().as_usize(), 8);
    }

    #[test]
    fn test_duplicate_nested_names_are_rejected() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new(
            "outer",
            vec![
                SourceField::named_struct("a", "pair", vec![SourceField::scalar("x", "int")]),
                SourceField::named_struct("b", "pair", vec![SourceField::scalar("y", "int")]),
            ],
        );
        assert!(matches!(
            LayoutBuilder::new(&catalog).build(&decl),
            Err(StructureError::DuplicateType(ref name)) if name == "pair"
        ));

        let layout = LayoutBuilder::new(&catalog).rename("b", "pair_b").build(&decl).unwrap();
        assert_eq!(layout.nested().len(), 2);
    }

    #[test]
    fn test_repeated_named_struct_is_shared() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let timespec = || {
            vec![
                SourceField::scalar("tv_sec", "long"),
                SourceField::scalar("tv_nsec", "long"),
            ]
        };
        let decl = SourceDecl::new(
            "times",
            vec![
                SourceField::named_struct("start", "timespec", timespec()),
                SourceField::named_struct("end", "timespec", timespec()),
            ],
        );
        let layout = LayoutBuilder::new(&catalog).build(&decl).unwrap();
        assert_eq!(layout.nested().len(), 1);
        assert_eq!(layout.type_names(), vec!["times", "timespec"]);
        assert_eq!(layout.placement().field("end").unwrap().offset, 16);
        assert_eq!(layout.size(), 32);
    }

    #[test]
    fn test_huge_array_overflows_instead_of_wrapping() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::from_json(
            r#"{"name":"big","fields":[{"name":"a","kind":"scalar","type_name":"uint64_t","array_len":2305843009213693952}]}"#,
        )
        .unwrap();
        let err = LayoutBuilder::new(&catalog).build(&decl).unwrap_err();
        assert_eq!(
            err,
            StructureError::SizeOverflow {
                layout: "big".to_string(),
                field: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_struct_is_unsupported() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new("nothing", Vec::new());
        assert!(matches!(
            LayoutBuilder::new(&catalog).build(&decl),
            Err(StructureError::UnsupportedConstruct { .. })
        ));
    }
}

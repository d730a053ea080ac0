// Fri Oct 16 2026 - Alex

use crate::emit::{MirrorDeclaration, MirrorField, MirrorType, TargetAbi, TargetLanguage};
use crate::structure::{FieldType, LayoutDescriptor, Placement, ScalarKind, Slot, StructureError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::HashSet;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl",
    "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "trait",
    "true", "type", "unsafe", "use", "where", "while", "async", "await", "dyn",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitOptions {
    /// Name the bytes the target compiler would pad anyway (`pad0 [3]byte`).
    pub explicit_padding: bool,
    /// Drop a `prefix_` every field shares (`mik_proto` becomes `proto`).
    pub strip_common_prefix: bool,
}

impl EmitOptions {
    /// cgo-style output for Go, verbatim names for Rust and C.
    pub fn for_language(language: TargetLanguage) -> Self {
        match language {
            TargetLanguage::Go => Self {
                explicit_padding: true,
                strip_common_prefix: true,
            },
            TargetLanguage::Rust | TargetLanguage::C => Self {
                explicit_padding: false,
                strip_common_prefix: false,
            },
        }
    }
}

pub struct MirrorEmitter {
    options: Option<EmitOptions>,
}

impl MirrorEmitter {
    pub fn new() -> Self {
        Self { options: None }
    }

    pub fn with_options(options: EmitOptions) -> Self {
        Self { options: Some(options) }
    }

    /// Renders `layout` for `target`. Fields keep their source order; a
    /// field with no target type of equal size and at least equal alignment
    /// fails the whole emission.
    pub fn emit(&self, layout: &LayoutDescriptor, target: &TargetAbi) -> Result<MirrorDeclaration, StructureError> {
        let options = self
            .options
            .unwrap_or_else(|| EmitOptions::for_language(target.language()));
        let mirror = self.emit_with(layout, target, &options)?;
        check_declaration_names(mirror.source_name(), &mirror, &mut HashMap::new())?;
        Ok(mirror)
    }

    fn emit_with(
        &self,
        layout: &LayoutDescriptor,
        target: &TargetAbi,
        options: &EmitOptions,
    ) -> Result<MirrorDeclaration, StructureError> {
        let language = target.language();

        let mut dependencies = Vec::with_capacity(layout.nested().len());
        let mut records: HashMap<&str, usize> = HashMap::new();
        for nested in layout.nested() {
            records.insert(nested.name(), dependencies.len());
            dependencies.push(self.emit_with(nested, target, options)?);
        }

        let names = field_names(layout, language, options.strip_common_prefix);
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (field, name) in layout.fields().iter().zip(&names) {
            if let Some(first) = seen.insert(name.as_str(), field.name()) {
                return Err(StructureError::UnsupportedConstruct {
                    layout: layout.name().to_string(),
                    field: field.name().to_string(),
                    reason: format!("`{}` and `{}` both map to {} field `{}`", first, field.name(), language, name),
                });
            }
        }

        let mut typed = Vec::with_capacity(layout.fields().len());
        let mut slots = Vec::with_capacity(layout.fields().len());
        for (field, name) in layout.fields().iter().zip(names) {
            let (ty, size, alignment) = match field.field_type() {
                FieldType::Scalar(scalar) => {
                    let chosen = target.select(scalar).ok_or_else(|| StructureError::NoCompatibleType {
                        layout: layout.name().to_string(),
                        field: field.name().to_string(),
                        language: language.to_string(),
                        size: scalar.size(),
                        alignment: scalar.alignment().as_usize(),
                    })?;
                    if chosen.kind() != scalar.kind() {
                        log::log!(
                            fallback_level(scalar.kind()),
                            "{}.{}: {} {} carried as {} {}",
                            layout.name(),
                            field.name(),
                            scalar.kind(),
                            scalar.name(),
                            chosen.kind(),
                            chosen.name()
                        );
                    }
                    (MirrorType::Scalar(chosen.clone()), chosen.size(), chosen.alignment())
                }
                FieldType::Nested(nested) => {
                    let index = records.get(nested.as_str()).copied().ok_or_else(|| {
                        StructureError::UnsupportedConstruct {
                            layout: layout.name().to_string(),
                            field: field.name().to_string(),
                            reason: format!("nested type `{}` was not emitted", nested),
                        }
                    })?;
                    let record = &dependencies[index];
                    (MirrorType::Record(record.name().to_string()), record.size(), record.alignment())
                }
            };
            slots.push(Slot {
                name: name.clone(),
                type_name: field.field_type().type_name().to_string(),
                order: field.order(),
                element_size: size,
                count: field.element_count(),
                alignment,
            });
            typed.push((field, name, ty));
        }

        let placement = Placement::compute(layout.name(), slots)?;
        let mut fields = Vec::with_capacity(typed.len());
        let mut pads = 0usize;
        let taken: HashSet<String> = typed.iter().map(|(_, name, _)| name.clone()).collect();

        for ((field, name, ty), placed) in typed.into_iter().zip(&placement.fields) {
            if options.explicit_padding && placed.padding_before > 0 {
                let start = placed.offset - placed.padding_before;
                fields.push(padding_field(language, target, &taken, &mut pads, start, placed.padding_before));
            }
            fields.push(MirrorField {
                name,
                source_name: Some(field.name().to_string()),
                ty,
                array_len: field.array_len(),
                offset: placed.offset,
                size: placed.size,
            });
        }
        if options.explicit_padding && placement.trailing_padding > 0 {
            let start = placement.size - placement.trailing_padding;
            fields.push(padding_field(language, target, &taken, &mut pads, start, placement.trailing_padding));
        }

        log::debug!(
            "emitted {} {} for {} ({} bytes, {} fields)",
            language,
            type_name(layout.name(), language),
            layout.name(),
            placement.size,
            fields.len()
        );

        Ok(MirrorDeclaration {
            language,
            name: type_name(layout.name(), language),
            source_name: layout.name().to_string(),
            abi: format!("{}/{}", language, target.data_model()),
            fields,
            dependencies,
            size: placement.size,
            alignment: placement.alignment,
        })
    }
}

impl Default for MirrorEmitter {
    fn default() -> Self {
        Self::new()
    }
}

fn padding_field(
    language: TargetLanguage,
    target: &TargetAbi,
    taken: &HashSet<String>,
    counter: &mut usize,
    offset: u64,
    len: u64,
) -> MirrorField {
    let base = match language {
        TargetLanguage::Go => "pad",
        TargetLanguage::Rust | TargetLanguage::C => "_pad",
    };
    let mut name = format!("{}{}", base, counter);
    while taken.contains(&name) {
        name.insert(0, '_');
    }
    *counter += 1;
    MirrorField {
        name,
        source_name: None,
        ty: MirrorType::Padding(target.byte_type().to_string()),
        array_len: Some(len as usize),
        offset,
        size: len,
    }
}

/// C `char` carried as a signed byte is what cgo does too, so only other
/// kind changes are worth a warning.
fn fallback_level(source: ScalarKind) -> log::Level {
    match source {
        ScalarKind::Char => log::Level::Debug,
        _ => log::Level::Warn,
    }
}

/// Two source structs must not end up under one target declaration name.
/// The same struct reached twice is fine; it renders once.
fn check_declaration_names<'a>(
    root: &str,
    mirror: &'a MirrorDeclaration,
    seen: &mut HashMap<&'a str, &'a str>,
) -> Result<(), StructureError> {
    for dependency in mirror.dependencies() {
        check_declaration_names(root, dependency, seen)?;
    }
    match seen.insert(mirror.name(), mirror.source_name()) {
        Some(other) if other != mirror.source_name() => Err(StructureError::UnsupportedConstruct {
            layout: root.to_string(),
            field: mirror.source_name().to_string(),
            reason: format!(
                "structs `{}` and `{}` both map to {} type `{}`",
                other,
                mirror.source_name(),
                mirror.language(),
                mirror.name()
            ),
        }),
        _ => Ok(()),
    }
}

/// Declaration name in the target language. Rust and Go use CamelCase.
pub fn type_name(source: &str, language: TargetLanguage) -> String {
    let ident = to_identifier(source);
    match language {
        TargetLanguage::C => ident,
        TargetLanguage::Rust | TargetLanguage::Go => ident
            .split('_')
            .filter(|part| !part.is_empty())
            .map(capitalize)
            .collect::<String>(),
    }
}

fn field_names(layout: &LayoutDescriptor, language: TargetLanguage, strip_prefix: bool) -> Vec<String> {
    let originals: Vec<String> = layout.fields().iter().map(|f| to_identifier(f.name())).collect();

    let stripped = if strip_prefix {
        strip_common_prefix(&originals)
    } else {
        None
    };
    let base = stripped.unwrap_or(originals);

    base.into_iter()
        .map(|name| match language {
            // exported, the way cgo -godefs writes them
            TargetLanguage::Go => capitalize(&name),
            TargetLanguage::Rust if RUST_KEYWORDS.contains(&name.as_str()) => format!("r#{}", name),
            TargetLanguage::Rust | TargetLanguage::C => name,
        })
        .collect()
}

/// Strips `xxx_` when every name starts with it and what remains is still
/// a set of distinct identifiers.
fn strip_common_prefix(names: &[String]) -> Option<Vec<String>> {
    if names.len() < 2 {
        return None;
    }
    let first = &names[0];
    let cut = first.find('_')? + 1;
    let prefix = &first[..cut];

    let stripped: Vec<String> = names
        .iter()
        .map(|name| name.strip_prefix(prefix).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;

    let unique: HashSet<&String> = stripped.iter().collect();
    let valid = stripped
        .iter()
        .all(|name| IDENTIFIER.is_match(name) && !name.starts_with('_'));
    if valid && unique.len() == stripped.len() {
        Some(stripped)
    } else {
        None
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Maps any foreign name to something every target accepts as an
/// identifier.
pub fn to_identifier(s: &str) -> String {
    if IDENTIFIER.is_match(s) {
        return s.to_string();
    }

    let mut result = String::new();
    let mut prev_underscore = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_underscore = false;
        } else if !prev_underscore {
            result.push('_');
            prev_underscore = true;
        }
    }
    if result.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(true) {
        result.insert(0, '_');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DataModel, ForeignAbi};
    use crate::source::{SourceDecl, SourceField};
    use crate::structure::{LayoutBuilder, LayoutValidator};

    fn layout(abi: ForeignAbi) -> LayoutDescriptor {
        let catalog = abi.catalog();
        let decl = SourceDecl::new(
            "io_sample",
            vec![
                SourceField::scalar("io_flag", "uchar_t"),
                SourceField::scalar("io_bytes", "uint64_t"),
                SourceField::anonymous("io_timer", vec![SourceField::scalar("srtt", "uint32_t")]).array(2),
                SourceField::scalar("io_name", "char").array(3),
            ],
        );
        LayoutBuilder::new(&catalog).rename("io_timer", "io_timer_t").build(&decl).unwrap()
    }

    #[test]
    fn test_field_order_preserved() {
        let layout = layout(ForeignAbi::SolarisAmd64);
        for language in TargetLanguage::all() {
            let target = TargetAbi::new(*language, DataModel::Lp64);
            let mirror = MirrorEmitter::new().emit(&layout, &target).unwrap();
            let source: Vec<&str> = layout.fields().iter().map(|f| f.name()).collect();
            assert_eq!(mirror.source_order(), source, "{}", language);
        }
    }

    #[test]
    fn test_go_padding_and_prefix() {
        let layout = layout(ForeignAbi::SolarisAmd64);
        let target = TargetAbi::new(TargetLanguage::Go, DataModel::Lp64);
        let mirror = MirrorEmitter::new().emit(&layout, &target).unwrap();

        let names: Vec<&str> = mirror.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Flag", "pad0", "Bytes", "Timer", "Name", "pad1"]);
        assert_eq!(mirror.fields()[1].array_len, Some(7));
        assert_eq!(mirror.fields()[5].array_len, Some(5));
        assert_eq!(mirror.size(), 32);
        assert_eq!(mirror.name(), "IoSample");
        assert_eq!(mirror.dependencies()[0].name(), "IoTimerT");
        assert!(LayoutValidator::new().validate_mirror(&layout, &mirror).is_ok());
    }

    #[test]
    fn test_rust_keeps_names() {
        let layout = layout(ForeignAbi::SolarisAmd64);
        let target = TargetAbi::new(TargetLanguage::Rust, DataModel::Lp64);
        let mirror = MirrorEmitter::new().emit(&layout, &target).unwrap();
        assert_eq!(mirror.fields().len(), 4);
        assert_eq!(mirror.fields()[0].name, "io_flag");
        assert!(matches!(&mirror.fields()[3].ty, MirrorType::Scalar(ty) if ty.name() == "core::ffi::c_char"));
        assert_eq!(mirror.field_by_source("io_timer").unwrap().ty, MirrorType::Record("IoTimerT".to_string()));
    }

    #[test]
    fn test_no_compatible_type() {
        let layout = layout(ForeignAbi::SolarisAmd64);
        let target = TargetAbi::new(TargetLanguage::C, DataModel::Ilp32);
        let err = MirrorEmitter::new().emit(&layout, &target).unwrap_err();
        assert!(matches!(err, StructureError::NoCompatibleType { ref field, size: 8, alignment: 8, .. } if field == "io_bytes"));
    }

    #[test]
    fn test_stricter_target_alignment_is_caught() {
        let layout = layout(ForeignAbi::SolarisI386);
        assert_eq!(layout.placement().field("io_bytes").unwrap().offset, 4);

        let target = TargetAbi::new(TargetLanguage::C, DataModel::Lp64);
        let mirror = MirrorEmitter::new().emit(&layout, &target).unwrap();
        assert_eq!(mirror.field_by_source("io_bytes").unwrap().offset, 8);

        let err = LayoutValidator::new().validate_mirror(&layout, &mirror).unwrap_err();
        assert!(matches!(err, StructureError::OffsetMismatch { computed: 8, reference: 4, .. }));
    }

    #[test]
    fn test_strip_prefix_requires_agreement() {
        let names = vec!["mik_a".to_string(), "mik_b".to_string()];
        assert_eq!(strip_common_prefix(&names), Some(vec!["a".to_string(), "b".to_string()]));

        let mixed = vec!["mik_a".to_string(), "other".to_string()];
        assert_eq!(strip_common_prefix(&mixed), None);

        let digits = vec!["v_1".to_string(), "v_2".to_string()];
        assert_eq!(strip_common_prefix(&digits), None);
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(to_identifier("mik_proto"), "mik_proto");
        assert_eq!(to_identifier("my-field"), "my_field");
        assert_eq!(to_identifier("123start"), "_123start");
        assert_eq!(type_name("mntinfo_kstat", TargetLanguage::Rust), "MntinfoKstat");
        assert_eq!(type_name("mntinfo_kstat", TargetLanguage::C), "mntinfo_kstat");
    }

    #[test]
    fn test_colliding_field_identifiers_are_rejected() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new(
            "clash",
            vec![SourceField::scalar("a-b", "int"), SourceField::scalar("a_b", "int")],
        );
        let layout = LayoutBuilder::new(&catalog).build(&decl).unwrap();

        let target = TargetAbi::new(TargetLanguage::Rust, DataModel::Lp64);
        let err = MirrorEmitter::new().emit(&layout, &target).unwrap_err();
        match err {
            StructureError::UnsupportedConstruct { layout, field, reason } => {
                assert_eq!(layout, "clash");
                assert_eq!(field, "a_b");
                assert!(reason.contains("`a-b` and `a_b`"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_colliding_declaration_names_are_rejected() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new(
            "outer",
            vec![
                SourceField::named_struct("a", "io-timer", vec![SourceField::scalar("x", "int")]),
                SourceField::named_struct("b", "io_timer", vec![SourceField::scalar("y", "int")]),
            ],
        );
        let layout = LayoutBuilder::new(&catalog).build(&decl).unwrap();

        let c = TargetAbi::new(TargetLanguage::C, DataModel::Lp64);
        assert!(matches!(
            MirrorEmitter::new().emit(&layout, &c),
            Err(StructureError::UnsupportedConstruct { ref reason, .. }) if reason.contains("io_timer")
        ));
    }

    #[test]
    fn test_shared_nested_declaration_emits() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let timespec = || vec![SourceField::scalar("tv_sec", "long"), SourceField::scalar("tv_nsec", "long")];
        let decl = SourceDecl::new(
            "times",
            vec![
                SourceField::named_struct("start", "timespec", timespec()),
                SourceField::named_struct("end", "timespec", timespec()),
            ],
        );
        let layout = LayoutBuilder::new(&catalog).build(&decl).unwrap();
        let target = TargetAbi::new(TargetLanguage::Go, DataModel::Lp64);
        let mirror = MirrorEmitter::new().emit(&layout, &target).unwrap();
        assert_eq!(mirror.dependencies().len(), 1);
        assert_eq!(mirror.size(), 32);
    }

    #[test]
    fn test_char_fallback_is_not_a_warning() {
        assert_eq!(fallback_level(ScalarKind::Char), log::Level::Debug);
        assert_eq!(fallback_level(ScalarKind::Unsigned), log::Level::Warn);

        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let go = TargetAbi::new(TargetLanguage::Go, DataModel::Lp64);
        let chosen = go.select(catalog.lookup("char").unwrap()).unwrap();
        assert_eq!(chosen.kind(), ScalarKind::Signed);
    }

    #[test]
    fn test_keywords_are_escaped() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let decl = SourceDecl::new("kw", vec![SourceField::scalar("type", "int")]);
        let layout = LayoutBuilder::new(&catalog).build(&decl).unwrap();

        let rust = MirrorEmitter::new()
            .emit(&layout, &TargetAbi::new(TargetLanguage::Rust, DataModel::Lp64))
            .unwrap();
        assert_eq!(rust.fields()[0].name, "r#type");
    }
}

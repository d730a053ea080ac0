// Fri Oct 16 2026 - Alex

use crate::emit::{MirrorDeclaration, MirrorField, MirrorType, TargetLanguage};
use itertools::Itertools;

/// Nested declarations first, depth first, then `decl` itself.
pub fn render_all(decl: &MirrorDeclaration) -> String {
    let mut ordered = Vec::new();
    collect(decl, &mut ordered);
    ordered.into_iter().map(render_declaration).join("\n")
}

/// Dependencies first; a struct used from several places renders once.
fn collect<'a>(decl: &'a MirrorDeclaration, out: &mut Vec<&'a MirrorDeclaration>) {
    for dependency in decl.dependencies() {
        collect(dependency, out);
    }
    if out.iter().all(|seen| seen.name() != decl.name()) {
        out.push(decl);
    }
}

pub fn render_declaration(decl: &MirrorDeclaration) -> String {
    match decl.language() {
        TargetLanguage::Rust => to_rust(decl),
        TargetLanguage::Go => to_go(decl),
        TargetLanguage::C => to_c(decl),
    }
}

fn element_name(field: &MirrorField, language: TargetLanguage) -> String {
    match &field.ty {
        MirrorType::Scalar(ty) => ty.name().to_string(),
        MirrorType::Padding(byte) => byte.clone(),
        MirrorType::Record(name) => match language {
            TargetLanguage::C => format!("struct {}", name),
            TargetLanguage::Rust | TargetLanguage::Go => name.clone(),
        },
    }
}

fn to_rust(decl: &MirrorDeclaration) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "/// Mirror of `struct {}` ({}, {} bytes).\n",
        decl.source_name(),
        decl.abi(),
        decl.size()
    ));
    out.push_str("#[repr(C)]\n");
    out.push_str("#[derive(Debug, Clone, Copy)]\n");
    out.push_str(&format!("pub struct {} {{\n", decl.name()));
    for field in decl.fields() {
        let element = element_name(field, TargetLanguage::Rust);
        let ty = match field.array_len {
            Some(len) => format!("[{}; {}]", element, len),
            None => element,
        };
        let vis = if field.is_padding() { "" } else { "pub " };
        out.push_str(&format!("    {}{}: {},\n", vis, field.name, ty));
    }
    out.push_str("}\n");
    out
}

fn to_go(decl: &MirrorDeclaration) -> String {
    let width = decl.fields().iter().map(|f| f.name.len()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "// {} mirrors struct {} ({}, {} bytes).\n",
        decl.name(),
        decl.source_name(),
        decl.abi(),
        decl.size()
    ));
    out.push_str(&format!("type {} struct {{\n", decl.name()));
    for field in decl.fields() {
        let element = element_name(field, TargetLanguage::Go);
        let ty = match field.array_len {
            Some(len) => format!("[{}]{}", len, element),
            None => element,
        };
        out.push_str(&format!("\t{:<width$} {}\n", field.name, ty, width = width));
    }
    out.push_str("}\n");
    out
}

fn to_c(decl: &MirrorDeclaration) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "/* mirror of struct {} ({}, {} bytes) */\n",
        decl.source_name(),
        decl.abi(),
        decl.size()
    ));
    out.push_str(&format!("struct {} {{\n", decl.name()));
    for field in decl.fields() {
        let element = element_name(field, TargetLanguage::C);
        match field.array_len {
            Some(len) => out.push_str(&format!("\t{} {}[{}];\n", element, field.name, len)),
            None => out.push_str(&format!("\t{} {};\n", element, field.name)),
        }
    }
    out.push_str("};\n");
    out
}

// Fri Oct 16 2026 - Alex

use crate::catalog::TypeCatalog;
use crate::decode::Record;
use crate::kstat::KstatLayout;
use crate::structure::{LayoutDescriptor, SerializableLayout, ValidationReport};
use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

pub struct ReportGenerator {
    format: ReportFormat,
    show_padding: bool,
}

#[derive(Serialize)]
struct CatalogEntry<'a> {
    name: &'a str,
    size: u64,
    alignment: usize,
    kind: String,
}

#[derive(Serialize)]
struct KstatEntry<'a> {
    name: &'a str,
    kstat: &'a str,
    fields: usize,
}

impl ReportGenerator {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            show_padding: true,
        }
    }

    pub fn with_padding(mut self, show: bool) -> Self {
        self.show_padding = show;
        self
    }

    pub fn layout(&self, layout: &LayoutDescriptor) -> serde_json::Result<String> {
        match self.format {
            ReportFormat::Json => SerializableLayout::from(layout).to_json(),
            ReportFormat::Text => Ok(self.layout_text(layout)),
        }
    }

    fn layout_text(&self, layout: &LayoutDescriptor) -> String {
        let mut out = String::new();
        for nested in layout.nested() {
            out.push_str(&self.layout_text(nested));
            out.push('\n');
        }

        let placement = layout.placement();
        out.push_str(&format!(
            "{} {} ({} bytes, align {})\n",
            "struct".bold(),
            layout.name().bold(),
            placement.size,
            placement.alignment
        ));
        for (field, placed) in layout.fields().iter().zip(&placement.fields) {
            if self.show_padding && placed.padding_before > 0 {
                out.push_str(&format!(
                    "  {:>#6x}  {}\n",
                    placed.offset - placed.padding_before,
                    format!("<{} bytes padding>", placed.padding_before).dimmed()
                ));
            }
            let ty = match field.array_len() {
                Some(len) => format!("{}[{}]", field.field_type().type_name(), len),
                None => field.field_type().type_name().to_string(),
            };
            out.push_str(&format!(
                "  {:>#6x}  {:<24} {:<20} {:>4}\n",
                placed.offset,
                field.name(),
                ty.cyan(),
                placed.size
            ));
        }
        if self.show_padding && placement.trailing_padding > 0 {
            out.push_str(&format!(
                "  {:>#6x}  {}\n",
                placement.size - placement.trailing_padding,
                format!("<{} bytes trailing padding>", placement.trailing_padding).dimmed()
            ));
        }
        out
    }

    pub fn validation(&self, report: &ValidationReport) -> serde_json::Result<String> {
        match self.format {
            ReportFormat::Json => serde_json::to_string_pretty(report),
            ReportFormat::Text => {
                let mut out = String::new();
                if report.passed() {
                    out.push_str(&format!(
                        "{} {}: {} bytes\n",
                        "PASS".green().bold(),
                        report.layout,
                        report.computed_size
                    ));
                } else {
                    out.push_str(&format!(
                        "{} {}: computed {} bytes, reference {} bytes\n",
                        "FAIL".red().bold(),
                        report.layout,
                        report.computed_size,
                        report.reference_size
                    ));
                    for issue in &report.issues {
                        out.push_str(&format!("  - {}\n", issue));
                    }
                }
                Ok(out)
            }
        }
    }

    pub fn catalog(&self, catalog: &TypeCatalog) -> serde_json::Result<String> {
        match self.format {
            ReportFormat::Json => {
                let entries: Vec<CatalogEntry> = catalog
                    .iter()
                    .map(|ty| CatalogEntry {
                        name: ty.name(),
                        size: ty.size(),
                        alignment: ty.alignment().as_usize(),
                        kind: ty.kind().to_string(),
                    })
                    .collect();
                serde_json::to_string_pretty(&entries)
            }
            ReportFormat::Text => {
                let mut out = format!(
                    "{} ({}, {} endian)\n",
                    catalog.abi().bold(),
                    catalog.data_model(),
                    catalog.endian()
                );
                for ty in catalog.iter() {
                    out.push_str(&format!(
                        "  {:<14} {:>2} bytes  align {:<2} {}\n",
                        ty.name(),
                        ty.size(),
                        ty.alignment(),
                        ty.kind()
                    ));
                }
                Ok(out)
            }
        }
    }

    pub fn kstats(&self, kstats: &[KstatLayout]) -> serde_json::Result<String> {
        match self.format {
            ReportFormat::Json => {
                let entries: Vec<KstatEntry> = kstats
                    .iter()
                    .map(|k| KstatEntry {
                        name: k.name(),
                        kstat: k.kstat,
                        fields: k.decl.fields.len(),
                    })
                    .collect();
                serde_json::to_string_pretty(&entries)
            }
            ReportFormat::Text => Ok(kstats
                .iter()
                .map(|k| format!("  {:<16} {}\n", k.name(), k.kstat.dimmed()))
                .collect()),
        }
    }

    pub fn records(&self, records: &[Record]) -> serde_json::Result<String> {
        match self.format {
            ReportFormat::Json => match records {
                [single] => single.to_json(),
                _ => serde_json::to_string_pretty(records),
            },
            ReportFormat::Text => Ok(records
                .iter()
                .map(|record| {
                    record
                        .iter()
                        .map(|(name, value)| format!("{:<20} {}\n", name, value))
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, text: &str, path: P) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ForeignAbi;
    use crate::kstat::{builtin_layouts, mntinfo_kstat};
    use crate::structure::{LayoutValidator, ReferenceLayout};

    fn plain() -> ReportGenerator {
        colored::control::set_override(false);
        ReportGenerator::new(ReportFormat::Text)
    }

    #[test]
    fn test_layout_text_shows_trailing_padding() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let layout = mntinfo_kstat().build(&catalog).unwrap();
        let text = plain().layout(&layout).unwrap();
        assert!(text.contains("struct mnti_timer (12 bytes, align 4)"));
        assert!(text.contains("struct mntinfo_kstat (492 bytes, align 4)"));
        assert!(text.contains("<3 bytes trailing padding>"));
        assert!(text.contains("mik_curserver"));
    }

    #[test]
    fn test_layout_json() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let layout = mntinfo_kstat().build(&catalog).unwrap();
        let json = ReportGenerator::new(ReportFormat::Json).layout(&layout).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["size"], 492);
        assert_eq!(value["fields"][16]["offset"], 232);
        assert_eq!(value["nested"][0]["name"], "mnti_timer");
    }

    #[test]
    fn test_validation_failure_lists_issues() {
        let catalog = ForeignAbi::SolarisAmd64.catalog();
        let layout = mntinfo_kstat().build(&catalog).unwrap();
        let report = LayoutValidator::new().audit(&layout, &ReferenceLayout::size_only(124));
        let text = plain().validation(&report).unwrap();
        assert!(text.starts_with("FAIL mntinfo_kstat: computed 492 bytes, reference 124 bytes"));
        assert!(text.contains("  - "));

        let json = ReportGenerator::new(ReportFormat::Json).validation(&report).unwrap();
        assert!(json.contains("\"issues\""));
    }

    #[test]
    fn test_catalog_and_kstats() {
        let catalog = ForeignAbi::SolarisI386.catalog();
        let text = plain().catalog(&catalog).unwrap();
        assert!(text.contains("uint64_t"));

        let listing = plain().kstats(&builtin_layouts()).unwrap();
        assert!(listing.contains("unix:0:vminfo"));
    }
}

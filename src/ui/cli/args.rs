// Fri Oct 16 2026 - Alex

use crate::catalog::{DataModel, ForeignAbi};
use crate::emit::TargetLanguage;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "layout-mirror")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Mirror foreign C struct layouts into Rust, Go and C", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Foreign ABI whose type catalog applies (overrides the config file).
    #[arg(short, long, global = true)]
    pub abi: Option<ForeignAbi>,

    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,

    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Built-in kstat layouts, or the type catalog with --types.
    List(ListArgs),
    /// Placement table of a layout.
    Show(ShowArgs),
    Emit(EmitArgs),
    Validate(ValidateArgs),
    /// Decode a raw data blob through a layout.
    Decode(DecodeArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub types: bool,
}

/// Where the layout comes from: a built-in kstat or a JSON declaration.
#[derive(Parser, Debug)]
pub struct LayoutSource {
    #[arg(long, conflicts_with = "decl")]
    pub layout: Option<String>,

    #[arg(long)]
    pub decl: Option<PathBuf>,

    /// Name for an anonymous nested struct, as FIELD_PATH=NAME.
    #[arg(long = "rename", value_parser = parse_rename)]
    pub renames: Vec<(String, String)>,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: LayoutSource,

    #[arg(long)]
    pub no_padding: bool,
}

#[derive(Parser, Debug)]
pub struct EmitArgs {
    #[command(flatten)]
    pub source: LayoutSource,

    #[arg(short = 'L', long)]
    pub language: Option<TargetLanguage>,

    #[arg(long)]
    pub explicit_padding: Option<bool>,

    #[arg(long)]
    pub strip_prefix: Option<bool>,

    /// Target type tables to emit with (ilp32 or lp64). Defaults to the
    /// foreign ABI's own data model.
    #[arg(long)]
    pub data_model: Option<DataModel>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: LayoutSource,

    /// Expected `sizeof`, decimal or 0x hex.
    #[arg(long, value_parser = parse_size, conflicts_with = "reference")]
    pub size: Option<u64>,

    /// JSON file with `size` and optional `offsets`.
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Also emit a mirror in this language and check it against the layout.
    #[arg(short = 'L', long)]
    pub language: Option<TargetLanguage>,
}

#[derive(Parser, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub source: LayoutSource,

    #[arg(short, long)]
    pub input: PathBuf,

    /// Input holds several records back to back.
    #[arg(long)]
    pub records: bool,
}

impl LayoutSource {
    pub fn validate(&self) -> Result<(), String> {
        if self.layout.is_none() && self.decl.is_none() {
            return Err("Either --layout or --decl must be specified".to_string());
        }
        if let Some(decl) = &self.decl {
            if !decl.exists() {
                return Err(format!("Declaration file does not exist: {:?}", decl));
            }
        }
        Ok(())
    }
}

impl DecodeArgs {
    pub fn validate(&self) -> Result<(), String> {
        self.source.validate()?;
        if !self.input.exists() {
            return Err(format!("Input file does not exist: {:?}", self.input));
        }
        Ok(())
    }
}

fn parse_rename(s: &str) -> Result<(String, String), String> {
    let (path, name) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD_PATH=NAME, got `{}`", s))?;
    if path.is_empty() || name.is_empty() {
        return Err(format!("expected FIELD_PATH=NAME, got `{}`", s));
    }
    Ok((path.to_string(), name.to_string()))
}

fn parse_size(s: &str) -> Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid size `{}`: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename() {
        assert_eq!(
            parse_rename("mik_timers=mnti_timer").unwrap(),
            ("mik_timers".to_string(), "mnti_timer".to_string())
        );
        assert!(parse_rename("mik_timers").is_err());
        assert!(parse_rename("=x").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("0x1ec").unwrap(), 492);
        assert_eq!(parse_size("124").unwrap(), 124);
        assert!(parse_size("big").is_err());
    }

    #[test]
    fn test_parse_validate_command() {
        let args = Args::try_parse_from([
            "layout-mirror",
            "validate",
            "--layout",
            "mntinfo_kstat",
            "--size",
            "0x1ec",
            "--abi",
            "solaris-i386",
            "-L",
            "go",
        ])
        .unwrap();
        assert_eq!(args.abi, Some(ForeignAbi::SolarisI386));
        match args.command {
            Command::Validate(validate) => {
                assert_eq!(validate.size, Some(492));
                assert_eq!(validate.language, Some(TargetLanguage::Go));
                assert_eq!(validate.source.layout.as_deref(), Some("mntinfo_kstat"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_emit_data_model() {
        let args = Args::try_parse_from(["layout-mirror", "emit", "--layout", "var", "--data-model", "lp64"]).unwrap();
        let Command::Emit(emit) = args.command else {
            panic!("expected emit");
        };
        assert_eq!(emit.data_model, Some(DataModel::Lp64));
        assert!(Args::try_parse_from(["layout-mirror", "emit", "--layout", "var", "--data-model", "lp32"]).is_err());
    }

    #[test]
    fn test_layout_and_decl_conflict() {
        let result = Args::try_parse_from(["layout-mirror", "show", "--layout", "var", "--decl", "var.json"]);
        assert!(result.is_err());
    }
}

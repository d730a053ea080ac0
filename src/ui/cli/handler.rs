// Fri Oct 16 2026 - Alex

use super::args::{Args, Command, DecodeArgs, EmitArgs, LayoutSource, ListArgs, ShowArgs, ValidateArgs};
use crate::catalog::TypeCatalog;
use crate::config::Config;
use crate::decode::RawDecoder;
use crate::emit::{MirrorEmitter, TargetAbi};
use crate::kstat::{builtin_layouts, find_layout, KstatLayout};
use crate::output::{ReportFormat, ReportGenerator};
use crate::source::SourceDecl;
use crate::structure::{LayoutBuilder, LayoutDescriptor, LayoutValidator, ReferenceLayout};
use crate::utils::LoggingUtils;
use anyhow::{bail, Context};
use colored::Colorize;

pub struct CommandHandler {
    config: Config,
    format: ReportFormat,
    quiet: bool,
}

impl CommandHandler {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            format: ReportFormat::Text,
            quiet: false,
        }
    }

    /// Loads the config file if one was given, then lets flags override it.
    pub fn from_args(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(abi) = args.abi {
            config = config.with_abi(abi);
        }
        if let Some(level) = &args.log_level {
            config = config.with_log_level(level.clone());
        }
        if args.no_color {
            config.color = false;
        }
        config.validate().map_err(|e| anyhow::anyhow!(e))?;

        Ok(Self {
            config,
            format: if args.json { ReportFormat::Json } else { ReportFormat::Text },
            quiet: args.quiet,
        })
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        self.setup_logging();

        match args.command {
            Command::List(list_args) => self.handle_list(list_args),
            Command::Show(show_args) => self.handle_show(show_args),
            Command::Emit(emit_args) => self.handle_emit(emit_args),
            Command::Validate(validate_args) => self.handle_validate(validate_args),
            Command::Decode(decode_args) => self.handle_decode(decode_args),
        }
    }

    fn setup_logging(&self) {
        let level = LoggingUtils::level_from_str(&self.config.log_level);
        LoggingUtils::init_logger(level, self.config.color);
    }

    fn report(&self) -> ReportGenerator {
        ReportGenerator::new(self.format)
    }

    fn catalog(&self) -> TypeCatalog {
        self.config.abi.catalog()
    }

    fn resolve(&self, source: &LayoutSource, catalog: &TypeCatalog) -> anyhow::Result<(LayoutDescriptor, Option<KstatLayout>)> {
        source.validate().map_err(|e| anyhow::anyhow!(e))?;

        if let Some(path) = &source.decl {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let decl = SourceDecl::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
            let layout = LayoutBuilder::new(catalog)
                .with_renames(source.renames.iter().cloned())
                .build(&decl)?;
            return Ok((layout, None));
        }

        let name = source.layout.as_deref().unwrap_or_default();
        let Some(kstat) = find_layout(name) else {
            let known: Vec<String> = builtin_layouts().iter().map(|k| k.name().to_string()).collect();
            bail!("unknown layout `{}` (built-in: {})", name, known.join(", "));
        };
        let layout = LayoutBuilder::new(catalog)
            .with_renames(kstat.renames.iter().copied())
            .with_renames(source.renames.iter().cloned())
            .build(&kstat.decl)?;
        Ok((layout, Some(kstat)))
    }

    fn handle_list(&self, args: ListArgs) -> anyhow::Result<()> {
        let text = if args.types {
            self.report().catalog(&self.catalog())?
        } else {
            self.report().kstats(&builtin_layouts())?
        };
        print!("{}", text);
        Ok(())
    }

    fn handle_show(&self, args: ShowArgs) -> anyhow::Result<()> {
        let catalog = self.catalog();
        let (layout, _) = self.resolve(&args.source, &catalog)?;
        let text = self.report().with_padding(!args.no_padding).layout(&layout)?;
        println!("{}", text.trim_end());
        Ok(())
    }

    fn handle_emit(&self, args: EmitArgs) -> anyhow::Result<()> {
        let catalog = self.catalog();
        let (layout, _) = self.resolve(&args.source, &catalog)?;

        let mut config = self.config.clone();
        if let Some(language) = args.language {
            config = config.with_language(language);
        }
        if let Some(padding) = args.explicit_padding {
            config = config.with_explicit_padding(padding);
        }
        if let Some(strip) = args.strip_prefix {
            config = config.with_strip_common_prefix(strip);
        }
        config.validate().map_err(|e| anyhow::anyhow!(e))?;

        let data_model = args.data_model.unwrap_or_else(|| catalog.data_model());
        let target = TargetAbi::new(config.language, data_model);
        let mirror = MirrorEmitter::with_options(config.emit_options()).emit(&layout, &target)?;
        LayoutValidator::new()
            .validate_mirror(&layout, &mirror)
            .with_context(|| format!("{} mirror of {} does not line up", config.language, layout.name()))?;

        let text = mirror.render();
        match &args.output {
            Some(path) => {
                self.report().write_to_file(&text, path)?;
                if !self.quiet {
                    eprintln!("{} {} -> {}", "[+]".green(), mirror.name(), path.display());
                }
            }
            None => print!("{}", text),
        }
        Ok(())
    }

    fn handle_validate(&self, args: ValidateArgs) -> anyhow::Result<()> {
        let catalog = self.catalog();
        let (layout, kstat) = self.resolve(&args.source, &catalog)?;

        let reference = if let Some(path) = &args.reference {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            ReferenceLayout::from_json(&text).with_context(|| format!("parsing {}", path.display()))?
        } else if let Some(size) = args.size {
            ReferenceLayout::size_only(size)
        } else if let Some(reference) = kstat.as_ref().and_then(|k| k.reference(self.config.abi)) {
            reference
        } else {
            bail!("no reference for {} on {}; pass --size or --reference", layout.name(), self.config.abi);
        };

        let validator = LayoutValidator::new();
        let report = validator.audit(&layout, &reference);
        print!("{}", self.report().validation(&report)?);
        if !report.passed() {
            bail!("{} does not match its reference", layout.name());
        }

        if let Some(language) = args.language {
            let target = TargetAbi::new(language, catalog.data_model());
            let options = self.config.clone().with_language(language).emit_options();
            let mirror = MirrorEmitter::with_options(options).emit(&layout, &target)?;
            validator.validate_mirror(&layout, &mirror)?;
            if !self.quiet {
                println!("{} {} mirror {} lines up", "PASS".green().bold(), language, mirror.name());
            }
        }
        Ok(())
    }

    fn handle_decode(&self, args: DecodeArgs) -> anyhow::Result<()> {
        args.validate().map_err(|e| anyhow::anyhow!(e))?;
        let catalog = self.catalog();
        let (layout, _) = self.resolve(&args.source, &catalog)?;

        let data = std::fs::read(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
        let decoder = RawDecoder::for_catalog(&catalog);
        let records = if args.records {
            decoder.decode_records(&layout, &data)?
        } else {
            vec![decoder.decode(&layout, &data)?]
        };
        println!("{}", self.report().records(&records)?.trim_end());
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceField;
    use crate::structure::StructureError;
    use clap::Parser;

    fn handler(argv: &[&str]) -> (CommandHandler, Args) {
        let args = Args::try_parse_from(argv).unwrap();
        (CommandHandler::from_args(&args).unwrap(), args)
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("layout-mirror-{}-{}", std::process::id(), name))
    }

    fn emit_args(argv: &[&str]) -> (CommandHandler, EmitArgs) {
        let (handler, args) = handler(argv);
        let Command::Emit(emit) = args.command else {
            panic!("expected emit");
        };
        (handler, emit)
    }

    fn decode_args(argv: &[&str]) -> (CommandHandler, DecodeArgs) {
        let (handler, args) = handler(argv);
        let Command::Decode(decode) = args.command else {
            panic!("expected decode");
        };
        (handler, decode)
    }

    #[test]
    fn test_flags_override_config() {
        let (handler, _) = handler(&["layout-mirror", "--abi", "solaris-sparcv9", "--no-color", "--json", "list"]);
        assert_eq!(handler.config.abi, crate::catalog::ForeignAbi::SolarisSparcv9);
        assert!(!handler.config.color);
        assert_eq!(handler.format, ReportFormat::Json);
    }

    #[test]
    fn test_resolve_builtin_with_kstat_renames() {
        let handler = CommandHandler::default();
        let catalog = handler.catalog();
        let source = LayoutSource {
            layout: Some("nfs:*:mntinfo".to_string()),
            decl: None,
            renames: Vec::new(),
        };
        let (layout, kstat) = handler.resolve(&source, &catalog).unwrap();
        assert_eq!(layout.size(), 492);
        assert!(kstat.is_some());
    }

    #[test]
    fn test_resolve_unknown_layout() {
        let handler = CommandHandler::default();
        let catalog = handler.catalog();
        let source = LayoutSource {
            layout: Some("cpu_stat".to_string()),
            decl: None,
            renames: Vec::new(),
        };
        let err = handler.resolve(&source, &catalog).unwrap_err();
        assert!(err.to_string().contains("mntinfo_kstat"));
    }

    #[test]
    fn test_validate_wrong_size_fails() {
        let (handler, args) = handler(&["layout-mirror", "validate", "--layout", "mntinfo_kstat", "--size", "124"]);
        let Command::Validate(validate) = args.command else {
            panic!("expected validate");
        };
        assert!(handler.handle_validate(validate).is_err());
    }

    #[test]
    fn test_emit_refuses_stricter_aligned_target() {
        let decl = scratch("pair.json");
        let pair = SourceDecl::new(
            "pair",
            vec![
                SourceField::scalar("a", "uint32_t"),
                SourceField::scalar("b", "uint64_t"),
            ],
        );
        std::fs::write(&decl, pair.to_json().unwrap()).unwrap();
        let path = decl.to_str().unwrap();

        let (native, args) =
            emit_args(&["layout-mirror", "-q", "--abi", "solaris-i386", "emit", "--decl", path, "-L", "c"]);
        assert!(native.handle_emit(args).is_ok());

        let (handler, args) = emit_args(&[
            "layout-mirror",
            "--abi",
            "solaris-i386",
            "emit",
            "--decl",
            path,
            "-L",
            "c",
            "--data-model",
            "lp64",
        ]);
        let err = handler.handle_emit(args).unwrap_err();
        assert!(err.to_string().contains("does not line up"));
        assert!(matches!(
            err.downcast_ref::<StructureError>(),
            Some(StructureError::OffsetMismatch { computed: 8, reference: 4, .. })
        ));

        std::fs::remove_file(&decl).ok();
    }

    #[test]
    fn test_emit_writes_output_file() {
        let out = scratch("mntinfo.go");
        let path = out.to_str().unwrap();
        let (handler, args) =
            emit_args(&["layout-mirror", "-q", "emit", "--layout", "mntinfo_kstat", "-L", "go", "-o", path]);
        handler.handle_emit(args).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("type MntinfoKstat struct"));
        assert!(text.contains("pad0"));
        std::fs::remove_file(&out).ok();
    }

    #[test]
    fn test_decode_records_from_blob() {
        let blob = scratch("sysinfo.bin");
        let path = blob.to_str().unwrap();

        std::fs::write(&blob, vec![0u8; 48]).unwrap();
        let (handler, args) = decode_args(&["layout-mirror", "decode", "--layout", "sysinfo", "--records", "-i", path]);
        assert!(handler.handle_decode(args).is_ok());

        std::fs::write(&blob, vec![0u8; 20]).unwrap();
        let (handler, args) = decode_args(&["layout-mirror", "decode", "--layout", "sysinfo", "--records", "-i", path]);
        assert!(handler.handle_decode(args).is_err());

        std::fs::remove_file(&blob).ok();
    }

    #[test]
    fn test_show_builtin() {
        let (handler, args) = handler(&["layout-mirror", "show", "--layout", "var"]);
        let Command::Show(show) = args.command else {
            panic!("expected show");
        };
        assert!(handler.handle_show(show).is_ok());
    }

    #[test]
    fn test_validate_builtin_reference() {
        let (handler, args) = handler(&["layout-mirror", "-q", "validate", "--layout", "kstat_io", "-L", "rust"]);
        let Command::Validate(validate) = args.command else {
            panic!("expected validate");
        };
        assert!(handler.handle_validate(validate).is_ok());
    }
}

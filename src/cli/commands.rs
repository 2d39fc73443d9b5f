use crate::config::ModuleConfig;
use crate::generator::{DryRunFs, GenerationReport, Generator, LocalFs, TemplateEngine};
use crate::spec::{self, Definition};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line interface for restmodgen
///
/// Generates an OSGi JAX-RS REST module from an OpenAPI definition.
#[derive(Parser, Debug)]
#[command(name = "restmodgen", version)]
#[command(about = "OpenAPI to OSGi REST module generator", long_about = None)]
pub struct Cli {
    /// Log at debug level (overrides RESTMODGEN_LOG_LEVEL)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate module sources from an OpenAPI spec
    Generate {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Path to the module configuration (module.toml)
        #[arg(short, long)]
        config: PathBuf,

        /// Output directory, replacing module_output_path from the config
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory whose *.tpl files replace the built-in templates
        #[arg(long, env = "RESTMODGEN_TEMPLATE_DIR")]
        template_dir: Option<PathBuf>,

        /// Regenerate existing *ResourceImpl.java files
        #[arg(long, default_value_t = false)]
        overwrite_implementation: bool,

        /// Regenerate an existing bnd.bnd
        #[arg(long, default_value_t = false)]
        overwrite_metadata: bool,

        /// Show what would be written without touching the output directory
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },
    /// Import a spec and print the paths and components found in it
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
}

/// Execute a parsed command line
///
/// # Errors
///
/// Returns an error if:
/// - The module configuration cannot be read, parsed or validated
/// - The spec cannot be read or imported
/// - Any output file cannot be written
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            spec,
            config,
            output,
            template_dir,
            overwrite_implementation,
            overwrite_metadata,
            dry_run,
        } => {
            let mut module_config = ModuleConfig::from_toml_file(&config)?;
            if let Some(output) = output {
                module_config.module_output_path = output;
            }
            module_config.overwrite_implementation |= overwrite_implementation;
            module_config.overwrite_metadata |= overwrite_metadata;
            module_config
                .validate()
                .with_context(|| format!("Invalid module config: {}", config.display()))?;

            let generator = Generator::new(module_config, TemplateEngine::new(template_dir));
            if dry_run {
                let mut fs = DryRunFs::default();
                let report = run_generator(&generator, &spec, &mut fs)?;
                print!("{}", describe_dry_run(&fs, &report));
            } else {
                let report = run_generator(&generator, &spec, &mut LocalFs)?;
                print!(
                    "{}",
                    describe_report(&generator.config().module_output_path, &report)
                );
            }
            Ok(())
        }
        Commands::Inspect { spec } => {
            let definition = spec::import_file(&spec)
                .with_context(|| format!("Failed to import spec: {}", spec.display()))?;
            print!("{}", describe_definition(&definition));
            Ok(())
        }
    }
}

fn run_generator(
    generator: &Generator,
    spec: &Path,
    fs: &mut dyn crate::generator::OutputFs,
) -> anyhow::Result<GenerationReport> {
    generator
        .run_file(spec, fs)
        .with_context(|| format!("Failed to generate module from {}", spec.display()))
}

/// Summary printed after a real run
pub fn describe_report(output: &Path, report: &GenerationReport) -> String {
    let mut out = String::new();
    for skipped in &report.skipped {
        out.push_str(&format!(
            "⚠️  Skipped {} (exists; set {} to overwrite)\n",
            skipped.path.display(),
            skipped.protection.flag().unwrap_or("an overwrite flag")
        ));
    }
    for component in &report.unreferenced_components {
        out.push_str(&format!("ℹ️  Component {component} is not reachable from any path\n"));
    }
    out.push_str(&format!(
        "✅ Generated module at {}: {} written, {} skipped\n",
        output.display(),
        report.written.len(),
        report.skipped.len()
    ));
    out
}

/// Listing printed by `--dry-run`
pub fn describe_dry_run(fs: &DryRunFs, report: &GenerationReport) -> String {
    let mut out = String::new();
    for dir in &fs.directories {
        out.push_str(&format!("📁 would create {}\n", dir.display()));
    }
    for file in &report.written {
        out.push_str(&format!("📝 would write  {}\n", file.display()));
    }
    for skipped in &report.skipped {
        out.push_str(&format!("⏭️  would skip   {}\n", skipped.path.display()));
    }
    out.push_str(&format!(
        "🔍 Dry run: {} files would be written, {} skipped\n",
        report.written.len(),
        report.skipped.len()
    ));
    out
}

/// Human-readable view of an imported spec, used by `inspect`
pub fn describe_definition(definition: &Definition) -> String {
    let mut out = String::new();
    out.push_str(&format!("version: {}\n", definition.version));
    out.push_str("paths:\n");
    for path in &definition.paths {
        out.push_str(&format!("  {}\n", path.name));
        for method in &path.methods {
            out.push_str(&format!(
                "    {} {} -> {} {}\n",
                method.verb,
                method.relative_path,
                method.name,
                crate::generator::return_type(method)
            ));
        }
        let models: Vec<&str> = path.referenced_models.iter().map(String::as_str).collect();
        out.push_str(&format!("    models: [{}]\n", models.join(", ")));
    }
    out.push_str("components:\n");
    for component in definition.component_definitions.values() {
        let kind = if component.is_parameter { " (parameter)" } else { "" };
        out.push_str(&format!("  {}{kind}\n", component.name));
        for property in &component.property_definitions {
            out.push_str(&format!(
                "    {}: {} -> {}\n",
                property.name, property.spec_type, property.target_type
            ));
        }
    }
    out
}

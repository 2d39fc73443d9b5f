use super::application::{render_application, render_bnd, render_gradle};
use super::model::render_model;
use super::output::{write_unit, OutputFs, SkippedFile, WriteOutcome};
use super::resource::{render_resource_implementation, render_resource_interface};
use super::templates::TemplateEngine;
use super::unit::RenderedUnit;
use crate::config::ModuleConfig;
use crate::error::{GeneratorError, GeneratorResult};
use crate::spec::{self, Definition};
use indexmap::IndexSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// States of a generation run.
///
/// A run moves strictly forward through these in declaration order and ends
/// in [`Stage::Done`], or in [`Stage::Aborted`] on the first fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ImportSpec,
    EnsureOutputDirs,
    EmitMetadata,
    EmitPerPathUnits,
    EmitPerComponentUnits,
    EmitApplication,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a completed run did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Files written, in write order
    pub written: Vec<PathBuf>,
    /// Protected files that already existed and were left alone
    pub skipped: Vec<SkippedFile>,
    /// Union of every path's referenced models, in order of first reference
    pub referenced_models: IndexSet<String>,
    /// Model components no path reaches, directly or through another
    /// model's properties; still emitted
    pub unreferenced_components: Vec<String>,
}

impl GenerationReport {
    fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Written(path) => self.written.push(path),
            WriteOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }
}

/// Drives one spec through import and every emitter.
///
/// ```rust,ignore
/// use restmodgen::config::ModuleConfig;
/// use restmodgen::generator::{Generator, LocalFs, TemplateEngine};
///
/// let config = ModuleConfig::from_toml_file("module.toml".as_ref())?;
/// let generator = Generator::new(config, TemplateEngine::builtin());
/// let report = generator.run_file("openapi.yaml".as_ref(), &mut LocalFs)?;
/// println!("{} files written", report.written.len());
/// ```
#[derive(Debug)]
pub struct Generator {
    config: ModuleConfig,
    templates: TemplateEngine,
}

impl Generator {
    pub fn new(config: ModuleConfig, templates: TemplateEngine) -> Self {
        Generator { config, templates }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Generate a module from raw spec text.
    ///
    /// Any error aborts the run. Files written before the failing step stay
    /// on disk.
    pub fn run(&self, raw_spec: &str, fs: &mut dyn OutputFs) -> GeneratorResult<GenerationReport> {
        self.drive(|| spec::import(raw_spec), fs)
    }

    /// Generate a module from a spec file.
    pub fn run_file(&self, spec_path: &Path, fs: &mut dyn OutputFs) -> GeneratorResult<GenerationReport> {
        self.drive(|| spec::import_file(spec_path), fs)
    }

    fn drive<F>(&self, import: F, fs: &mut dyn OutputFs) -> GeneratorResult<GenerationReport>
    where
        F: FnOnce() -> GeneratorResult<Definition>,
    {
        let mut stage = Stage::Start;
        match self.execute(import, fs, &mut stage) {
            Ok(report) => {
                advance(&mut stage, Stage::Done);
                info!(
                    written = report.written.len(),
                    skipped = report.skipped.len(),
                    "Generation complete"
                );
                Ok(report)
            }
            Err(e) => {
                error!(stage = %stage, error = %e, "Generation aborted");
                advance(&mut stage, Stage::Aborted);
                Err(e)
            }
        }
    }

    fn execute<F>(
        &self,
        import: F,
        fs: &mut dyn OutputFs,
        stage: &mut Stage,
    ) -> GeneratorResult<GenerationReport>
    where
        F: FnOnce() -> GeneratorResult<Definition>,
    {
        let config = &self.config;
        let templates = &self.templates;
        config.validate()?;
        let mut report = GenerationReport::default();

        advance(stage, Stage::ImportSpec);
        let definition = import()?;

        advance(stage, Stage::EnsureOutputDirs);
        for dir in [
            config.module_output_path.clone(),
            config.java_source_root(),
            config.resource_root(),
        ] {
            if !fs.exists(&dir) {
                fs.create_dir_all(&dir)
                    .map_err(|e| GeneratorError::output(&dir, e))?;
                info!(dir = %dir.display(), "Created directory");
            }
        }

        advance(stage, Stage::EmitMetadata);
        self.emit(render_bnd(config, templates)?, fs, &mut report)?;
        self.emit(render_gradle(config, templates)?, fs, &mut report)?;

        advance(stage, Stage::EmitPerPathUnits);
        for path in &definition.paths {
            let interface = render_resource_interface(path, &definition.version, config, templates)?;
            self.emit(interface, fs, &mut report)?;
            let implementation =
                render_resource_implementation(path, &definition.version, config, templates)?;
            self.emit(implementation, fs, &mut report)?;
            report
                .referenced_models
                .extend(path.referenced_models.iter().cloned());
        }

        advance(stage, Stage::EmitPerComponentUnits);
        let reachable = definition.reachable_models(&report.referenced_models);
        for component in definition.model_components() {
            if !reachable.contains(&component.name) {
                warn!(component = %component.name, "Component is not reachable from any path");
                report.unreferenced_components.push(component.name.clone());
            }
            self.emit(render_model(component, config, templates)?, fs, &mut report)?;
        }

        advance(stage, Stage::EmitApplication);
        self.emit(render_application(&definition, config, templates)?, fs, &mut report)?;

        Ok(report)
    }

    fn emit(
        &self,
        unit: RenderedUnit,
        fs: &mut dyn OutputFs,
        report: &mut GenerationReport,
    ) -> GeneratorResult<()> {
        report.record(write_unit(unit, &self.config, fs)?);
        Ok(())
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "Stage transition");
    *stage = next;
}

//! Write-or-skip stage.
//!
//! All filesystem access of a run goes through [`OutputFs`], so the overwrite
//! policy can be exercised without touching disk.

use super::unit::{Protection, RenderedUnit};
use crate::config::ModuleConfig;
use crate::error::{GeneratorError, GeneratorResult};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The filesystem operations a generation run needs
pub trait OutputFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&mut self, path: &Path) -> io::Result<()>;
    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Writes to the real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl OutputFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Answers `exists` from disk but only records what would be created.
#[derive(Debug, Default, Clone)]
pub struct DryRunFs {
    pub directories: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl OutputFs for DryRunFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists() || self.files.iter().any(|f| f == path)
    }

    fn create_dir_all(&mut self, path: &Path) -> io::Result<()> {
        if !path.exists() && !self.directories.iter().any(|d| d == path) {
            self.directories.push(path.to_path_buf());
        }
        Ok(())
    }

    fn write(&mut self, path: &Path, _contents: &str) -> io::Result<()> {
        self.files.push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    Write,
    Skip,
}

/// A protected file left untouched because it already exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub protection: Protection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    Skipped(SkippedFile),
}

/// Decide whether a unit is written.
///
/// Unprotected units are always written. Protected units are skipped when
/// the target exists and the matching overwrite flag is off.
pub fn decide(unit: &RenderedUnit, config: &ModuleConfig, fs: &dyn OutputFs) -> WriteDecision {
    if unit.protection.allows_overwrite(config) || !fs.exists(&unit.path) {
        WriteDecision::Write
    } else {
        WriteDecision::Skip
    }
}

/// Apply [`decide`] to a unit, creating its parent directory when writing.
///
/// # Errors
///
/// [`GeneratorError::OutputPath`] naming the directory or file that could not
/// be created.
pub fn write_unit(
    unit: RenderedUnit,
    config: &ModuleConfig,
    fs: &mut dyn OutputFs,
) -> GeneratorResult<WriteOutcome> {
    if decide(&unit, config, fs) == WriteDecision::Skip {
        warn!(
            file = %unit.path.display(),
            flag = unit.protection.flag().unwrap_or_default(),
            "File exists and is not regenerated; enable the overwrite flag to replace it"
        );
        return Ok(WriteOutcome::Skipped(SkippedFile {
            path: unit.path,
            protection: unit.protection,
        }));
    }

    if let Some(parent) = unit.path.parent() {
        fs.create_dir_all(parent)
            .map_err(|e| GeneratorError::output(parent, e))?;
    }
    fs.write(&unit.path, &unit.contents)
        .map_err(|e| GeneratorError::output(&unit.path, e))?;
    info!(file = %unit.path.display(), "Wrote");
    Ok(WriteOutcome::Written(unit.path))
}

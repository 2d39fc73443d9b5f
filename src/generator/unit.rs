use crate::config::ModuleConfig;
use std::path::PathBuf;

/// Which overwrite flag, if any, guards an output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// Rewritten on every run
    Unprotected,
    /// Hand-edited resource implementation, guarded by `overwrite_implementation`
    Implementation,
    /// Bundle descriptor, guarded by `overwrite_metadata`
    Metadata,
}

impl Protection {
    /// Whether an existing file with this protection may be replaced
    pub fn allows_overwrite(self, config: &ModuleConfig) -> bool {
        match self {
            Protection::Unprotected => true,
            Protection::Implementation => config.overwrite_implementation,
            Protection::Metadata => config.overwrite_metadata,
        }
    }

    /// Configuration key that lifts the protection
    pub fn flag(self) -> Option<&'static str> {
        match self {
            Protection::Unprotected => None,
            Protection::Implementation => Some("overwrite_implementation"),
            Protection::Metadata => Some("overwrite_metadata"),
        }
    }
}

/// One emitter's output: a target file and its full contents.
///
/// Rendering never touches the filesystem; whether the unit is written is
/// decided afterwards by [`super::decide`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub path: PathBuf,
    pub contents: String,
    pub protection: Protection,
}

impl RenderedUnit {
    pub fn new(path: PathBuf, contents: String) -> Self {
        RenderedUnit {
            path,
            contents,
            protection: Protection::Unprotected,
        }
    }

    pub fn protected(mut self, protection: Protection) -> Self {
        self.protection = protection;
        self
    }
}

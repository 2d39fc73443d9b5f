//! # restmodgen
//!
//! **restmodgen** turns an OpenAPI definition into the sources of an OSGi
//! JAX-RS REST module: DTO classes, resource interfaces, resource
//! implementation stubs, the application class and the bundle descriptors.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Imports a YAML or JSON spec into an ordered [`spec::Definition`]
//! - **[`type_mapping`]** - Maps spec types to Java types
//! - **[`generator`]** - Template engine, emitters, write policy and the run orchestrator
//! - **[`config`]** - Typed module configuration loaded from TOML
//! - **[`cli`]** - The `restmodgen` command line
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`error`]** - [`GeneratorError`], the failure taxonomy of a run
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant CLI as CLI<br/>(restmodgen)
//!     participant Spec as spec::import
//!     participant Gen as generator::Generator
//!     participant Emit as emitters
//!     participant FS as OutputFs
//!
//!     CLI->>Gen: run_file(spec, fs)
//!     Gen->>Spec: import(raw)
//!     Spec-->>Gen: Definition (every type mapped, every $ref resolved)
//!     Gen->>FS: ensure output directories
//!     Gen->>Emit: bnd.bnd, build.gradle
//!     Gen->>Emit: per path: Resource, ResourceImpl
//!     Gen->>Emit: per component: DTO
//!     Gen->>Emit: Application
//!     Emit-->>Gen: RenderedUnit
//!     Gen->>FS: decide + write_unit
//!     Gen-->>CLI: GenerationReport
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use restmodgen::config::ModuleConfig;
//! use restmodgen::generator::{Generator, LocalFs, TemplateEngine};
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ModuleConfig::from_toml_file(Path::new("module.toml"))?;
//! let generator = Generator::new(config, TemplateEngine::builtin());
//! let report = generator.run_file(Path::new("openapi.yaml"), &mut LocalFs)?;
//! for skipped in &report.skipped {
//!     println!("kept hand-edited {}", skipped.path.display());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Regeneration
//!
//! Re-running against an unchanged spec reproduces every unprotected file
//! byte for byte. `*ResourceImpl.java` and `bnd.bnd` are only replaced when
//! `overwrite_implementation` / `overwrite_metadata` is set.

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod spec;
pub mod type_mapping;

pub use config::ModuleConfig;
pub use error::{GeneratorError, GeneratorResult};
pub use generator::{GenerationReport, Generator};
pub use spec::{import, import_file, Definition};

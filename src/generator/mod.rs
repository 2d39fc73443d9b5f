//! # Generator Module
//!
//! Turns an imported [`Definition`](crate::spec::Definition) into the sources
//! of an OSGi JAX-RS module.
//!
//! ## Architecture
//!
//! ```text
//! spec text → spec::import → Definition → emitters → RenderedUnit → decide → OutputFs
//! ```
//!
//! 1. **Templates** - `${NAME}` substitution over the built-in `templates/*.tpl`
//!    set, or an override directory
//! 2. **Emitters** - pure functions from the definition and [`ModuleConfig`](crate::config::ModuleConfig)
//!    to [`RenderedUnit`]s; they never touch the filesystem
//! 3. **Write stage** - [`decide`] applies the overwrite policy, [`write_unit`]
//!    writes through an [`OutputFs`]
//! 4. **Orchestrator** - [`Generator`] runs the stages in order and returns a
//!    [`GenerationReport`]
//!
//! ## Generated Structure
//!
//! ```text
//! <module_output_path>/
//! ├── bnd.bnd                 # Bundle descriptor (protected by overwrite_metadata)
//! ├── build.gradle            # Build descriptor
//! └── src/main/
//!     ├── resources/
//!     └── java/
//!         ├── <api package>/<ApplicationClass>.java
//!         ├── <model package>/<Name>DTO.java               # one per component
//!         ├── <resource interface package>/<Path>Resource.java
//!         └── <resource package>/<Path>ResourceImpl.java   # protected by overwrite_implementation
//! ```
//!
//! ## Overwrite Policy
//!
//! Resource implementations and `bnd.bnd` are skipped when they already
//! exist unless their flag is set. Everything else is regenerated on every
//! run.

mod application;
mod model;
mod output;
mod project;
mod resource;
mod templates;
#[cfg(test)]
mod tests;
mod unit;

pub use application::{render_application, render_bnd, render_gradle};
pub use model::render_model;
pub use output::{
    decide, write_unit, DryRunFs, LocalFs, OutputFs, SkippedFile, WriteDecision, WriteOutcome,
};
pub use project::{GenerationReport, Generator, Stage};
pub use resource::{
    model_import_statements, render_resource_implementation, render_resource_interface,
    return_type,
};
pub use templates::*;
pub use unit::{Protection, RenderedUnit};

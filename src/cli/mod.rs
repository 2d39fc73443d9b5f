//! # CLI Module
//!
//! Command-line interface of the `restmodgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Generate a module from an OpenAPI specification and a module configuration:
//!
//! ```bash
//! restmodgen generate --spec openapi.yaml --config module.toml
//! ```
//!
//! Options:
//! - `--spec <FILE>` - Path to OpenAPI specification (required)
//! - `--config <FILE>` - Module configuration in TOML (required)
//! - `--output <DIR>` - Replace `module_output_path` from the configuration
//! - `--template-dir <DIR>` - Override built-in templates (also `RESTMODGEN_TEMPLATE_DIR`)
//! - `--overwrite-implementation` - Regenerate existing resource implementations
//! - `--overwrite-metadata` - Regenerate an existing `bnd.bnd`
//! - `--dry-run` - List what would be written without writing
//!
//! ### `inspect`
//!
//! Print the paths and components the importer finds in a specification:
//!
//! ```bash
//! restmodgen inspect --spec openapi.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use restmodgen::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{describe_definition, describe_dry_run, describe_report, run_cli, Cli, Commands};

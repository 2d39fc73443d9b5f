//! # Spec Module
//!
//! Imports an OpenAPI document into the in-memory [`Definition`] the emitters
//! work from.
//!
//! - [`load`] parses YAML or JSON text into an order-preserving document
//! - [`build`] walks that document into paths and components, resolving every
//!   reference and mapping every type up front
//!
//! Declaration order is kept for paths, methods, components and properties
//! so that regenerating from an unchanged spec reproduces the same bytes.

mod build;
mod load;
mod types;

pub use build::build_definition;
pub use load::{import, import_file, parse_document};
pub use types::*;

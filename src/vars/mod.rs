//! Template variables and their resolution.
//!
//! Variables come from two kinds of command-line source:
//! - `-var name=value` literal assignments
//! - `-var-file path` YAML files
//!
//! Sources are kept in one ordered list exactly as they appeared on the
//! command line and folded into [`Bindings`] with last-write-wins semantics.

mod file;
mod resolver;
mod source;


use std::collections::BTreeMap;

/// Variables contributed by a single source.
pub type VariableMapping = BTreeMap<String, serde_yaml::Value>;

// Re-export public API
pub use resolver::{Bindings, resolve};
pub use source::VariableSource;

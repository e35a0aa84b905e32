//! Variable sources given on the command line.
//!
//! A source is either a literal `-var name=value` assignment or a
//! `-var-file path` reference to a YAML document. Both resolve to a
//! [`VariableMapping`] that the resolver folds into the final bindings.

use super::VariableMapping;
use super::file::load_var_file;
use crate::error::{PrepError, Result};
use regex::Regex;
use serde_yaml::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Variable files must be named `<stem>.yml` or `<stem>.yaml`.
static VAR_FILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.ya?ml$").expect("Invalid variable file regex"));

/// A literal `name=value` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAssignment {
    /// Variable name, trimmed and non-empty.
    pub name: String,
    /// Everything after the first `=`, untouched.
    pub value: String,
}

impl VariableAssignment {
    /// Parse a `-var` argument.
    ///
    /// The argument is split on the first `=`; the name is trimmed and must
    /// not be empty, the value is kept verbatim and may be empty.
    pub fn parse(arg: &str) -> Result<Self> {
        let Some((name, value)) = arg.split_once('=') else {
            return Err(PrepError::MalformedVariable {
                arg: arg.to_string(),
                reason: "argument should be in the form: name=value",
            });
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(PrepError::MalformedVariable {
                arg: arg.to_string(),
                reason: "no name defined for template variable",
            });
        }

        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for VariableAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A reference to a YAML file of variables.
///
/// The file is only read when the reference is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableFileReference {
    path: PathBuf,
}

impl VariableFileReference {
    /// Validate a `-var-file` argument.
    pub fn parse(arg: &str) -> Result<Self> {
        if arg.is_empty() {
            return Err(PrepError::InvalidVarFile {
                path: arg.to_string(),
                reason: "no filename defined",
            });
        }

        if !VAR_FILE_REGEX.is_match(arg) {
            return Err(PrepError::InvalidVarFile {
                path: arg.to_string(),
                reason: "only YAML files are supported",
            });
        }

        Ok(Self {
            path: PathBuf::from(arg),
        })
    }

    /// Path of the referenced file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One `-var` or `-var-file` occurrence, in command-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableSource {
    Assignment(VariableAssignment),
    File(VariableFileReference),
}

impl VariableSource {
    /// Build a source from a raw `-var` argument.
    pub fn assignment(arg: &str) -> Result<Self> {
        VariableAssignment::parse(arg).map(Self::Assignment)
    }

    /// Build a source from a raw `-var-file` argument.
    pub fn file(arg: &str) -> Result<Self> {
        VariableFileReference::parse(arg).map(Self::File)
    }

    /// Resolve this source to the variables it contributes.
    ///
    /// Assignments contribute exactly one string value. File references are
    /// read and parsed here; a read or parse failure is returned as-is.
    pub fn resolve(&self) -> Result<VariableMapping> {
        match self {
            VariableSource::Assignment(assignment) => {
                let mut mapping = VariableMapping::new();
                mapping.insert(
                    assignment.name.clone(),
                    Value::String(assignment.value.clone()),
                );
                Ok(mapping)
            }
            VariableSource::File(reference) => load_var_file(reference.path()),
        }
    }
}

impl fmt::Display for VariableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableSource::Assignment(assignment) => write!(f, "-var {}", assignment),
            VariableSource::File(reference) => {
                write!(f, "-var-file {}", reference.path().display())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        let var = VariableAssignment::parse("url=http://host/?a=b").unwrap();
        assert_eq!(var.name, "url");
        assert_eq!(var.value, "http://host/?a=b");
    }

    #[test]
    fn assignment_trims_name_but_not_value() {
        let var = VariableAssignment::parse("  user \t=  jbloggs ").unwrap();
        assert_eq!(var.name, "user");
        assert_eq!(var.value, "  jbloggs ");
    }

    #[test]
    fn assignment_allows_empty_value() {
        let var = VariableAssignment::parse("empty=").unwrap();
        assert_eq!(var.name, "empty");
        assert_eq!(var.value, "");
    }

    #[test]
    fn assignment_without_equals_is_malformed() {
        let err = VariableAssignment::parse("foo").unwrap_err();
        assert!(matches!(
            err,
            PrepError::MalformedVariable {
                reason: "argument should be in the form: name=value",
                ..
            }
        ));
    }

    #[test]
    fn assignment_with_empty_name_is_malformed() {
        for arg in ["=bar", "   =bar", "="] {
            let err = VariableAssignment::parse(arg).unwrap_err();
            assert!(
                matches!(
                    err,
                    PrepError::MalformedVariable {
                        reason: "no name defined for template variable",
                        ..
                    }
                ),
                "expected empty-name error for {arg:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn var_file_accepts_yml_and_yaml() {
        for arg in ["vars.yml", "vars.yaml", "dir/nested.vars.yaml", "./a.yml"] {
            let reference = VariableFileReference::parse(arg).unwrap();
            assert_eq!(reference.path(), Path::new(arg));
        }
    }

    #[test]
    fn var_file_rejects_other_extensions() {
        for arg in ["config.json", "vars.YAML", "vars.yaml.bak", ".yaml", "yml"] {
            let err = VariableFileReference::parse(arg).unwrap_err();
            assert!(
                matches!(
                    err,
                    PrepError::InvalidVarFile {
                        reason: "only YAML files are supported",
                        ..
                    }
                ),
                "expected extension error for {arg:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn var_file_rejects_empty_path() {
        let err = VariableFileReference::parse("").unwrap_err();
        assert!(matches!(
            err,
            PrepError::InvalidVarFile {
                reason: "no filename defined",
                ..
            }
        ));
    }

    #[test]
    fn assignment_resolves_to_single_string() {
        let source = VariableSource::assignment("port=8080").unwrap();
        let mapping = source.resolve().unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping["port"], Value::String("8080".to_string()));
    }

    #[test]
    fn display_matches_command_line_form() {
        let var = VariableSource::assignment("a=1").unwrap();
        let file = VariableSource::file("vars.yaml").unwrap();
        assert_eq!(var.to_string(), "-var a=1");
        assert_eq!(file.to_string(), "-var-file vars.yaml");
    }
}

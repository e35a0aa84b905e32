//! Loading variable mappings from YAML files.

use super::VariableMapping;
use crate::error::{PrepError, Result};
use serde_yaml::Value;
use std::path::Path;

/// Read a YAML variable file and return its top-level mapping.
///
/// # Arguments
///
/// * `path` - Path to the `.yml` / `.yaml` file
///
/// # Returns
///
/// * `Ok(VariableMapping)` - The variables defined by the file (empty for an empty document)
/// * `Err(PrepError::VarFileRead)` - The file could not be read
/// * `Err(PrepError::VarFileParse)` - Invalid YAML, or the top level is not a string-keyed mapping
pub fn load_var_file(path: &Path) -> Result<VariableMapping> {
    let content = std::fs::read_to_string(path).map_err(|source| PrepError::VarFileRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_var_mapping(&content).map_err(|message| PrepError::VarFileParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Parse YAML text into a variable mapping.
///
/// Values are kept as parsed, so nested mappings and sequences reach the
/// template intact. Keys must be strings.
pub fn parse_var_mapping(yaml: &str) -> std::result::Result<VariableMapping, String> {
    let document: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;

    let mapping = match document {
        Value::Null => return Ok(VariableMapping::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(format!(
                "top level must be a mapping of variable names to values, found {}",
                describe(&other)
            ));
        }
    };

    let mut variables = VariableMapping::new();
    for (key, value) in mapping {
        match key {
            Value::String(name) => {
                variables.insert(name, value);
            }
            other => {
                return Err(format!(
                    "variable names must be strings, found {} key",
                    describe(&other)
                ));
            }
        }
    }

    Ok(variables)
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

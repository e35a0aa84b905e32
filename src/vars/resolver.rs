//! Ordered resolution of variable sources into template bindings.

use super::VariableMapping;
use super::source::VariableSource;
use crate::error::Result;
use serde::Serialize;
use serde_yaml::Value;
use tracing::debug;

/// The final set of variables handed to the template engine.
///
/// Built once by [`resolve`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings(VariableMapping);

impl Bindings {
    /// Look up a bound value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Number of bound variables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn merge(mut self, contribution: VariableMapping) -> Self {
        for (name, value) in contribution {
            if let Some(previous) = self.0.insert(name.clone(), value) {
                debug!(variable = %name, ?previous, "overriding earlier value");
            }
        }
        self
    }
}

/// Fold variable sources into bindings, in the order given.
///
/// Each source overwrites any key an earlier source defined; the last source
/// to define a name wins. Resolution stops at the first source that fails to
/// resolve.
pub fn resolve(sources: &[VariableSource]) -> Result<Bindings> {
    sources.iter().try_fold(Bindings::default(), |bindings, source| {
        let contribution = source.resolve()?;
        debug!(%source, variables = contribution.len(), "applying variable source");
        Ok(bindings.merge(contribution))
    })
}

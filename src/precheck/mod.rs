//! Pre-check: detect content that a template engine would silently alter.
//!
//! A plain file that is about to become a template may already contain text
//! the engine treats as syntax (`{{`, `{%`, `{#`). The pre-check parses the
//! file with no variables bound, executes it, and compares the output with
//! the original:
//!
//! 1. Parse failure: the file holds malformed directive syntax
//! 2. Execution failure: a directive calls something that does not exist
//! 3. Output differs: some content was interpreted; a diff shows where
//!
//! The pre-check only reads. It never writes an output file.

mod diff;

pub use diff::{DiffOp, DiffReport, DiffSpan};

use crate::error::{PrepError, Result};
use crate::template::{self, TemplateDocument, Undefined};
use tracing::debug;

/// Result of a pre-check that got as far as comparing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Rendering reproduced the file exactly.
    Passed,
    /// Rendering changed the file.
    Altered(DiffReport),
}

/// Run the pre-check on a document.
///
/// # Returns
///
/// * `Ok(Verdict::Passed)` - The file renders to itself
/// * `Ok(Verdict::Altered(report))` - The file renders differently
/// * `Err(PrepError::TemplateParse)` - The file is not a valid template
/// * `Err(PrepError::TemplateExec)` - The file fails to execute as a template
pub fn check(document: &TemplateDocument) -> Result<Verdict> {
    let rendered = template::render(document, minijinja::context! {}, Undefined::Lenient)?;

    if rendered == document.source() {
        debug!(name = document.name(), "pre-check output identical to input");
        return Ok(Verdict::Passed);
    }

    let report = DiffReport::compute(document.source(), &rendered);
    debug!(
        name = document.name(),
        changes = report.change_count(),
        "pre-check output differs from input"
    );
    Ok(Verdict::Altered(report))
}

/// Explanation printed ahead of a pre-check failure, by stage.
pub fn failure_preamble(err: &PrepError) -> Option<&'static str> {
    match err {
        PrepError::TemplateParse(_) => Some(
            "Failed parsing your file as a template. This failure points to content being \
             accidentally interpreted as template code, please fix before editing your file:",
        ),
        PrepError::TemplateExec(_) => Some(
            "Failed executing your file as a template. This failure points to content being \
             accidentally interpreted as template code, please fix before editing your file:",
        ),
        PrepError::DiffDetected { .. } => Some(
            "The following difference(s) were detected in your file when parsed as a template. \
             These failure(s) point to content being accidentally interpreted as template code, \
             please fix before editing your file:",
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests;

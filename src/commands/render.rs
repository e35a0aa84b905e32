//! Render a template with resolved variables.

use crate::cli::Invocation;
use crate::error::Result;
use crate::fs::OutputTarget;
use crate::template::{self, TemplateDocument, Undefined};
use crate::vars::{self, VariableSource};
use tracing::debug;

/// Render the input template and write it to `-write-file` or stdout.
///
/// The output file is checked before any work is done, and written only
/// once rendering has fully succeeded.
pub fn cmd_render(invocation: &Invocation) -> Result<()> {
    let document = TemplateDocument::load(&invocation.input)?;

    let target = OutputTarget::new(invocation.write_file.clone(), invocation.force);
    target.ensure_writable()?;

    let output = render_document(&document, &invocation.sources)?;
    target.write(&output)
}

/// Resolve `sources` in order and render `document` against the result.
///
/// Variables the template references but no source defines are an error.
pub fn render_document(document: &TemplateDocument, sources: &[VariableSource]) -> Result<String> {
    let bindings = vars::resolve(sources)?;
    debug!(
        template = %document.path().display(),
        sources = sources.len(),
        variables = bindings.len(),
        "resolved variables"
    );

    template::render(document, &bindings, Undefined::Strict)
}

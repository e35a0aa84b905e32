//! Template documents and the engine that renders them.
//!
//! Templates use Jinja syntax via minijinja:
//!
//! - `{{ name }}` - Substitutes the value of variable `name`
//! - `{% if ... %}` / `{% for ... %}` - Control flow over bound values
//! - `{# ... #}` - Comments, removed from the output
//!
//! Errors are classified by stage: a document that does not compile is a
//! [`PrepError::TemplateParse`], one that fails while rendering is a
//! [`PrepError::TemplateExec`].

use crate::error::{PrepError, Result};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;

/// Input files must be named `<stem>.tmpl`.
static TEMPLATE_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.tmpl$").expect("Invalid template name regex"));

/// How the engine treats variables that are not bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Undefined {
    /// Referencing an unbound variable fails execution.
    Strict,
    /// Unbound variables render as empty.
    Lenient,
}

impl From<Undefined> for UndefinedBehavior {
    fn from(value: Undefined) -> Self {
        match value {
            Undefined::Strict => UndefinedBehavior::Strict,
            Undefined::Lenient => UndefinedBehavior::Lenient,
        }
    }
}

/// The raw content of an input template, read once.
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    path: PathBuf,
    name: String,
    source: String,
}

impl TemplateDocument {
    /// Load an input template from disk.
    ///
    /// # Returns
    ///
    /// * `Ok(TemplateDocument)` - The file content
    /// * `Err(PrepError::InputFormat)` - The file name does not end in `.tmpl`
    /// * `Err(PrepError::InputRead)` - The file could not be read as UTF-8 text
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| TEMPLATE_NAME_REGEX.is_match(n))
            .ok_or_else(|| PrepError::InputFormat(path.to_path_buf()))?
            .to_string();

        let source = std::fs::read_to_string(path).map_err(|source| PrepError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), bytes = source.len(), "loaded template");

        Ok(Self {
            path: path.to_path_buf(),
            name,
            source,
        })
    }

    /// Build a document from in-memory text.
    #[cfg(test)]
    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            source: source.into(),
        }
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used in engine messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw template text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Parse a document as a template and execute it against `context`.
///
/// Output is returned in full; nothing is written until the caller decides
/// where it goes.
pub fn render<S: Serialize>(
    document: &TemplateDocument,
    context: S,
    undefined: Undefined,
) -> Result<String> {
    let env = environment(undefined);

    let template = env
        .template_from_named_str(document.name(), document.source())
        .map_err(|err| {
            debug!("{}", err.display_debug_info());
            PrepError::TemplateParse(err)
        })?;

    template.render(context).map_err(|err| {
        debug!("{}", err.display_debug_info());
        PrepError::TemplateExec(err)
    })
}

/// Engine settings for configuration files: no HTML escaping and the
/// document's final newline kept, so plain text renders to itself.
fn environment<'source>(undefined: Undefined) -> Environment<'source> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(undefined.into());
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_variables() {
        let doc = TemplateDocument::from_source("app.conf.tmpl", "user={{ user }}\n");
        let output = render(&doc, vars(&[("user", "jbloggs")]), Undefined::Strict).unwrap();
        assert_eq!(output, "user=jbloggs\n");
    }

    #[test]
    fn test_render_keeps_trailing_newline() {
        let doc = TemplateDocument::from_source("plain.tmpl", "line one\nline two\n\n");
        let output = render(&doc, vars(&[]), Undefined::Strict).unwrap();
        assert_eq!(output, "line one\nline two\n\n");
    }

    #[test]
    fn test_render_does_not_escape_markup() {
        let doc = TemplateDocument::from_source("page.html.tmpl", "{{ tag }}");
        let output = render(&doc, vars(&[("tag", "<b>&</b>")]), Undefined::Strict).unwrap();
        assert_eq!(output, "<b>&</b>");
    }

    #[test]
    fn test_unterminated_directive_is_parse_error() {
        let doc = TemplateDocument::from_source("bad.tmpl", "value = {{ oops\n");
        let err = render(&doc, vars(&[]), Undefined::Lenient).unwrap_err();
        assert!(matches!(err, PrepError::TemplateParse(_)), "got {err:?}");
    }

    #[test]
    fn test_strict_undefined_is_exec_error() {
        let doc = TemplateDocument::from_source("app.tmpl", "{{ missing }}");
        let err = render(&doc, vars(&[]), Undefined::Strict).unwrap_err();
        assert!(matches!(err, PrepError::TemplateExec(_)), "got {err:?}");
    }

    #[test]
    fn test_lenient_undefined_renders_empty() {
        let doc = TemplateDocument::from_source("app.tmpl", "[{{ missing }}]");
        let output = render(&doc, vars(&[]), Undefined::Lenient).unwrap();
        assert_eq!(output, "[]");
    }

    #[test]
    fn test_load_requires_tmpl_extension() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["config.conf", ".tmpl", "config.tmpl.bak"] {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, "x").unwrap();

            let err = TemplateDocument::load(&path).unwrap_err();
            assert!(matches!(err, PrepError::InputFormat(_)), "{name}: got {err:?}");
        }
    }

    #[test]
    fn test_load_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.conf.tmpl");

        let err = TemplateDocument::load(&path).unwrap_err();
        assert!(matches!(err, PrepError::InputRead { .. }));
    }

    #[test]
    fn test_load_reads_content_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("app.conf.tmpl");
        std::fs::write(&path, "port={{ port }}\n").unwrap();

        let doc = TemplateDocument::load(&path).unwrap();
        assert_eq!(doc.name(), "app.conf.tmpl");
        assert_eq!(doc.path(), path);
        assert_eq!(doc.source(), "port={{ port }}\n");
    }
}

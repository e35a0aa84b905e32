//! Character-level diff between a file and its rendered form.

use colored::Colorize;
use similar::{Algorithm, ChangeTag, TextDiff};
use std::time::Duration;

/// Upper bound on diff computation; past it the diff gets coarser, not wrong.
const DIFF_TIMEOUT: Duration = Duration::from_secs(2);

/// What happened to a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOp {
    Equal,
    Insert,
    Delete,
}

/// A run of consecutive characters sharing one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSpan {
    pub op: DiffOp,
    pub text: String,
}

/// Ordered spans describing how `rendered` differs from `original`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    spans: Vec<DiffSpan>,
}

impl DiffReport {
    /// Diff two strings character by character.
    ///
    /// Adjacent changes with the same operation are merged into one span, so
    /// a removed `{{ name }}` shows up as a single deletion.
    pub fn compute(original: &str, rendered: &str) -> Self {
        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .timeout(DIFF_TIMEOUT)
            .diff_chars(original, rendered);

        let mut spans: Vec<DiffSpan> = Vec::new();
        for change in diff.iter_all_changes() {
            let op = match change.tag() {
                ChangeTag::Equal => DiffOp::Equal,
                ChangeTag::Insert => DiffOp::Insert,
                ChangeTag::Delete => DiffOp::Delete,
            };

            match spans.last_mut() {
                Some(last) if last.op == op => last.text.push_str(change.value()),
                _ => spans.push(DiffSpan {
                    op,
                    text: change.value().to_string(),
                }),
            }
        }

        Self { spans }
    }

    #[cfg(test)]
    pub fn spans(&self) -> &[DiffSpan] {
        &self.spans
    }

    /// Number of inserted or deleted spans.
    pub fn change_count(&self) -> usize {
        self.spans.iter().filter(|s| s.op != DiffOp::Equal).count()
    }

    /// Render the diff for a human.
    ///
    /// With `color`, insertions are green and deletions red. Without it,
    /// deletions are wrapped in `[-…-]` and insertions in `{+…+}`.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match (span.op, color) {
                (DiffOp::Equal, _) => out.push_str(&span.text),
                (DiffOp::Insert, true) => out.push_str(&span.text.green().to_string()),
                (DiffOp::Delete, true) => out.push_str(&span.text.red().to_string()),
                (DiffOp::Insert, false) => {
                    out.push_str("{+");
                    out.push_str(&span.text);
                    out.push_str("+}");
                }
                (DiffOp::Delete, false) => {
                    out.push_str("[-");
                    out.push_str(&span.text);
                    out.push_str("-]");
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(op: DiffOp, text: &str) -> DiffSpan {
        DiffSpan {
            op,
            text: text.to_string(),
        }
    }

    #[test]
    fn identical_strings_have_no_changes() {
        let report = DiffReport::compute("port = 80\n", "port = 80\n");

        assert_eq!(report.change_count(), 0);
        assert_eq!(report.spans(), &[span(DiffOp::Equal, "port = 80\n")]);
    }

    #[test]
    fn removed_directive_is_one_deletion() {
        let report = DiffReport::compute("a {{ x }} b", "a  b");

        assert_eq!(report.change_count(), 1);
        assert_eq!(
            report.spans(),
            &[
                span(DiffOp::Equal, "a "),
                span(DiffOp::Delete, "{{ x }}"),
                span(DiffOp::Equal, " b"),
            ]
        );
    }

    #[test]
    fn replaced_text_is_deletion_then_insertion() {
        let report = DiffReport::compute("x={{ 1 + 1 }}", "x=2");

        let ops: Vec<DiffOp> = report.spans().iter().map(|s| s.op).collect();
        assert_eq!(ops.first(), Some(&DiffOp::Equal));
        assert!(ops.contains(&DiffOp::Delete));
        assert!(ops.contains(&DiffOp::Insert));
    }

    #[test]
    fn spans_reassemble_both_sides() {
        let original = "user: {{ name }}\n{# note #}\nend\n";
        let rendered = "user: \n\nend\n";
        let report = DiffReport::compute(original, rendered);

        let old: String = report
            .spans()
            .iter()
            .filter(|s| s.op != DiffOp::Insert)
            .map(|s| s.text.as_str())
            .collect();
        let new: String = report
            .spans()
            .iter()
            .filter(|s| s.op != DiffOp::Delete)
            .map(|s| s.text.as_str())
            .collect();

        assert_eq!(old, original);
        assert_eq!(new, rendered);
    }

    #[test]
    fn plain_rendering_marks_changes() {
        let report = DiffReport::compute("a {{ x }} b", "a  b");
        assert_eq!(report.render(false), "a [-{{ x }}-] b");

        let report = DiffReport::compute("ab", "aXb");
        assert_eq!(report.render(false), "a{+X+}b");
    }

    #[test]
    fn colored_rendering_keeps_text() {
        let report = DiffReport::compute("a {{ x }} b", "a  b");
        let rendered = report.render(true);

        assert!(rendered.contains("{{ x }}"));
        assert!(!rendered.contains("[-"));
    }
}

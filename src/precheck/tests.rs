//! Tests for the pre-check validator.

use super::*;

fn doc(source: &str) -> TemplateDocument {
    TemplateDocument::from_source("file.conf.tmpl", source)
}

#[test]
fn test_plain_file_passes() {
    let source = "[server]\nhost = example.com\nport = 8080\n\n# braces { } are fine\n";
    assert_eq!(check(&doc(source)).unwrap(), Verdict::Passed);
}

#[test]
fn test_empty_file_passes() {
    assert_eq!(check(&doc("")).unwrap(), Verdict::Passed);
}

#[test]
fn test_file_without_trailing_newline_passes() {
    assert_eq!(check(&doc("no newline at end")).unwrap(), Verdict::Passed);
}

#[test]
fn test_unterminated_directive_fails_at_parse_stage() {
    let err = check(&doc("value = {{ oops\nmore text\n")).unwrap_err();

    assert!(matches!(err, PrepError::TemplateParse(_)), "got {err:?}");
    assert!(failure_preamble(&err).unwrap().starts_with("Failed parsing"));
}

#[test]
fn test_unknown_function_fails_at_exec_stage() {
    let err = check(&doc("result: {{ not_a_function() }}\n")).unwrap_err();

    assert!(matches!(err, PrepError::TemplateExec(_)), "got {err:?}");
    assert!(failure_preamble(&err).unwrap().starts_with("Failed executing"));
}

#[test]
fn test_accidental_variable_is_reported_as_diff() {
    let verdict = check(&doc("password = {{ secret }}\n")).unwrap();

    let Verdict::Altered(report) = verdict else {
        panic!("expected the file to be altered");
    };
    assert_eq!(report.change_count(), 1);
    assert_eq!(report.render(false), "password = [-{{ secret }}-]\n");
}

#[test]
fn test_accidental_comment_is_reported_as_diff() {
    let verdict = check(&doc("a {# b #} c\n")).unwrap();

    let Verdict::Altered(report) = verdict else {
        panic!("expected the file to be altered");
    };
    assert!(
        report
            .spans()
            .iter()
            .any(|s| s.op == DiffOp::Delete && s.text.contains("{# b #}"))
    );
}

#[test]
fn test_only_pre_check_errors_have_preambles() {
    let err = PrepError::DiffDetected { changes: 1 };
    assert!(failure_preamble(&err).unwrap().starts_with("The following difference(s)"));

    let err = PrepError::Usage("no input file specified".to_string());
    assert!(failure_preamble(&err).is_none());
}

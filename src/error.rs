//! Error types for the prep CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for prep operations.
///
/// Every variant is terminal: the process reports it and exits with the
/// code returned by [`PrepError::exit_code`].
#[derive(Error, Debug)]
pub enum PrepError {
    /// Wrong number of positional arguments or similar misuse.
    ///
    /// Reported together with the full usage text.
    #[error("{0}")]
    Usage(String),

    /// Argument parsing stopped inside clap: an unknown flag or missing value,
    /// or a `-help` / `-version` request.
    #[error("{0}")]
    Cli(#[from] clap::Error),

    /// A `-var` argument without `=` or with an empty name.
    #[error("invalid value \"{arg}\" for flag -var: {reason}")]
    MalformedVariable { arg: String, reason: &'static str },

    /// A `-var-file` argument that is empty or not a YAML file name.
    #[error("invalid value \"{path}\" for flag -var-file: {reason}")]
    InvalidVarFile { path: String, reason: &'static str },

    /// A variable file could not be read.
    #[error("failed to read variable file '{}': {source}", .path.display())]
    VarFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A variable file is not a YAML mapping of names to values.
    #[error("failed to parse variable file '{}': {message}", .path.display())]
    VarFileParse { path: PathBuf, message: String },

    /// The input file does not carry the `.tmpl` extension.
    #[error(
        "Invalid input filename '{}', expecting a template with a .tmpl file extension (e.g., myfile.conf.tmpl)",
        .0.display()
    )]
    InputFormat(PathBuf),

    /// The input file could not be read.
    #[error("failed to read input file '{}': {source}", .path.display())]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file already exists and `-force` was not given.
    #[error("file exists [{}], use -force to override", .0.display())]
    OutputExists(PathBuf),

    /// Writing the rendered output failed.
    #[error("failed to write output '{target}': {message}")]
    OutputWrite { target: String, message: String },

    /// The document could not be parsed as a template.
    #[error("failed to parse template: {0}")]
    TemplateParse(#[source] minijinja::Error),

    /// The parsed template failed while executing.
    #[error("failed to execute template: {0}")]
    TemplateExec(#[source] minijinja::Error),

    /// Pre-check found content that the template engine would alter.
    #[error("pre-check detected {changes} difference(s) between the file and its rendered form")]
    DiffDetected { changes: usize },
}

impl PrepError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            // clap reports -help and -version as errors that go to stdout.
            PrepError::Cli(err) if !err.use_stderr() => exit_codes::SUCCESS,
            PrepError::Usage(_) | PrepError::Cli(_) => exit_codes::USAGE_ERROR,
            PrepError::DiffDetected { .. } => exit_codes::CHECK_FAILURE,
            _ => exit_codes::FAILURE,
        }
    }

    /// Whether the full usage text should accompany this error.
    pub fn wants_usage(&self) -> bool {
        matches!(self, PrepError::Usage(_))
    }
}

/// Result type alias for prep operations.
pub type Result<T> = std::result::Result<T, PrepError>;

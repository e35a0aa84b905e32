//! CLI argument parsing for prep.
//!
//! Uses clap derive macros for declarative argument definitions. Flags are
//! written Go-style with a single dash (`-var`, `-write-file`); they are
//! rewritten to clap's `--` form before parsing, and the double-dash form is
//! accepted as well.
//!
//! Boolean flags also take an inline value, as in `-force=false`.
//!
//! `-var` and `-var-file` may be repeated and interleaved. Their relative
//! order decides which value wins, so it is taken from clap's value indices
//! while parsing and kept as one ordered list of [`VariableSource`]s.

use crate::error::{PrepError, Result};
use crate::vars::VariableSource;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

/// Flags recognised in single-dash form.
const LONG_FLAGS: &[&str] = &[
    "help",
    "version",
    "force",
    "pre-check",
    "var",
    "var-file",
    "write-file",
];

/// Flags whose value may be given as the next argument.
const VALUE_FLAGS: &[&str] = &["var", "var-file", "write-file"];

const EXAMPLES: &str = r#"Command examples:

Processes "my_file.conf.tmpl", using variables defined in the variables file
"my_vars.yaml" and defining/overriding the variable "username" and outputting
the result to the terminal:
  prep -var-file my_vars.yaml -var username=jbloggs my_file.conf.tmpl

... the same command, but writes specifically to the named file, "my_file.conf":
  prep -var-file my_vars.yaml -var username=jbloggs -write-file my_file.conf -force my_file.conf.tmpl

A useful command to check for any templating related issues before you start
adding any template syntax:
  prep -pre-check my_file.conf.tmpl"#;

/// Prep: render configuration templates from layered variables.
///
/// Variables given with -var and -var-file are applied in command-line order;
/// a later definition of the same name overrides an earlier one.
#[derive(Parser, Debug)]
#[command(name = "prep")]
#[command(version, about, long_about = None)]
#[command(override_usage = "prep [args] <input file>")]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Force file overwrite
    #[arg(
        long,
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        hide_default_value = true,
        hide_possible_values = true
    )]
    pub force: bool,

    /// Check a file for issues prior to editing as a template
    #[arg(
        long = "pre-check",
        value_name = "BOOL",
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new(),
        hide_default_value = true,
        hide_possible_values = true
    )]
    pub pre_check: bool,

    /// Define a template variable (e.g., -var name=value)
    #[arg(
        long = "var",
        value_name = "NAME=VALUE",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub vars: Vec<String>,

    /// Import template variables from a file (e.g., -var-file vars.yaml)
    #[arg(
        long = "var-file",
        value_name = "PATH",
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub var_files: Vec<String>,

    /// Output the interpolated template to a file
    #[arg(long = "write-file", value_name = "PATH", allow_hyphen_values = true)]
    pub write_file: Option<PathBuf>,

    /// Input template, named <name>.tmpl
    #[arg(value_name = "INPUT FILE")]
    pub inputs: Vec<PathBuf>,
}

/// A fully parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub force: bool,
    pub pre_check: bool,
    pub write_file: Option<PathBuf>,
    pub input: PathBuf,
    /// `-var` and `-var-file` occurrences in command-line order.
    pub sources: Vec<VariableSource>,
}

impl Invocation {
    /// Parse arguments from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::parse_from(std::env::args_os())
    }

    /// Parse an argument list whose first element is the program name.
    ///
    /// Help and version requests come back as [`PrepError::Cli`] carrying
    /// clap's rendered output; they exit successfully.
    pub fn parse_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let matches = Cli::command().try_get_matches_from(normalize_args(args))?;
        let cli = Cli::from_arg_matches(&matches)?;
        let sources = ordered_sources(&matches, &cli)?;

        let input = match <[PathBuf; 1]>::try_from(cli.inputs) {
            Ok([input]) => input,
            Err(inputs) if inputs.is_empty() => {
                return Err(PrepError::Usage("no input file specified".to_string()));
            }
            Err(_) => {
                return Err(PrepError::Usage(
                    "this command takes a maximum of one input file".to_string(),
                ));
            }
        };

        Ok(Self {
            force: cli.force,
            pre_check: cli.pre_check,
            write_file: cli.write_file,
            input,
            sources,
        })
    }
}

/// Full usage text, as printed by `-help`.
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

#[derive(Debug, Clone, Copy)]
enum SourceKind {
    Var,
    VarFile,
}

/// Interleave `-var` and `-var-file` values by their position on the command line.
///
/// Values are validated in that same order, so the first bad argument is the
/// one reported.
fn ordered_sources(matches: &ArgMatches, cli: &Cli) -> Result<Vec<VariableSource>> {
    let mut positioned: Vec<(usize, SourceKind, &str)> = Vec::new();

    if let Some(indices) = matches.indices_of("vars") {
        positioned.extend(
            indices
                .zip(&cli.vars)
                .map(|(index, value)| (index, SourceKind::Var, value.as_str())),
        );
    }
    if let Some(indices) = matches.indices_of("var_files") {
        positioned.extend(
            indices
                .zip(&cli.var_files)
                .map(|(index, value)| (index, SourceKind::VarFile, value.as_str())),
        );
    }

    positioned.sort_by_key(|(index, _, _)| *index);

    positioned
        .into_iter()
        .map(|(_, kind, value)| match kind {
            SourceKind::Var => VariableSource::assignment(value),
            SourceKind::VarFile => VariableSource::file(value),
        })
        .collect()
}

/// Rewrite single-dash long flags (`-var`) to clap's `--var` form.
///
/// The program name, values that follow a value-taking flag, and everything
/// after `--` are passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into);
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut expecting_value = false;
    let mut after_terminator = false;

    for arg in args {
        if expecting_value || after_terminator {
            expecting_value = false;
            normalized.push(arg);
            continue;
        }

        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };

        if text == "--" {
            after_terminator = true;
            normalized.push(arg);
            continue;
        }

        let (flag, double_dash) = match text.strip_prefix("--") {
            Some(flag) => (flag, true),
            None => match text.strip_prefix('-') {
                Some(flag) => (flag, false),
                None => {
                    normalized.push(arg);
                    continue;
                }
            },
        };

        let (name, has_inline_value) = match flag.split_once('=') {
            Some((name, _)) => (name, true),
            None => (flag, false),
        };

        if !LONG_FLAGS.contains(&name) {
            normalized.push(arg);
            continue;
        }

        expecting_value = !has_inline_value && VALUE_FLAGS.contains(&name);
        if double_dash {
            normalized.push(arg);
        } else {
            normalized.push(format!("-{}", text).into());
        }
    }

    normalized
}

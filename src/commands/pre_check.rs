//! Pre-check a file for accidental template syntax.

use crate::cli::Invocation;
use crate::error::{PrepError, Result};
use crate::precheck::{self, Verdict, failure_preamble};
use crate::template::TemplateDocument;
use std::io::IsTerminal;
use tracing::warn;

/// Run the pre-check on the input file and report the outcome on stdout.
///
/// Never renders with variables and never writes an output file.
pub fn cmd_pre_check(invocation: &Invocation) -> Result<()> {
    if invocation.write_file.is_some() || invocation.force {
        warn!("-write-file and -force are ignored with -pre-check");
    }
    if !invocation.sources.is_empty() {
        warn!(
            sources = invocation.sources.len(),
            "-var and -var-file are ignored with -pre-check"
        );
    }

    let document = TemplateDocument::load(&invocation.input)?;

    match precheck::check(&document) {
        Ok(Verdict::Passed) => {
            println!("File passed; no issues detected.");
            Ok(())
        }
        Ok(Verdict::Altered(report)) => {
            let err = PrepError::DiffDetected {
                changes: report.change_count(),
            };
            print_preamble(&err);
            println!("{}", report.render(std::io::stdout().is_terminal()));
            Err(err)
        }
        Err(err) => {
            print_preamble(&err);
            Err(err)
        }
    }
}

fn print_preamble(err: &PrepError) {
    if let Some(preamble) = failure_preamble(err) {
        println!("{}", preamble);
    }
}

//! Command implementations for prep.
//!
//! prep has two modes: render a template (the default) or pre-check a file
//! with `-pre-check`. This module routes a parsed [`Invocation`] to one of them.

mod pre_check;
mod render;

use crate::cli::Invocation;
use crate::error::Result;

/// Dispatch an invocation to its implementation.
pub fn dispatch(invocation: Invocation) -> Result<()> {
    if invocation.pre_check {
        pre_check::cmd_pre_check(&invocation)
    } else {
        render::cmd_render(&invocation)
    }
}

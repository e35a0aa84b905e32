//! Exit code constants for the prep CLI.
//!
//! Every failure exits with 1, matching the tool's documented contract:
//! - 0: Success (including `-help` and `-version`)
//! - 1: Bad arguments, unreadable input, variable errors, existing output,
//!   template failures, and pre-check mismatches
//!
//! The failure kinds keep separate names so call sites say what went wrong.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Any fatal runtime error.
pub const FAILURE: i32 = 1;

/// Wrong argument count, unknown flags, missing flag values.
pub const USAGE_ERROR: i32 = 1;

/// Pre-check found content the template engine would alter.
pub const CHECK_FAILURE: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_contract() {
        assert_eq!(SUCCESS, 0);
        assert_eq!(FAILURE, 1);
        assert_eq!(USAGE_ERROR, 1);
        assert_eq!(CHECK_FAILURE, 1);
    }

    #[test]
    fn failures_are_distinct_from_success() {
        for code in [FAILURE, USAGE_ERROR, CHECK_FAILURE] {
            assert_ne!(code, SUCCESS);
        }
    }
}

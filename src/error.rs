//! Typed precondition failures raised by the classification core.
//!
//! Every operation in the core is a pure computation, so the only failures are
//! caller contract violations. Application code wraps these in `anyhow`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContinuityError {
    #[error("{which} has no rows")]
    EmptyTable { which: &'static str },

    #[error(
        "{which} is not rectangular: row {row} has {found} cell(s), expected {expected}"
    )]
    InvalidShape {
        which: &'static str,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("sequences must have the same length (left={left}, right={right})")]
    LengthMismatch { left: usize, right: usize },
}

pub type Result<T, E = ContinuityError> = std::result::Result<T, E>;

pub(crate) fn ensure_same_len(left: usize, right: usize) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(ContinuityError::LengthMismatch { left, right })
    }
}

//! Contains the common [`ErrorKind`] trait used by all parsing errors to display user-facing
//! error messages.

use ariadne::{Color, Report};
use std::{fmt::Debug, ops::Range};

/// The color used to highlight expressions in error output.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur while processing user input.
pub trait ErrorKind: Debug + Send {
    /// Builds the report for this error.
    fn build_report(
        &self,
        src_id: &'static str,
        spans: &[Range<usize>],
    ) -> Report<(&'static str, Range<usize>)>;
}

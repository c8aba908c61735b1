pub mod kind;

use alg_error::ErrorKind;
use ariadne::{Report, Source};
use std::ops::Range;

/// A general parsing error.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given span and kind.
    pub fn new(span: Range<usize>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans: vec![span], kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report(&self) -> Report<(&'static str, Range<usize>)> {
        self.kind.build_report("input", &self.spans)
    }

    /// Render this error's report against the source it was produced from, writing to stderr.
    pub fn report_to_stderr(&self, input: &str) {
        self.build_report()
            .eprint(("input", Source::from(input)))
            .expect("writing to stderr cannot fail");
    }
}

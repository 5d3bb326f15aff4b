//! Extraction trace types for debugging adapter behavior.
//!
//! Trace types mirror the runtime extraction path of
//! [`Accumulator`](crate::Accumulator) but capture what happened instead of
//! what to do. Use `extract_with_trace()` to see which declarations were
//! consulted, what each produced, and what finally reached the aggregate
//! function.
//!
//! # Example
//!
//! ```ignore
//! let (result, trace) = accumulator.extract_with_trace(&tuple);
//! println!("shape={:?} outcome={}", trace.shape, trace.outcome);
//! for step in &trace.steps {
//!     println!("  {} -> {}", step.identifier, step.value);
//! }
//! ```

use std::fmt;

/// Which tuple shape the extraction saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleShape {
    /// A single fact payload.
    Simple,
    /// A composite inner sub-join result.
    Joined,
}

/// One source-variable lookup during a joined extraction.
#[derive(Clone, PartialEq, Eq)]
pub struct ExtractStep {
    /// The source-variable name that was looked up.
    pub identifier: String,
    /// The extracted value (or the error), in `Debug` form.
    pub value: String,
}

impl fmt::Debug for ExtractStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.identifier, self.value)
    }
}

/// Trace of one extraction.
///
/// # INV: `outcome` == `extract()` result
///
/// The traced extraction follows exactly the same path as the untraced one;
/// `outcome` is always the `Debug` form of what `extract()` would return
/// for the same tuple.
#[derive(Debug, Clone)]
pub struct ExtractTrace {
    /// The shape of the tuple that was extracted from.
    pub shape: TupleShape,
    /// Per-source-variable lookups, in source-variable-list order.
    /// Empty for simple tuples (there is nothing to look up).
    pub steps: Vec<ExtractStep>,
    /// Whether a binding expression ran over the extracted values.
    pub bound: bool,
    /// The final contribution value (or the error), in `Debug` form.
    pub outcome: String,
}

impl ExtractTrace {
    pub(crate) fn begin(shape: TupleShape, bound: bool) -> Self {
        Self {
            shape,
            steps: Vec::new(),
            bound,
            outcome: String::new(),
        }
    }

    pub(crate) fn step(&mut self, identifier: &str, value: &impl fmt::Debug) {
        self.steps.push(ExtractStep {
            identifier: identifier.to_string(),
            value: format!("{value:?}"),
        });
    }

    pub(crate) fn finish(&mut self, outcome: &impl fmt::Debug) {
        self.outcome = format!("{outcome:?}");
    }
}

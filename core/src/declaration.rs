//! `Declaration` — A named variable binding plus its extraction seam
//!
//! A declaration pairs an identifier (the variable name a rule binds) with
//! an [`Extractor`] that projects the bound value out of a fact payload.
//! The adapter matches configured source-variable names against declaration
//! identifiers when the input is a joined tuple.

use crate::{AccumulateError, Value};
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

/// Projects a value out of a fact payload.
///
/// This is the bridge between domain fact types (wrapped in
/// [`Value::Fact`](crate::Value)) and the erased values the aggregate
/// functions consume. Most extractors downcast the payload and read one
/// field.
///
/// # Errors
///
/// Field-access failures (wrong payload type, missing data) are evaluation
/// errors: they signal an authoring defect in the pattern, not an engine
/// defect, and propagate unmodified.
///
/// # Example
///
/// ```
/// use accrete::{ExtractFn, Extractor, Value};
///
/// let length = ExtractFn::new("string_length", |fact: &Value| {
///     fact.as_str()
///         .map(|s| Value::Int(s.len() as i64))
///         .ok_or_else(|| accrete::AccumulateError::Eval {
///             detail: format!("expected string, got {}", fact.type_name()),
///         })
/// });
///
/// assert_eq!(
///     length.extract(&Value::String("ann".into())).unwrap(),
///     Value::Int(3)
/// );
/// ```
pub trait Extractor: Send + Sync + Debug {
    /// Extract the declared value from the fact payload.
    fn extract(&self, fact: &Value) -> Result<Value, AccumulateError>;
}

// Blanket implementation for boxed extractors
impl Extractor for Box<dyn Extractor> {
    fn extract(&self, fact: &Value) -> Result<Value, AccumulateError> {
        (**self).extract(fact)
    }
}

/// Identity extractor: returns the payload unchanged.
///
/// The common case for sub-join positions that bind a whole value rather
/// than a projection of it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityExtractor;

impl Extractor for IdentityExtractor {
    fn extract(&self, fact: &Value) -> Result<Value, AccumulateError> {
        Ok(fact.clone())
    }
}

/// Closure adapter for [`Extractor`].
///
/// Carries a short label so traces and `Debug` output stay readable even
/// though the closure itself cannot be printed.
#[derive(Clone)]
pub struct ExtractFn {
    label: &'static str,
    f: Arc<dyn Fn(&Value) -> Result<Value, AccumulateError> + Send + Sync>,
}

impl ExtractFn {
    /// Wrap a closure as an extractor.
    pub fn new(
        label: &'static str,
        f: impl Fn(&Value) -> Result<Value, AccumulateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label,
            f: Arc::new(f),
        }
    }
}

impl Extractor for ExtractFn {
    fn extract(&self, fact: &Value) -> Result<Value, AccumulateError> {
        (self.f)(fact)
    }
}

impl Debug for ExtractFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExtractFn").field(&self.label).finish()
    }
}

/// A named variable binding: identifier + extraction function.
///
/// # Example
///
/// ```
/// use accrete::{Declaration, Value};
///
/// let age = Declaration::identity("age");
/// assert_eq!(age.identifier(), "age");
/// assert_eq!(age.extract(&Value::Int(30)).unwrap(), Value::Int(30));
/// ```
#[derive(Debug, Clone)]
pub struct Declaration {
    identifier: String,
    extractor: Arc<dyn Extractor>,
}

impl Declaration {
    /// Create a declaration with an explicit extractor.
    pub fn new(identifier: impl Into<String>, extractor: Arc<dyn Extractor>) -> Self {
        Self {
            identifier: identifier.into(),
            extractor,
        }
    }

    /// Create a declaration whose extractor returns the payload unchanged.
    pub fn identity(identifier: impl Into<String>) -> Self {
        Self::new(identifier, Arc::new(IdentityExtractor))
    }

    /// The variable name this declaration binds.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Apply this declaration's extractor to a fact payload.
    pub fn extract(&self, fact: &Value) -> Result<Value, AccumulateError> {
        self.extractor.extract(fact)
    }
}

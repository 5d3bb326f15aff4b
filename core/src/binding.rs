//! `Binding` — User expression evaluated over extracted values
//!
//! A bound adapter evaluates a user-supplied expression over the values it
//! extracted before forwarding the result to the aggregate function. On a
//! joined tuple the binding receives one argument per configured source
//! variable, in source-variable order; on a simple tuple it receives the
//! single fact payload.

use crate::{AccumulateError, Value};
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

/// A user-supplied expression over one or more extracted values.
///
/// # Errors
///
/// Evaluation failures signal an authoring defect in the rule's expression
/// and propagate unmodified to the caller.
///
/// # Example
///
/// ```
/// use accrete::{Binding, BindingFn, Value};
///
/// let uppercase = BindingFn::new("uppercase", |args: &[Value]| {
///     args[0]
///         .as_str()
///         .map(|s| Value::String(s.to_uppercase()))
///         .ok_or_else(|| accrete::AccumulateError::Eval {
///             detail: format!("expected string, got {}", args[0].type_name()),
///         })
/// });
///
/// let out = uppercase.eval(&[Value::String("ann".into())]).unwrap();
/// assert_eq!(out.as_str(), Some("ANN"));
/// ```
pub trait Binding: Send + Sync + Debug {
    /// Evaluate the expression over the extracted values.
    fn eval(&self, args: &[Value]) -> Result<Value, AccumulateError>;
}

// Blanket implementation for boxed bindings
impl Binding for Box<dyn Binding> {
    fn eval(&self, args: &[Value]) -> Result<Value, AccumulateError> {
        (**self).eval(args)
    }
}

/// Closure adapter for [`Binding`].
///
/// Carries a short label so adapter `Debug` output and traces can name the
/// expression.
#[derive(Clone)]
pub struct BindingFn {
    label: &'static str,
    f: Arc<dyn Fn(&[Value]) -> Result<Value, AccumulateError> + Send + Sync>,
}

impl BindingFn {
    /// Wrap a closure as a binding.
    pub fn new(
        label: &'static str,
        f: impl Fn(&[Value]) -> Result<Value, AccumulateError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            label,
            f: Arc::new(f),
        }
    }
}

impl Binding for BindingFn {
    fn eval(&self, args: &[Value]) -> Result<Value, AccumulateError> {
        (self.f)(args)
    }
}

impl Debug for BindingFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BindingFn").field(&self.label).finish()
    }
}

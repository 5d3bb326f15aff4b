//! `Accumulator` — Binds one aggregate function to one extraction configuration
//!
//! The accumulator is the object the matching network drives at its
//! accumulate-node lifecycle points. It owns no per-group state: every
//! operation takes the group's [`AccumulateContext`] explicitly, so a
//! single accumulator instance services arbitrarily many groups.
//!
//! Its job is normalization. Upstream delivers either a single fact payload
//! ([`Tuple::Simple`]) or a composite inner sub-join result
//! ([`Tuple::Joined`]); the accumulator reduces both to one contribution
//! value per matched fact and forwards it to the aggregate function.

use crate::{
    AccumulateContext, AccumulateError, AccumulateFunction, Binding, ExtractTrace, FactHandle,
    JoinedTuple, Tuple, TupleShape, Value, MAX_SOURCE_VARIABLES,
};
use std::sync::Arc;

/// The two extraction configurations.
///
/// One tagged union instead of two adapter types: the variant is fixed at
/// construction and dispatched by pattern match at extraction time.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// Forward the single extracted value unchanged.
    Unbound,
    /// Evaluate a binding expression over the extracted values first.
    Bound(Arc<dyn Binding>),
}

/// The accumulate-node adapter: one [`AccumulateFunction`] plus one
/// extraction configuration.
///
/// # Lifecycle
///
/// - [`create_context`](Self::create_context) when a group forms
/// - [`accumulate`](Self::accumulate) exactly once per newly matched fact
/// - [`reverse`](Self::reverse) on retraction, only when
///   [`supports_reverse`](Self::supports_reverse) is `true`
/// - [`result`](Self::result) whenever the current value is needed
///
/// # Statelessness
///
/// The accumulator holds configuration only. Per-group state lives in the
/// context the caller passes in; contexts of distinct groups must never be
/// interchanged (see [`GroupArena`](crate::GroupArena)).
///
/// # Example
///
/// ```
/// use accrete::{Accumulator, FactHandle, Tuple, Value};
/// # use std::any::Any;
/// # use std::sync::Arc;
/// # use accrete::{AccumulateContext, AccumulateError, AccumulateFunction};
/// # #[derive(Debug, Default)] struct CountContext { n: i64 }
/// # impl AccumulateContext for CountContext {
/// #     fn as_any(&self) -> &dyn Any { self }
/// #     fn as_any_mut(&mut self) -> &mut dyn Any { self }
/// # }
/// # #[derive(Debug)] struct Count;
/// # impl AccumulateFunction for Count {
/// #     fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
/// #         Ok(Box::new(CountContext::default()))
/// #     }
/// #     fn init(&self, ctx: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
/// #         accrete::downcast_context_mut::<CountContext>("count", ctx)?.n = 0;
/// #         Ok(())
/// #     }
/// #     fn accumulate(&self, ctx: &mut dyn AccumulateContext, _: Value) -> Result<(), AccumulateError> {
/// #         accrete::downcast_context_mut::<CountContext>("count", ctx)?.n += 1;
/// #         Ok(())
/// #     }
/// #     fn reverse(&self, ctx: &mut dyn AccumulateContext, _: Value) -> Result<(), AccumulateError> {
/// #         accrete::downcast_context_mut::<CountContext>("count", ctx)?.n -= 1;
/// #         Ok(())
/// #     }
/// #     fn result(&self, ctx: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
/// #         Ok(Value::Int(accrete::downcast_context::<CountContext>("count", ctx)?.n))
/// #     }
/// #     fn supports_reverse(&self) -> bool { true }
/// # }
/// let acc = Accumulator::unbound(Arc::new(Count), "order");
/// let mut ctx = acc.create_context().unwrap();
///
/// acc.accumulate(&Tuple::Simple(Value::Int(10)), FactHandle::new(1), ctx.as_mut())
///     .unwrap();
/// assert_eq!(acc.result(ctx.as_ref()).unwrap(), Value::Int(1));
/// ```
#[derive(Debug, Clone)]
pub struct Accumulator {
    function: Arc<dyn AccumulateFunction>,
    source_variables: Vec<String>,
    extraction: Extraction,
}

impl Accumulator {
    /// Create an accumulator; a `Some` binding selects the bound
    /// configuration, `None` the unbound one.
    pub fn new(
        function: Arc<dyn AccumulateFunction>,
        source_variables: Vec<String>,
        binding: Option<Arc<dyn Binding>>,
    ) -> Self {
        let extraction = match binding {
            Some(b) => Extraction::Bound(b),
            None => Extraction::Unbound,
        };
        Self {
            function,
            source_variables,
            extraction,
        }
    }

    /// Unbound accumulator over a single source variable.
    pub fn unbound(function: Arc<dyn AccumulateFunction>, source_variable: impl Into<String>) -> Self {
        Self::new(function, vec![source_variable.into()], None)
    }

    /// Bound accumulator: the binding runs over the extracted values before
    /// they reach the aggregate function.
    pub fn bound(
        function: Arc<dyn AccumulateFunction>,
        source_variables: Vec<String>,
        binding: Arc<dyn Binding>,
    ) -> Self {
        Self::new(function, source_variables, Some(binding))
    }

    /// The configured source-variable names, in extraction order.
    #[must_use]
    pub fn source_variables(&self) -> &[String] {
        &self.source_variables
    }

    /// Returns `true` if a binding expression is configured.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self.extraction, Extraction::Bound(_))
    }

    /// Whether the bound aggregate function supports incremental
    /// retraction. Pass-through of the function's capability flag.
    #[must_use]
    pub fn supports_reverse(&self) -> bool {
        self.function.supports_reverse()
    }

    /// Validate this accumulator's configuration.
    ///
    /// Call at rule-compile time to catch authoring errors early, before
    /// any tuple flows.
    ///
    /// # Errors
    ///
    /// - [`AccumulateError::NoSourceVariables`] — empty source-variable list
    /// - [`AccumulateError::UnboundArity`] — unbound configuration whose
    ///   list does not designate exactly one variable
    /// - [`AccumulateError::TooManySourceVariables`] — list longer than
    ///   [`MAX_SOURCE_VARIABLES`]
    pub fn validate(&self) -> Result<(), AccumulateError> {
        if self.source_variables.is_empty() {
            return Err(AccumulateError::NoSourceVariables);
        }
        if self.source_variables.len() > MAX_SOURCE_VARIABLES {
            return Err(AccumulateError::TooManySourceVariables {
                count: self.source_variables.len(),
                max: MAX_SOURCE_VARIABLES,
            });
        }
        if matches!(self.extraction, Extraction::Unbound) && self.source_variables.len() != 1 {
            return Err(AccumulateError::UnboundArity {
                count: self.source_variables.len(),
            });
        }
        Ok(())
    }

    /// Create and initialize a context for a newly formed group.
    ///
    /// # Errors
    ///
    /// Any failure during creation or initialization is wrapped into the
    /// single opaque [`AccumulateError::Init`]; the engine has no local
    /// recovery path, so the error propagates to the enclosing session.
    pub fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        let mut context = self
            .function
            .create_context()
            .map_err(AccumulateError::init)?;
        self.function
            .init(context.as_mut())
            .map_err(AccumulateError::init)?;
        Ok(context)
    }

    /// Fold one newly matched fact into the group's aggregate.
    ///
    /// Must be invoked exactly once per newly matched fact per group. The
    /// handle is the network's correlation token for a later
    /// [`reverse`](Self::reverse); the accumulator itself keeps no record
    /// of it.
    pub fn accumulate(
        &self,
        tuple: &Tuple,
        _handle: FactHandle,
        context: &mut dyn AccumulateContext,
    ) -> Result<(), AccumulateError> {
        let value = self.extract(tuple)?;
        self.function.accumulate(context, value)
    }

    /// Remove a retracted fact's contribution from the group's aggregate.
    ///
    /// Recomputes the same contribution value as the original
    /// [`accumulate`](Self::accumulate) call for this fact and forwards it
    /// to the function's inverse update.
    ///
    /// # Errors
    ///
    /// Fails fast with [`AccumulateError::ReverseUnsupported`] — without
    /// touching the context — when the bound function does not declare
    /// reverse support. Callers are required to gate on
    /// [`supports_reverse`](Self::supports_reverse).
    pub fn reverse(
        &self,
        tuple: &Tuple,
        _handle: FactHandle,
        context: &mut dyn AccumulateContext,
    ) -> Result<(), AccumulateError> {
        if !self.function.supports_reverse() {
            return Err(AccumulateError::ReverseUnsupported {
                function: format!("{:?}", self.function),
            });
        }
        let value = self.extract(tuple)?;
        self.function.reverse(context, value)
    }

    /// The group's current aggregate value.
    ///
    /// Never mutates the context; safe to call repeatedly.
    pub fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        self.function.result(context)
    }

    /// Compute the contribution value for one matched tuple.
    ///
    /// The normalization at the heart of the adapter:
    ///
    /// - *Joined* + bound: extract each configured source variable in
    ///   order, evaluate the binding over the array.
    /// - *Joined* + unbound: the single designated declaration's raw value.
    /// - *Simple* + bound: the binding evaluated over the payload alone.
    /// - *Simple* + unbound: the payload unchanged.
    pub fn extract(&self, tuple: &Tuple) -> Result<Value, AccumulateError> {
        self.extract_impl(tuple, None)
    }

    /// [`extract`](Self::extract), also capturing an [`ExtractTrace`].
    ///
    /// The traced result always equals the untraced one.
    pub fn extract_with_trace(&self, tuple: &Tuple) -> (Result<Value, AccumulateError>, ExtractTrace) {
        let shape = match tuple {
            Tuple::Simple(_) => TupleShape::Simple,
            Tuple::Joined(_) => TupleShape::Joined,
        };
        let mut trace = ExtractTrace::begin(shape, self.is_bound());
        let result = self.extract_impl(tuple, Some(&mut trace));
        trace.finish(&result);
        (result, trace)
    }

    fn extract_impl(
        &self,
        tuple: &Tuple,
        mut trace: Option<&mut ExtractTrace>,
    ) -> Result<Value, AccumulateError> {
        match (tuple, &self.extraction) {
            (Tuple::Joined(joined), Extraction::Bound(binding)) => {
                let mut args = Vec::with_capacity(self.source_variables.len());
                for name in &self.source_variables {
                    args.push(self.lookup(joined, name, trace.as_deref_mut())?);
                }
                binding.eval(&args)
            }
            (Tuple::Joined(joined), Extraction::Unbound) => {
                let [name] = self.source_variables.as_slice() else {
                    return Err(AccumulateError::UnboundArity {
                        count: self.source_variables.len(),
                    });
                };
                self.lookup(joined, name, trace)
            }
            (Tuple::Simple(fact), Extraction::Bound(binding)) => {
                binding.eval(std::slice::from_ref(fact))
            }
            (Tuple::Simple(fact), Extraction::Unbound) => Ok(fact.clone()),
        }
    }

    fn lookup(
        &self,
        joined: &JoinedTuple,
        name: &str,
        trace: Option<&mut ExtractTrace>,
    ) -> Result<Value, AccumulateError> {
        let extracted = joined
            .extract(name)
            .ok_or_else(|| AccumulateError::UnknownVariable {
                identifier: name.to_string(),
                available: joined.identifiers(),
            })?;
        if let Some(trace) = trace {
            trace.step(name, &extracted);
        }
        extracted
    }
}

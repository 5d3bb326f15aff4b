//! accrete - Incremental aggregation core for a RETE-family rule engine
//!
//! For every group of fact-tuples satisfying a join pattern, this crate
//! maintains a running aggregate (sum, count, collect, or any pluggable
//! aggregate) and updates it incrementally as facts are asserted or
//! retracted — no full rescan of the group on every change.
//!
//! # Architecture
//!
//! The type system uses a hybrid erasure approach:
//!
//! - [`Value`] — Erased data type (primitives + extensible `Fact` variant)
//! - [`Tuple`] — Tagged matched-input shape: `Simple` fact vs `Joined` sub-join result
//! - [`Declaration`] / [`Extractor`] — Named variable binding + projection out of a fact
//! - [`Binding`] — Optional user expression over the extracted values
//! - [`AccumulateFunction`] — Pluggable aggregate semantics (non-generic, shareable!)
//! - [`Accumulator`] — The accumulate-node adapter; stateless across groups
//! - [`GroupArena`] — Per-group context storage with explicit lifecycle hooks
//!
//! # Key Design Insights
//!
//! 1. **Type erasure at data level**: [`Value`] keeps [`AccumulateFunction`]
//!    non-generic, so the same `Sum` instance services every rule.
//!
//! 2. **Tuple shape as a tagged variant**: an accumulate node's upstream
//!    shape depends on whether the accumulated pattern contains an inner
//!    join; branching on `Tuple::{Simple, Joined}` lets one adapter serve
//!    both shapes uniformly.
//!
//! 3. **Stateless adapter, explicit contexts**: the [`Accumulator`] holds
//!    configuration only. Per-group mutable state is created when a group
//!    forms, passed in on every call, and discarded when the group
//!    vacates. Contexts of distinct groups are never conflated.
//!
//! # Example
//!
//! ```
//! use std::any::Any;
//! use std::sync::Arc;
//! use accrete::prelude::*;
//!
//! // A pluggable aggregate: integer sum with algebraic inverse.
//! #[derive(Debug, Default)]
//! struct SumContext { total: i64 }
//!
//! impl AccumulateContext for SumContext {
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//!
//! #[derive(Debug)]
//! struct Sum;
//!
//! impl AccumulateFunction for Sum {
//!     fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
//!         Ok(Box::new(SumContext::default()))
//!     }
//!     fn init(&self, ctx: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
//!         accrete::downcast_context_mut::<SumContext>("sum", ctx)?.total = 0;
//!         Ok(())
//!     }
//!     fn accumulate(&self, ctx: &mut dyn AccumulateContext, value: Value) -> Result<(), AccumulateError> {
//!         let v = value.as_int().ok_or(AccumulateError::TypeMismatch {
//!             expected: "int",
//!             actual: value.type_name(),
//!         })?;
//!         accrete::downcast_context_mut::<SumContext>("sum", ctx)?.total += v;
//!         Ok(())
//!     }
//!     fn reverse(&self, ctx: &mut dyn AccumulateContext, value: Value) -> Result<(), AccumulateError> {
//!         let v = value.as_int().ok_or(AccumulateError::TypeMismatch {
//!             expected: "int",
//!             actual: value.type_name(),
//!         })?;
//!         accrete::downcast_context_mut::<SumContext>("sum", ctx)?.total -= v;
//!         Ok(())
//!     }
//!     fn result(&self, ctx: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
//!         Ok(Value::Int(accrete::downcast_context::<SumContext>("sum", ctx)?.total))
//!     }
//!     fn supports_reverse(&self) -> bool { true }
//! }
//!
//! // Adapter over the "age" variable, no binding.
//! let acc = Accumulator::unbound(Arc::new(Sum), "age");
//! let mut ctx = acc.create_context().unwrap();
//!
//! for (i, age) in [10i64, 20, 30].into_iter().enumerate() {
//!     acc.accumulate(&Tuple::Simple(Value::Int(age)), FactHandle::new(i as u64), ctx.as_mut())
//!         .unwrap();
//! }
//! assert_eq!(acc.result(ctx.as_ref()).unwrap(), Value::Int(60));
//!
//! // A fact is retracted: subtract its contribution instead of rescanning.
//! assert!(acc.supports_reverse());
//! acc.reverse(&Tuple::Simple(Value::Int(20)), FactHandle::new(1), ctx.as_mut())
//!     .unwrap();
//! assert_eq!(acc.result(ctx.as_ref()).unwrap(), Value::Int(40));
//! ```
//!
//! # Extensions
//!
//! - [`accrete-aggregates`](https://docs.rs/accrete-aggregates) — Standard
//!   aggregate functions: sum, count, average, min, max, collect

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod accumulator;
mod binding;
mod declaration;
mod function;
mod groups;
mod trace;
mod tuple;
mod value;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

// Core types
pub use accumulator::{Accumulator, Extraction};
pub use binding::{Binding, BindingFn};
pub use declaration::{Declaration, ExtractFn, Extractor, IdentityExtractor};
pub use function::{
    downcast_context, downcast_context_mut, AccumulateContext, AccumulateFunction,
};
pub use groups::{GroupArena, GroupKey};
pub use tuple::{FactHandle, JoinedTuple, Tuple};
pub use value::{CustomFact, Value};

// Trace types
pub use trace::{ExtractStep, ExtractTrace, TupleShape};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use accrete::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Traits
        AccumulateContext,
        // Errors
        AccumulateError,
        AccumulateFunction,
        // Core types
        Accumulator,
        Binding,
        BindingFn,
        CustomFact,
        Declaration,
        ExtractFn,
        // Trace types
        ExtractTrace,
        Extractor,
        FactHandle,
        GroupArena,
        GroupKey,
        JoinedTuple,
        Tuple,
        TupleShape,
        Value,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of source variables one accumulator may extract.
///
/// Extraction cost is proportional to this arity; the limit keeps a
/// misconfigured rule from turning every fact assertion into a wide scan.
/// Validated at rule-compile time via [`Accumulator::validate`], not at
/// evaluation time.
pub const MAX_SOURCE_VARIABLES: usize = 64;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from accumulator configuration, context lifecycle, and extraction.
///
/// Configuration errors (`NoSourceVariables`, `UnboundArity`,
/// `TooManySourceVariables`) are caught at rule-compile time via
/// [`Accumulator::validate`]. Everything else is terminal for the current
/// accumulate/reverse/create call; no retries are performed anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccumulateError {
    /// Context creation or initialization failed.
    ///
    /// There is no local recovery path; the error carries the underlying
    /// failure as an opaque message and aborts the current match.
    Init {
        /// The underlying error message.
        source: String,
    },
    /// A binding or extractor failed during extraction.
    ///
    /// Signals an authoring defect in the pattern or expression, not an
    /// engine defect.
    Eval {
        /// The underlying error message.
        detail: String,
    },
    /// An aggregate function was fed a value of an incompatible type.
    TypeMismatch {
        /// The type the aggregate accepts.
        expected: &'static str,
        /// The type it was given.
        actual: &'static str,
    },
    /// A configured source variable has no matching declaration in the
    /// joined tuple.
    UnknownVariable {
        /// The missing variable name.
        identifier: String,
        /// Identifiers that ARE declared (for self-correcting error messages).
        available: Vec<String>,
    },
    /// An unbound accumulator's source-variable list must designate exactly
    /// one declaration.
    UnboundArity {
        /// Actual length of the source-variable list.
        count: usize,
    },
    /// The source-variable list is empty.
    NoSourceVariables,
    /// The source-variable list exceeds [`MAX_SOURCE_VARIABLES`].
    TooManySourceVariables {
        /// Actual length of the source-variable list.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// `reverse` was invoked on a function that does not support it.
    ///
    /// A caller contract violation: gate on `supports_reverse()` first.
    /// The context is left untouched.
    ReverseUnsupported {
        /// Debug name of the offending function.
        function: String,
    },
    /// A function received a context of a foreign concrete type — group A's
    /// context was handed to group B's function.
    ForeignContext {
        /// The function that rejected the context.
        function: &'static str,
    },
    /// `group_formed` was called for a key that is already live.
    DuplicateGroup {
        /// Display form of the offending key.
        key: String,
    },
}

impl AccumulateError {
    /// Wrap any failure at the context-creation boundary into the single
    /// opaque [`Init`](Self::Init) variant.
    pub(crate) fn init(source: impl std::fmt::Display) -> Self {
        Self::Init {
            source: source.to_string(),
        }
    }
}

impl std::fmt::Display for AccumulateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init { source } => {
                write!(f, "aggregate context creation failed: {source}")
            }
            Self::Eval { detail } => {
                write!(f, "extraction failed: {detail}")
            }
            Self::TypeMismatch { expected, actual } => {
                write!(f, "aggregate expects {expected} values, got {actual}")
            }
            Self::UnknownVariable {
                identifier,
                available,
            } => {
                write!(f, "unknown source variable \"{identifier}\"")?;
                if available.is_empty() {
                    write!(f, " — the joined tuple declares no variables")
                } else {
                    write!(f, " — declared: {}", available.join(", "))
                }
            }
            Self::UnboundArity { count } => {
                write!(
                    f,
                    "an accumulator without a binding must name exactly one \
                     source variable, got {count}"
                )
            }
            Self::NoSourceVariables => {
                write!(f, "accumulator names no source variables")
            }
            Self::TooManySourceVariables { count, max } => {
                write!(
                    f,
                    "accumulator names {count} source variables, but maximum allowed is {max}"
                )
            }
            Self::ReverseUnsupported { function } => {
                write!(
                    f,
                    "reverse called on {function}, which does not support it \
                     — check supports_reverse() and recompute the group instead"
                )
            }
            Self::ForeignContext { function } => {
                write!(
                    f,
                    "{function} received a context it did not create — group \
                     contexts must not be interchanged"
                )
            }
            Self::DuplicateGroup { key } => {
                write!(f, "{key} is already live — vacate it before re-forming")
            }
        }
    }
}

impl std::error::Error for AccumulateError {}

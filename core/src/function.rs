//! `AccumulateFunction` — The pluggable aggregate seam
//!
//! Concrete aggregate algorithms (sum, count, collect, …) live outside the
//! core; this module defines only the contract the adapter drives. A
//! function owns its context type, and the context is opaque to everything
//! but that function: the core moves it around as `Box<dyn
//! AccumulateContext>` and the function downcasts via `as_any_mut`.

use crate::{AccumulateError, Value};
use std::any::Any;
use std::fmt::Debug;

/// Opaque mutable state for one tuple-group.
///
/// Created when a group first forms, mutated only through the owning
/// [`AccumulateFunction`], read by `result` at any time after init, and
/// discarded when the group ceases to exist. Never shared across groups.
///
/// The `Any` supertrait gives functions their downcast path; `Send` lets
/// the host session migrate state between traversal passes.
pub trait AccumulateContext: Any + Send + Debug {
    /// Returns a reference to `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Pluggable aggregate semantics.
///
/// The adapter drives this contract at the matching network's lifecycle
/// points: context creation when a group forms, `accumulate` once per newly
/// matched fact, `reverse` on retraction when supported, `result` whenever
/// the current aggregate value is needed.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: one function instance is shared
/// by every group its adapter services.
///
/// # Capability Contract
///
/// `reverse` may only be called when [`supports_reverse`] returns `true`.
/// Callers are required to check first; the adapter fails fast otherwise.
/// Genuinely non-invertible aggregates (min, max) must report `false` and
/// let the host fall back to full group recomputation.
///
/// [`supports_reverse`]: AccumulateFunction::supports_reverse
pub trait AccumulateFunction: Send + Sync + Debug {
    /// Create a fresh, uninitialized context for one group.
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError>;

    /// Initialize (or re-initialize) a context to the empty-group state.
    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError>;

    /// Fold one contribution value into the context.
    ///
    /// # Errors
    ///
    /// Returns an evaluation error when the value's type is incompatible
    /// with this aggregate.
    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError>;

    /// Remove one previously accumulated contribution from the context.
    ///
    /// Only called when [`supports_reverse`](Self::supports_reverse) is
    /// `true`. Must restore the aggregate to the state it would have had if
    /// that contribution had never occurred (exactly for exact aggregates;
    /// see the per-aggregate policy on float inversion).
    fn reverse(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError>;

    /// The current aggregate value. Never mutates the context.
    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError>;

    /// Whether this aggregate supports incremental retraction.
    ///
    /// Queried by the matching network to decide between incremental
    /// retraction and full group recomputation.
    fn supports_reverse(&self) -> bool {
        false
    }
}

// Blanket implementation for boxed functions
impl AccumulateFunction for Box<dyn AccumulateFunction> {
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        (**self).create_context()
    }

    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
        (**self).init(context)
    }

    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        (**self).accumulate(context, value)
    }

    fn reverse(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        (**self).reverse(context, value)
    }

    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        (**self).result(context)
    }

    fn supports_reverse(&self) -> bool {
        (**self).supports_reverse()
    }
}

/// Downcast a context to a concrete type, or fail with the opaque init
/// error naming the owning function.
///
/// A context of the wrong concrete type can only mean the host handed group
/// A's context to group B's function, so the message names the function to
/// aid that diagnosis.
///
/// # Example
///
/// ```ignore
/// fn accumulate(&self, context: &mut dyn AccumulateContext, value: Value) -> Result<(), AccumulateError> {
///     let ctx = downcast_context_mut::<SumContext>("sum", context)?;
///     // fold value into ctx
/// }
/// ```
pub fn downcast_context_mut<'a, C: AccumulateContext>(
    function: &'static str,
    context: &'a mut dyn AccumulateContext,
) -> Result<&'a mut C, AccumulateError> {
    context
        .as_any_mut()
        .downcast_mut::<C>()
        .ok_or(AccumulateError::ForeignContext { function })
}

/// Shared-reference counterpart of [`downcast_context_mut`], for `result`.
pub fn downcast_context<'a, C: AccumulateContext>(
    function: &'static str,
    context: &'a dyn AccumulateContext,
) -> Result<&'a C, AccumulateError> {
    context
        .as_any()
        .downcast_ref::<C>()
        .ok_or(AccumulateError::ForeignContext { function })
}

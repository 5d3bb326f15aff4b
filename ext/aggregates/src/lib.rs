//! accrete-aggregates: Standard aggregate functions for accrete
//!
//! The core defines only the [`AccumulateFunction`](accrete::AccumulateFunction)
//! contract; this crate supplies the functions rule authors actually reach
//! for. Each one is a small stateless struct paired with a private context
//! type that holds the per-group running state.
//!
//! # Reverse support
//!
//! | Function  | `supports_reverse` | Policy                                        |
//! |-----------|--------------------|-----------------------------------------------|
//! | [`Sum`]   | yes                | exact for integers, approximate for floats    |
//! | [`Count`] | yes                | exact                                         |
//! | [`Average`] | yes              | approximate for floats                        |
//! | [`Min`]   | no                 | losing the minimum would require a rescan     |
//! | [`Max`]   | no                 | losing the maximum would require a rescan     |
//! | [`Collect`] | yes              | removes the first element equal to the value  |
//!
//! Min and max are genuinely non-invertible: once the extreme element is
//! retracted, the next-best cannot be recovered from the running state.
//! They report `supports_reverse() == false` so the host falls back to
//! full group recomputation.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use accrete::{Accumulator, FactHandle, Tuple, Value};
//! use accrete_aggregates::Sum;
//!
//! let acc = Accumulator::unbound(Arc::new(Sum), "amount");
//! let mut ctx = acc.create_context().unwrap();
//!
//! for (i, amount) in [10i64, 20, 30].into_iter().enumerate() {
//!     acc.accumulate(&Tuple::Simple(Value::Int(amount)), FactHandle::new(i as u64), ctx.as_mut())
//!         .unwrap();
//! }
//! assert_eq!(acc.result(ctx.as_ref()).unwrap(), Value::Int(60));
//! ```

mod average;
mod collect;
mod count;
mod minmax;
mod sum;

pub use average::Average;
pub use collect::Collect;
pub use count::Count;
pub use minmax::{Max, Min};
pub use sum::Sum;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Average, Collect, Count, Max, Min, Sum};
}

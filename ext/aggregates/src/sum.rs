//! Sum aggregate.

use accrete::{
    downcast_context, downcast_context_mut, AccumulateContext, AccumulateError,
    AccumulateFunction, Value,
};
use std::any::Any;

/// Running numeric total.
///
/// Integer contributions are summed exactly in `i64`; the first float
/// contribution promotes the result to `f64`. The promotion is sticky only
/// while float contributions remain: reversing the last float drops the
/// result back to the exact integer total.
///
/// Reverse is the algebraic inverse. For floats that inversion is
/// approximate (catastrophic cancellation can leave residue); hosts needing
/// bit-exact float totals should recompute instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

#[derive(Debug, Default)]
struct SumContext {
    int_total: i64,
    float_total: f64,
    float_contribs: usize,
}

impl AccumulateContext for SumContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl AccumulateFunction for Sum {
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        Ok(Box::new(SumContext::default()))
    }

    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
        *downcast_context_mut::<SumContext>("sum", context)? = SumContext::default();
        Ok(())
    }

    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        let ctx = downcast_context_mut::<SumContext>("sum", context)?;
        match value {
            Value::Int(i) => ctx.int_total += i,
            Value::Float(f) => {
                ctx.float_total += f;
                ctx.float_contribs += 1;
            }
            other => {
                return Err(AccumulateError::TypeMismatch {
                    expected: "number",
                    actual: other.type_name(),
                })
            }
        }
        Ok(())
    }

    fn reverse(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        let ctx = downcast_context_mut::<SumContext>("sum", context)?;
        match value {
            Value::Int(i) => ctx.int_total -= i,
            Value::Float(f) => {
                ctx.float_total -= f;
                ctx.float_contribs = ctx.float_contribs.saturating_sub(1);
            }
            other => {
                return Err(AccumulateError::TypeMismatch {
                    expected: "number",
                    actual: other.type_name(),
                })
            }
        }
        Ok(())
    }

    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        let ctx = downcast_context::<SumContext>("sum", context)?;
        if ctx.float_contribs == 0 {
            Ok(Value::Int(ctx.int_total))
        } else {
            Ok(Value::Float(ctx.int_total as f64 + ctx.float_total))
        }
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

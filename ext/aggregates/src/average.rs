//! Average aggregate.

use accrete::{
    downcast_context, downcast_context_mut, AccumulateContext, AccumulateError,
    AccumulateFunction, Value,
};
use std::any::Any;

/// Arithmetic mean of the numeric contributions.
///
/// Maintained as running sum plus count, so reverse subtracts exactly one
/// contribution. Integers are promoted to `f64`. The average of an empty
/// group is [`Value::None`], not zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Average;

#[derive(Debug, Default)]
struct AverageContext {
    sum: f64,
    count: u64,
}

impl AccumulateContext for AverageContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn numeric(value: &Value) -> Result<f64, AccumulateError> {
    value.as_number().ok_or(AccumulateError::TypeMismatch {
        expected: "number",
        actual: value.type_name(),
    })
}

impl AccumulateFunction for Average {
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        Ok(Box::new(AverageContext::default()))
    }

    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
        *downcast_context_mut::<AverageContext>("average", context)? = AverageContext::default();
        Ok(())
    }

    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        let v = numeric(&value)?;
        let ctx = downcast_context_mut::<AverageContext>("average", context)?;
        ctx.sum += v;
        ctx.count += 1;
        Ok(())
    }

    fn reverse(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        let v = numeric(&value)?;
        let ctx = downcast_context_mut::<AverageContext>("average", context)?;
        ctx.sum -= v;
        ctx.count = ctx.count.saturating_sub(1);
        Ok(())
    }

    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        let ctx = downcast_context::<AverageContext>("average", context)?;
        if ctx.count == 0 {
            Ok(Value::None)
        } else {
            Ok(Value::Float(ctx.sum / ctx.count as f64))
        }
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

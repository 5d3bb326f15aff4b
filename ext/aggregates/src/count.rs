//! Count aggregate.

use accrete::{
    downcast_context, downcast_context_mut, AccumulateContext, AccumulateError,
    AccumulateFunction, Value,
};
use std::any::Any;

/// Number of matched facts in the group.
///
/// The contribution value is ignored entirely; only arrival and departure
/// matter, so any value type counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

#[derive(Debug, Default)]
struct CountContext {
    n: i64,
}

impl AccumulateContext for CountContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl AccumulateFunction for Count {
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        Ok(Box::new(CountContext::default()))
    }

    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
        downcast_context_mut::<CountContext>("count", context)?.n = 0;
        Ok(())
    }

    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        _value: Value,
    ) -> Result<(), AccumulateError> {
        downcast_context_mut::<CountContext>("count", context)?.n += 1;
        Ok(())
    }

    fn reverse(
        &self,
        context: &mut dyn AccumulateContext,
        _value: Value,
    ) -> Result<(), AccumulateError> {
        downcast_context_mut::<CountContext>("count", context)?.n -= 1;
        Ok(())
    }

    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        Ok(Value::Int(
            downcast_context::<CountContext>("count", context)?.n,
        ))
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

//! Collect aggregate.

use accrete::{
    downcast_context, downcast_context_mut, AccumulateContext, AccumulateError,
    AccumulateFunction, Value,
};
use std::any::Any;

/// Collect every contribution into an ordered list.
///
/// Order-sensitive: the result reflects accumulation order. Reverse removes
/// the first element equal to the retracted contribution — for fact-payload
/// contributions equality is `Arc` identity, so exactly the retracted
/// fact's entry is removed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collect;

#[derive(Debug, Default)]
struct CollectContext {
    items: Vec<Value>,
}

impl AccumulateContext for CollectContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl AccumulateFunction for Collect {
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        Ok(Box::new(CollectContext::default()))
    }

    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
        downcast_context_mut::<CollectContext>("collect", context)?
            .items
            .clear();
        Ok(())
    }

    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        downcast_context_mut::<CollectContext>("collect", context)?
            .items
            .push(value);
        Ok(())
    }

    fn reverse(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        let items = &mut downcast_context_mut::<CollectContext>("collect", context)?.items;
        match items.iter().position(|v| *v == value) {
            Some(index) => {
                items.remove(index);
                Ok(())
            }
            None => Err(AccumulateError::Eval {
                detail: format!("reverse of uncollected value {value:?}"),
            }),
        }
    }

    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        Ok(Value::List(
            downcast_context::<CollectContext>("collect", context)?
                .items
                .clone(),
        ))
    }

    fn supports_reverse(&self) -> bool {
        true
    }
}

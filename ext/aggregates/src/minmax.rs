//! Min and max aggregates.
//!
//! Both are order-tracking aggregates over numbers or strings. Neither
//! supports reverse: the running state keeps only the current extreme, so
//! retracting that element would require a rescan of the group — exactly
//! the fallback the capability flag tells the host to take.

use accrete::{
    downcast_context, downcast_context_mut, AccumulateContext, AccumulateError,
    AccumulateFunction, Value,
};
use std::any::Any;
use std::cmp::Ordering;

/// Compare two contributions: numerically when both are numbers (ints and
/// floats compare cross-type), lexicographically when both are strings.
fn compare(a: &Value, b: &Value) -> Result<Ordering, AccumulateError> {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.partial_cmp(&y).ok_or(AccumulateError::Eval {
            detail: "NaN is not orderable".to_string(),
        });
    }
    if let (Some(x), Some(y)) = (a.as_str(), b.as_str()) {
        return Ok(x.cmp(y));
    }
    Err(AccumulateError::TypeMismatch {
        expected: "number or string",
        actual: b.type_name(),
    })
}

#[derive(Debug, Default)]
struct ExtremeContext {
    best: Option<Value>,
}

impl AccumulateContext for ExtremeContext {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn fold_extreme(
    function: &'static str,
    context: &mut dyn AccumulateContext,
    value: Value,
    keep_incoming: impl Fn(Ordering) -> bool,
) -> Result<(), AccumulateError> {
    if !(value.is_int() || value.is_float() || value.is_string()) {
        return Err(AccumulateError::TypeMismatch {
            expected: "number or string",
            actual: value.type_name(),
        });
    }
    let ctx = downcast_context_mut::<ExtremeContext>(function, context)?;
    match &ctx.best {
        None => ctx.best = Some(value),
        Some(best) => {
            if keep_incoming(compare(best, &value)?) {
                ctx.best = Some(value);
            }
        }
    }
    Ok(())
}

fn extreme_result(
    function: &'static str,
    context: &dyn AccumulateContext,
) -> Result<Value, AccumulateError> {
    Ok(downcast_context::<ExtremeContext>(function, context)?
        .best
        .clone()
        .unwrap_or(Value::None))
}

/// Smallest contribution seen; [`Value::None`] for an empty group.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl AccumulateFunction for Min {
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        Ok(Box::new(ExtremeContext::default()))
    }

    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
        downcast_context_mut::<ExtremeContext>("min", context)?.best = None;
        Ok(())
    }

    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        fold_extreme("min", context, value, |ord| ord == Ordering::Greater)
    }

    fn reverse(
        &self,
        _context: &mut dyn AccumulateContext,
        _value: Value,
    ) -> Result<(), AccumulateError> {
        Err(AccumulateError::ReverseUnsupported {
            function: "Min".to_string(),
        })
    }

    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        extreme_result("min", context)
    }
}

/// Largest contribution seen; [`Value::None`] for an empty group.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl AccumulateFunction for Max {
    fn create_context(&self) -> Result<Box<dyn AccumulateContext>, AccumulateError> {
        Ok(Box::new(ExtremeContext::default()))
    }

    fn init(&self, context: &mut dyn AccumulateContext) -> Result<(), AccumulateError> {
        downcast_context_mut::<ExtremeContext>("max", context)?.best = None;
        Ok(())
    }

    fn accumulate(
        &self,
        context: &mut dyn AccumulateContext,
        value: Value,
    ) -> Result<(), AccumulateError> {
        fold_extreme("max", context, value, |ord| ord == Ordering::Less)
    }

    fn reverse(
        &self,
        _context: &mut dyn AccumulateContext,
        _value: Value,
    ) -> Result<(), AccumulateError> {
        Err(AccumulateError::ReverseUnsupported {
            function: "Max".to_string(),
        })
    }

    fn result(&self, context: &dyn AccumulateContext) -> Result<Value, AccumulateError> {
        extreme_result("max", context)
    }
}

//! accrete-test: Conformance harness for the accrete aggregation core
//!
//! Provides name-keyed builtin aggregate functions and bindings so YAML
//! fixtures can describe an accumulator without any Rust code, plus the
//! fixture schema and runner itself (feature = `"fixtures"`, on by
//! default).
//!
//! # Example
//!
//! ```
//! use accrete_test::prelude::*;
//!
//! let function = builtin_function("sum").unwrap();
//! assert!(function.supports_reverse());
//!
//! let binding = builtin_binding("uppercase").unwrap();
//! let out = binding.eval(&[Value::String("ann".into())]).unwrap();
//! assert_eq!(out.as_str(), Some("ANN"));
//! ```

use accrete::{AccumulateError, AccumulateFunction, Binding, BindingFn, Value};
use accrete_aggregates::{Average, Collect, Count, Max, Min, Sum};
use std::sync::Arc;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Look up a builtin aggregate function by fixture name.
///
/// Known names: `sum`, `count`, `average`, `min`, `max`, `collect`.
#[must_use]
pub fn builtin_function(name: &str) -> Option<Arc<dyn AccumulateFunction>> {
    match name {
        "sum" => Some(Arc::new(Sum)),
        "count" => Some(Arc::new(Count)),
        "average" => Some(Arc::new(Average)),
        "min" => Some(Arc::new(Min)),
        "max" => Some(Arc::new(Max)),
        "collect" => Some(Arc::new(Collect)),
        _ => None,
    }
}

/// Look up a builtin binding expression by fixture name.
///
/// Known names:
/// - `uppercase` — uppercases its single string argument
/// - `length` — length of its single string argument
/// - `concat` — stringifies and concatenates all arguments in order
#[must_use]
pub fn builtin_binding(name: &str) -> Option<Arc<dyn Binding>> {
    match name {
        "uppercase" => Some(Arc::new(BindingFn::new("uppercase", |args| {
            single_str(args).map(|s| Value::String(s.to_uppercase()))
        }))),
        "length" => Some(Arc::new(BindingFn::new("length", |args| {
            single_str(args).map(|s| Value::Int(s.len() as i64))
        }))),
        "concat" => Some(Arc::new(BindingFn::new("concat", |args| {
            let mut out = String::new();
            for arg in args {
                out.push_str(&stringify(arg)?);
            }
            Ok(Value::String(out))
        }))),
        _ => None,
    }
}

fn single_str(args: &[Value]) -> Result<&str, AccumulateError> {
    match args {
        [v] => v.as_str().ok_or_else(|| AccumulateError::Eval {
            detail: format!("expected string, got {}", v.type_name()),
        }),
        _ => Err(AccumulateError::Eval {
            detail: format!("expected one argument, got {}", args.len()),
        }),
    }
}

fn stringify(value: &Value) -> Result<String, AccumulateError> {
    match value {
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::String(s) => Ok(s.clone()),
        other => Err(AccumulateError::Eval {
            detail: format!("cannot stringify {}", other.type_name()),
        }),
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{builtin_binding, builtin_function};
    pub use accrete::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_function_names() {
        for name in ["sum", "count", "average", "min", "max", "collect"] {
            assert!(builtin_function(name).is_some(), "missing builtin {name}");
        }
        assert!(builtin_function("median").is_none());
    }

    #[test]
    fn test_builtin_binding_names() {
        for name in ["uppercase", "length", "concat"] {
            assert!(builtin_binding(name).is_some(), "missing builtin {name}");
        }
        assert!(builtin_binding("reverse_string").is_none());
    }

    #[test]
    fn test_concat_stringifies_in_order() {
        let concat = builtin_binding("concat").unwrap();
        let out = concat
            .eval(&[Value::String("ann".into()), Value::Int(30)])
            .unwrap();
        assert_eq!(out.as_str(), Some("ann30"));
    }

    #[test]
    fn test_length_rejects_non_string() {
        let length = builtin_binding("length").unwrap();
        let err = length.eval(&[Value::Int(3)]).unwrap_err();
        assert!(matches!(err, AccumulateError::Eval { .. }));
    }
}

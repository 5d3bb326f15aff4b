//! `Value` — Type-erased data that flows between extraction and aggregate functions
//!
//! Declarations extract `Value`s from matched tuples, bindings transform them,
//! and aggregate functions consume and produce them. Erasing the type at the
//! data level keeps [`AccumulateFunction`](crate::AccumulateFunction)
//! non-generic, so the same `Sum` instance can service any rule.
//!
//! # Extensibility via `Fact`
//!
//! Domain fact payloads that are not covered by the primitives implement
//! [`CustomFact`] and are wrapped in `Value::Fact(Arc::new(your_type))`.

use std::any::Any;
use std::fmt::Debug;
use std::hash::Hasher;
use std::sync::Arc;

/// Extension trait for domain fact payloads carried inside a [`Value`].
///
/// Working memory stores arbitrary user types; this trait lets them flow
/// through the extraction pipeline without the core knowing their shape.
/// Declarations downcast via [`CustomFact::as_any`] to project fields out.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`: a single adapter instance may
/// service many groups, and the host session may move evaluation between
/// threads across passes.
///
/// # Example
///
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use accrete::{CustomFact, Value};
///
/// #[derive(Debug)]
/// struct Person {
///     age: i64,
/// }
///
/// impl CustomFact for Person {
///     fn fact_type_name(&self) -> &'static str {
///         "person"
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let value = Value::Fact(Arc::new(Person { age: 30 }));
/// assert!(value.is_fact());
/// assert_eq!(value.type_name(), "person");
/// ```
pub trait CustomFact: Send + Sync + Debug {
    /// Returns a human-readable type identifier.
    ///
    /// Convention: `snake_case` names, e.g. `"person"`, `"order_line"`.
    /// Surfaces in type-mismatch errors and extraction traces.
    fn fact_type_name(&self) -> &'static str;

    /// Returns a reference to `self` as `&dyn Any`.
    ///
    /// Enables downcasting in [`Extractor`](crate::Extractor) implementations:
    ///
    /// ```ignore
    /// if let Some(person) = fact.as_any().downcast_ref::<Person>() {
    ///     // use person.age
    /// }
    /// ```
    fn as_any(&self) -> &dyn Any;
}

/// The erased value type consumed and produced by aggregate functions.
///
/// # Variants
///
/// - `None` — No value (e.g. the average of an empty group)
/// - `Bool` — Boolean value
/// - `Int` — Integer value (exact arithmetic where possible)
/// - `Float` — Floating-point value
/// - `String` — String value
/// - `List` — Ordered sequence, produced by collect-style aggregates
/// - `Fact` — Domain payload implementing [`CustomFact`]
///
/// # Hybrid Design
///
/// Primitives stay stack-allocated (fast path) while `Fact` provides
/// extensibility via a heap-allocated trait object.
///
/// # Example
///
/// ```
/// use accrete::Value;
///
/// let value = Value::Int(42);
/// assert_eq!(value.as_int(), Some(42));
/// assert!(!value.is_none());
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// No value available.
    None,

    /// Boolean value.
    Bool(bool),

    /// Integer value.
    Int(i64),

    /// Floating-point value.
    Float(f64),

    /// String value.
    String(String),

    /// Ordered sequence of values.
    List(Vec<Value>),

    /// Domain fact payload.
    ///
    /// Wrap your [`CustomFact`] implementation with `Arc`:
    /// ```
    /// use std::sync::Arc;
    /// use accrete::{CustomFact, Value};
    /// # use std::any::Any;
    /// # #[derive(Debug)] struct MyFact;
    /// # impl CustomFact for MyFact {
    /// #     fn fact_type_name(&self) -> &'static str { "my_fact" }
    /// #     fn as_any(&self) -> &dyn Any { self }
    /// # }
    ///
    /// let value = Value::Fact(Arc::new(MyFact));
    /// ```
    Fact(Arc<dyn CustomFact>),
}

// Manual PartialEq because trait objects don't auto-derive it.
// For Fact variants, Arc pointer equality (same allocation = same fact).
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Fact(a), Self::Fact(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    /// Returns `true` if this is the `None` variant.
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if this is the `Bool` variant.
    #[inline]
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    /// Returns `true` if this is the `Int` variant.
    #[inline]
    #[must_use]
    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns `true` if this is the `Float` variant.
    #[inline]
    #[must_use]
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Returns `true` if this is the `String` variant.
    #[inline]
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns `true` if this is the `List` variant.
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` if this is the `Fact` variant.
    #[inline]
    #[must_use]
    pub fn is_fact(&self) -> bool {
        matches!(self, Self::Fact(_))
    }

    /// Try to get the value as a boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => Option::None,
        }
    }

    /// Try to get the value as an integer.
    ///
    /// # Example
    ///
    /// ```
    /// use accrete::Value;
    ///
    /// assert_eq!(Value::Int(42).as_int(), Some(42));
    /// assert_eq!(Value::Float(42.0).as_int(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => Option::None,
        }
    }

    /// Try to get the value as a float.
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => Option::None,
        }
    }

    /// Interpret the value as a number, promoting `Int` to `f64`.
    ///
    /// Numeric aggregates use this to accept either numeric variant.
    #[inline]
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => Option::None,
        }
    }

    /// Try to get the value as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => Option::None,
        }
    }

    /// Try to get the value as a slice of values.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l.as_slice()),
            _ => Option::None,
        }
    }

    /// Try to get the value as a fact payload reference.
    ///
    /// Use [`CustomFact::as_any`] to downcast to the concrete type.
    #[inline]
    #[must_use]
    pub fn as_fact(&self) -> Option<&dyn CustomFact> {
        match self {
            Self::Fact(f) => Some(f.as_ref()),
            _ => Option::None,
        }
    }

    /// Returns a string describing the type of this value.
    ///
    /// Surfaces in [`AccumulateError::TypeMismatch`](crate::AccumulateError)
    /// messages. For `Fact` variants this delegates to
    /// [`CustomFact::fact_type_name`].
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::List(_) => "list",
            Self::Fact(f) => f.fact_type_name(),
        }
    }

    /// Feed this value into a hasher, for group identity.
    ///
    /// Group keys are hashes of the group's bound variable values (see
    /// [`GroupKey`](crate::GroupKey)). Floats hash by bit pattern, facts by
    /// `Arc` address — consistent with the `PartialEq` impl above.
    pub fn hash_into<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::None => state.write_u8(0),
            Self::Bool(b) => {
                state.write_u8(1);
                state.write_u8(u8::from(*b));
            }
            Self::Int(i) => {
                state.write_u8(2);
                state.write_i64(*i);
            }
            Self::Float(f) => {
                state.write_u8(3);
                state.write_u64(f.to_bits());
            }
            Self::String(s) => {
                state.write_u8(4);
                state.write(s.as_bytes());
                state.write_u8(0xff);
            }
            Self::List(l) => {
                state.write_u8(5);
                state.write_usize(l.len());
                for v in l {
                    v.hash_into(state);
                }
            }
            Self::Fact(f) => {
                state.write_u8(6);
                state.write_usize(Arc::as_ptr(f).cast::<()>() as usize);
            }
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::None
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Self::List(l)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            Option::None => Self::None,
        }
    }
}

//! `Tuple` — The two shapes of matched input an accumulate node receives
//!
//! An accumulate node's upstream shape depends on whether the accumulated
//! pattern contains an internal join. A plain pattern delivers one fact
//! payload per match (`Tuple::Simple`); a pattern with an inner sub-join
//! delivers the composite join result (`Tuple::Joined`), whose parts are
//! addressable by declaration identifier.
//!
//! Representing the shape as a tagged variant lets the adapter branch
//! explicitly instead of type-checking and downcasting.

use crate::{Declaration, Value};
use std::fmt;

/// Stable identity for one asserted fact.
///
/// The matching network assigns a handle when a fact is asserted and passes
/// the same handle to `accumulate` and any later `reverse` for that fact.
/// The adapter itself is stateless; the handle exists so the host can
/// correlate the two calls (invariant: one reverse per prior accumulate,
/// same group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactHandle(u64);

impl FactHandle {
    /// Create a handle from the host's fact identifier.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One matched input for a group member.
///
/// # Variants
///
/// - `Simple` — a single fact payload plus whatever bindings its pattern
///   declared; the payload itself is the contribution when no binding is
///   configured.
/// - `Joined` — the composite result of an inner sub-join, exposing named
///   sub-results addressable by declaration identifier.
///
/// # Example
///
/// ```
/// use accrete::{Declaration, JoinedTuple, Tuple, Value};
///
/// let simple = Tuple::Simple(Value::Int(30));
///
/// let joined = Tuple::Joined(JoinedTuple::new(vec![
///     (Declaration::identity("age"), Value::Int(30)),
///     (Declaration::identity("name"), Value::String("ann".into())),
/// ]));
///
/// assert!(matches!(simple, Tuple::Simple(_)));
/// assert!(matches!(joined, Tuple::Joined(_)));
/// ```
#[derive(Debug, Clone)]
pub enum Tuple {
    /// A single matched fact payload.
    Simple(Value),

    /// The composite result of an inner sub-join.
    Joined(JoinedTuple),
}

impl Tuple {
    /// Returns `true` if this is the `Simple` variant.
    #[inline]
    #[must_use]
    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    /// Returns `true` if this is the `Joined` variant.
    #[inline]
    #[must_use]
    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined(_))
    }
}

impl From<Value> for Tuple {
    fn from(fact: Value) -> Self {
        Self::Simple(fact)
    }
}

impl From<JoinedTuple> for Tuple {
    fn from(joined: JoinedTuple) -> Self {
        Self::Joined(joined)
    }
}

/// Composite result of an inner sub-join.
///
/// Holds the sub-join's declarations in join order, each paired with the
/// fact payload bound at that position. Extracting through an entry applies
/// the entry's declaration to its payload, so a declaration can project a
/// field out of a composite fact rather than return it whole.
#[derive(Debug, Clone)]
pub struct JoinedTuple {
    entries: Vec<(Declaration, Value)>,
}

impl JoinedTuple {
    /// Create a joined tuple from `(declaration, payload)` pairs in join order.
    #[must_use]
    pub fn new(entries: Vec<(Declaration, Value)>) -> Self {
        Self { entries }
    }

    /// The inner declarations, in join order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.entries.iter().map(|(d, _)| d)
    }

    /// The identifiers of the inner declarations, in join order.
    ///
    /// Used to build self-correcting "unknown variable" errors.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(d, _)| d.identifier().to_string())
            .collect()
    }

    /// Look up the entry whose declaration identifier equals `identifier`.
    #[must_use]
    pub fn entry(&self, identifier: &str) -> Option<&(Declaration, Value)> {
        self.entries
            .iter()
            .find(|(d, _)| d.identifier() == identifier)
    }

    /// Extract the value bound to `identifier`, applying that declaration's
    /// extractor to its payload.
    ///
    /// Returns `None` when no declaration carries the identifier; the
    /// adapter turns that into
    /// [`AccumulateError::UnknownVariable`](crate::AccumulateError).
    pub fn extract(&self, identifier: &str) -> Option<Result<Value, crate::AccumulateError>> {
        self.entry(identifier).map(|(d, fact)| d.extract(fact))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Per-group context storage with explicit lifecycle hooks.
//!
//! Contexts for distinct tuple-groups must be fully independent: no call
//! for group A may observe or mutate group B's state. Keeping every context
//! in one arena keyed by group identity — instead of threading contexts
//! through ambient references — makes that isolation structural.
//!
//! The host matching network drives the lifecycle: [`GroupArena::group_formed`]
//! when a group first matches, [`GroupArena::group_vacated`] when its last
//! member leaves.

use crate::{AccumulateContext, AccumulateError, Accumulator, Value};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hasher;

/// Identity of one tuple-group: a hash of the group's bound variable values.
///
/// # Example
///
/// ```
/// use accrete::{GroupKey, Value};
///
/// let dept_a = GroupKey::of_values(&[Value::String("sales".into())]);
/// let dept_b = GroupKey::of_values(&[Value::String("support".into())]);
/// assert_ne!(dept_a, dept_b);
/// assert_eq!(dept_a, GroupKey::of_values(&[Value::String("sales".into())]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey(u64);

impl GroupKey {
    /// Derive a key from the group's bound variable values, in binding order.
    #[must_use]
    pub fn of_values(values: &[Value]) -> Self {
        let mut hasher = DefaultHasher::new();
        hasher.write_usize(values.len());
        for value in values {
            value.hash_into(&mut hasher);
        }
        Self(hasher.finish())
    }

    /// Use a host-supplied identity directly.
    #[inline]
    #[must_use]
    pub const fn from_raw(key: u64) -> Self {
        Self(key)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{:016x}", self.0)
    }
}

/// Arena of per-group [`AccumulateContext`]s.
///
/// One arena per accumulate node. The accumulator stays stateless; this is
/// where the per-group state actually lives between traversal passes.
#[derive(Debug, Default)]
pub struct GroupArena {
    contexts: HashMap<GroupKey, Box<dyn AccumulateContext>>,
}

impl GroupArena {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A group has formed: create and initialize its context.
    ///
    /// # Errors
    ///
    /// - [`AccumulateError::DuplicateGroup`] if the key is already live —
    ///   the host failed to vacate it first.
    /// - [`AccumulateError::Init`] if context creation fails.
    pub fn group_formed(
        &mut self,
        key: GroupKey,
        accumulator: &Accumulator,
    ) -> Result<(), AccumulateError> {
        if self.contexts.contains_key(&key) {
            return Err(AccumulateError::DuplicateGroup {
                key: key.to_string(),
            });
        }
        let context = accumulator.create_context()?;
        self.contexts.insert(key, context);
        Ok(())
    }

    /// A group has ceased to exist: discard its context.
    ///
    /// Returns the discarded context so the host can log or inspect it;
    /// `None` if the key was not live.
    pub fn group_vacated(&mut self, key: GroupKey) -> Option<Box<dyn AccumulateContext>> {
        self.contexts.remove(&key)
    }

    /// Mutable access to a live group's context, for accumulate/reverse.
    pub fn context_mut(&mut self, key: GroupKey) -> Option<&mut dyn AccumulateContext> {
        self.contexts.get_mut(&key).map(|c| c.as_mut())
    }

    /// Shared access to a live group's context, for result queries.
    #[must_use]
    pub fn context(&self, key: GroupKey) -> Option<&dyn AccumulateContext> {
        self.contexts.get(&key).map(|c| c.as_ref())
    }

    /// Returns `true` if the key has a live context.
    #[must_use]
    pub fn contains(&self, key: GroupKey) -> bool {
        self.contexts.contains_key(&key)
    }

    /// Number of live groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns `true` if no groups are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

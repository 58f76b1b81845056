//! Identifiers for model and diagram elements.
//!
//! This module provides three kinds of identifiers:
//!
//! - [`Id`] - A stable, random identity for nodes and relationships. It is
//!   assigned once and survives every payload update.
//! - [`Name`] - An interned display name, cheap to copy and compare.
//! - [`EntityRef`] - An opaque key pointing at an entity owned by an external
//!   symbol provider. The graphs compare it by value and never interpret it.

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    sync::{Arc, Mutex, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};
use uuid::Uuid;

/// Global string interner backing [`Name`].
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// A stable identifier tagged with the kind of element it identifies.
///
/// The tag parameter keeps node ids and relationship ids from being mixed up
/// at compile time while sharing one implementation.
///
/// # Examples
///
/// ```
/// use codeweave_core::identifier::{NodeId, RelationshipId};
///
/// let a = NodeId::new();
/// let b = NodeId::new();
/// assert_ne!(a, b);
///
/// let copy = a;
/// assert_eq!(a, copy);
///
/// // Relationship ids are a distinct type.
/// let _r: RelationshipId = RelationshipId::new();
/// ```
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Creates a fresh random identifier.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    pub fn from_uuid(value: Uuid) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.simple())
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeIdTag {}
/// Identity of a model node and of the diagram node that shows it.
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipIdTag {}
/// Identity of a model relationship and of the connector that shows it.
pub type RelationshipId = Id<RelationshipIdTag>;

/// Interned display name.
///
/// # Examples
///
/// ```
/// use codeweave_core::identifier::Name;
///
/// let name = Name::new("Repository");
/// assert_eq!(name, "Repository");
/// assert_eq!(name, Name::from("Repository"));
/// assert_eq!(name.to_string(), "Repository");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name(DefaultSymbol);

impl Name {
    /// Interns `name` and returns its handle.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = with_interner(|interner| {
            interner
                .resolve(self.0)
                .map(str::to_owned)
                .expect("Symbol should exist in interner")
        });
        f.write_str(&value)
    }
}

impl std::str::FromStr for Name {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

/// Opaque reference to an entity owned by the external symbol provider.
///
/// Two references are the same entity iff their keys are equal.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityRef(Arc<str>);

impl EntityRef {
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({:?})", &*self.0)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityRef {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for EntityRef {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_node_ids_are_unique() {
        let ids: HashSet<NodeId> = (0..100).map(|_| NodeId::new()).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_id_roundtrips_uuid() {
        let uuid = Uuid::new_v4();
        let id = RelationshipId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn test_name_interning() {
        let a = Name::new("Service");
        let b: Name = "Service".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Name::new("Repository"));
        assert!(a == "Service");
        assert!(a != "service");
    }

    #[test]
    fn test_entity_ref_compares_by_key() {
        let a = EntityRef::from("T:App.Service");
        let b = EntityRef::from(String::from("T:App.Service"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "T:App.Service");
        assert_ne!(a, EntityRef::from("T:App.Other"));
    }
}

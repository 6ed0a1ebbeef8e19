//! Ordered collections of entities keyed by a generated id.
//!
//! Lab results and treatments are edited as lists where order is meaningful (it is the order
//! they are printed in) and identity is the entry's [`EntryId`]. Array positions are never used
//! as identity across edits.

use lmn_types::EntryId;
use serde::{Deserialize, Serialize};

/// An entity that lives in an [`EntryList`].
pub trait ListEntry {
    fn id(&self) -> &EntryId;

    /// A new entry with the given id and every other field empty.
    fn blank(id: EntryId) -> Self;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryList<T>(Vec<T>);

impl<T> Default for EntryList<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: ListEntry> EntryList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a blank entry with a freshly generated id and returns that id.
    pub fn push_blank(&mut self) -> EntryId {
        let id = EntryId::generate();
        self.0.push(T::blank(id.clone()));
        id
    }

    /// Appends an existing entry, keeping its id.
    pub fn push(&mut self, entry: T) {
        self.0.push(entry);
    }

    pub fn position(&self, id: &EntryId) -> Option<usize> {
        self.0.iter().position(|entry| entry.id() == id)
    }

    pub fn get(&self, id: &EntryId) -> Option<&T> {
        self.0.iter().find(|entry| entry.id() == id)
    }

    pub fn get_mut(&mut self, id: &EntryId) -> Option<&mut T> {
        self.0.iter_mut().find(|entry| entry.id() == id)
    }

    pub fn get_mut_at(&mut self, index: usize) -> Option<&mut T> {
        self.0.get_mut(index)
    }

    /// Removes the entry with `id`, preserving the order of the rest.
    pub fn remove(&mut self, id: &EntryId) -> Option<T> {
        let index = self.position(id)?;
        Some(self.0.remove(index))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.0.iter().map(|entry| entry.id().clone()).collect()
    }
}

impl<T> EntryList<T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for EntryList<T> {
    fn from(entries: Vec<T>) -> Self {
        Self(entries)
    }
}

impl<'a, T> IntoIterator for &'a EntryList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

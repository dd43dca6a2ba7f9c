use std::{fmt, hash::Hash, hash::Hasher, marker::PhantomData};

use serde::{Serialize, Serializer};

/// A typed reference into one of the document's entity tables.
///
/// The type parameter ties the index to the kind of entity it was issued
/// for, so a material index cannot be passed where an accessor index is
/// expected. "No reference" is expressed as `Option<Index<T>>`.
pub struct Index<T> {
    value: u32,
    marker: PhantomData<fn() -> T>,
}

impl<T> Index<T> {
    pub(crate) fn new(value: u32) -> Self {
        Self {
            value,
            marker: PhantomData,
        }
    }

    /// The raw table position, as serialized into the document.
    pub fn value(self) -> u32 {
        self.value
    }
}

// Manual impls because derives would bound them on `T`.
impl<T> Clone for Index<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Index<T> {}

impl<T> PartialEq for Index<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Index<T> {}

impl<T> PartialOrd for Index<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Index<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Index<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Index<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Index({})", self.value)
    }
}

impl<T> Serialize for Index<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.value)
    }
}

/// An append-only, order-preserving table of entities of one kind.
///
/// Indices are assigned in insertion order and never change: entries are
/// mutated in place through [`get_mut`](IndexedTable::get_mut) but never
/// removed or reordered, since other entities hold indices by value.
pub struct IndexedTable<T> {
    entries: Vec<T>,
}

impl<T> IndexedTable<T> {
    /// Appends a value and returns its permanent index.
    pub fn add(&mut self, value: T) -> Index<T> {
        let index = Index::new(self.entries.len() as u32);
        self.entries.push(value);
        index
    }

    /// Returns the entry at `index`.
    ///
    /// Panics if `index` was not issued by this table. That is a logic bug
    /// in the caller, not a data problem, so it is not recoverable.
    pub fn get(&self, index: Index<T>) -> &T {
        let len = self.entries.len();
        self.entries
            .get(index.value() as usize)
            .unwrap_or_else(|| panic!("index {} out of range for table of {len}", index.value()))
    }

    /// Mutable access to a previously reserved entry, used to fill in
    /// fields discovered after the index was handed out.
    pub fn get_mut(&mut self, index: Index<T>) -> &mut T {
        let len = self.entries.len();
        self.entries
            .get_mut(index.value() as usize)
            .unwrap_or_else(|| panic!("index {} out of range for table of {len}", index.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Pairs of (index, entry) in insertion order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (Index<T>, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (Index::new(i as u32), entry))
    }
}

impl<T> Default for IndexedTable<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Serialize> Serialize for IndexedTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

//! Generic record list shared by every entity store.
//!
//! A `RecordList` is an ordered sequence of records with a capacity ceiling.
//! Interactive `add` never grows the list; only bulk loads through
//! [`RecordList::replace_all`] may raise the capacity.
//!
//! ## Invariants
//!
//! - `len() <= capacity()` at all times
//! - Records keep insertion order; removal closes the gap
//! - Identifiers are never checked for uniqueness, so lookups return the
//!   first match only

use log::debug;
use std::cmp::Ordering;
use thiserror::Error;

/// Capacity used by [`RecordList::new`]
pub const DEFAULT_CAPACITY: usize = 100;

/// Smallest capacity a list grows to when it started out empty
const MIN_GROWTH_CAPACITY: usize = 16;

/// A record stored in a [`RecordList`]
pub trait Record {
    /// Caller-assigned identifier
    fn id(&self) -> i32;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("List is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("No record with id {0}")]
    NotFound(i32),
    #[error("No id left above {0}")]
    IdsExhausted(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordList<T> {
    records: Vec<T>,
    capacity: usize,
}

impl<T: Record> RecordList<T> {
    /// Create an empty list with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty list that accepts up to `capacity` records through `add`
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    /// Append a record at the end of the list.
    ///
    /// Fails without touching the list when it is already at capacity.
    pub fn add(&mut self, record: T) -> Result<(), ListError> {
        if self.is_full() {
            return Err(ListError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.records.push(record);
        Ok(())
    }

    /// Remove the first record with the given id, shifting later records left
    pub fn remove(&mut self, id: i32) -> Result<T, ListError> {
        let index = self
            .position(|record| record.id() == id)
            .ok_or(ListError::NotFound(id))?;
        Ok(self.records.remove(index))
    }

    pub fn find_by_id(&self, id: i32) -> Option<&T> {
        self.find_first(|record| record.id() == id)
    }

    pub fn find_by_id_mut(&mut self, id: i32) -> Option<&mut T> {
        self.find_first_mut(|record| record.id() == id)
    }

    /// Linear scan returning the first record matching `predicate`
    pub fn find_first<P>(&self, predicate: P) -> Option<&T>
    where
        P: Fn(&T) -> bool,
    {
        self.records.iter().find(|record| predicate(record))
    }

    pub fn find_first_mut<P>(&mut self, predicate: P) -> Option<&mut T>
    where
        P: Fn(&T) -> bool,
    {
        self.records.iter_mut().find(|record| predicate(record))
    }

    /// Index of the first record matching `predicate`
    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.records.iter().position(predicate)
    }

    /// Every record matching `predicate`, in list order
    pub fn filter<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a T> + 'a
    where
        P: Fn(&T) -> bool + 'a,
    {
        self.records.iter().filter(move |record| predicate(record))
    }

    /// Bounds-checked positional access
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }

    /// Sort in place with the given comparator.
    ///
    /// Stable, O(n log n). Equal records keep their relative order, so
    /// sorting twice by the same key is a no-op.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.records.sort_by(compare);
    }

    /// One past the highest id currently stored (1 for an empty list)
    pub fn next_id(&self) -> Result<i32, ListError> {
        match self.records.iter().map(Record::id).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(ListError::IdsExhausted(max)),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Replace the whole content of the list, as done by a bulk load.
    ///
    /// When the new content does not fit, the capacity grows to the larger
    /// of twice the old capacity and the number of records.
    pub fn replace_all(&mut self, records: Vec<T>) {
        if records.len() > self.capacity {
            let doubled = if self.capacity == 0 {
                MIN_GROWTH_CAPACITY
            } else {
                self.capacity.saturating_mul(2)
            };
            let new_capacity = doubled.max(records.len());
            debug!(
                "Growing record list capacity from {} to {}",
                self.capacity, new_capacity
            );
            self.capacity = new_capacity;
        }
        self.records = records;
    }
}

impl<T: Record> Default for RecordList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> IntoIterator for &'a RecordList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

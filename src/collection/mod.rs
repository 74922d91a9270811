//! Base record collection
//!
//! `RecordCollection` is the single source of truth a screen queries. It is
//! never edited in place: point actions build a new collection with one
//! record replaced, inserted or removed, and the caller swaps the whole
//! value. Readers holding the previous collection keep a consistent copy.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{QueryError, Result};
use crate::record::Record;

/// An id-indexed, copy-on-write collection of records
#[derive(Debug)]
pub struct RecordCollection<R> {
    records: Arc<Vec<R>>,
    index: Arc<FxHashMap<String, usize>>,
}

impl<R> Clone for RecordCollection<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            index: Arc::clone(&self.index),
        }
    }
}

impl<R: Record> Default for RecordCollection<R> {
    fn default() -> Self {
        Self::empty()
    }
}

fn build_index<R: Record>(records: &[R]) -> Result<FxHashMap<String, usize>> {
    let mut index = FxHashMap::default();
    index.reserve(records.len());
    for (position, record) in records.iter().enumerate() {
        if index.insert(record.id().to_string(), position).is_some() {
            return Err(QueryError::DuplicateRecordId(record.id().to_string()));
        }
    }
    Ok(index)
}

impl<R: Record> RecordCollection<R> {
    /// Create a collection, rejecting duplicate ids
    pub fn new(records: Vec<R>) -> Result<Self> {
        let index = build_index(&records)?;
        Ok(Self {
            records: Arc::new(records),
            index: Arc::new(index),
        })
    }

    /// Create an empty collection
    #[must_use]
    pub fn empty() -> Self {
        Self {
            records: Arc::new(Vec::new()),
            index: Arc::new(FxHashMap::default()),
        }
    }

    /// Get a record by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Check if a record with this id exists
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All records in collection order
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Iterate over records in collection order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether two handles share the same storage
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl<R: Record + Clone> RecordCollection<R> {
    /// A new collection with the record of the same id replaced
    ///
    /// The replacement keeps the position of the record it replaces.
    pub fn with_replaced(&self, record: R) -> Result<Self> {
        let position = self.position(record.id())?;
        let mut records = self.records.as_ref().clone();
        records[position] = record;
        Ok(Self {
            records: Arc::new(records),
            index: Arc::clone(&self.index),
        })
    }

    /// A new collection with one record updated by a function
    ///
    /// The function must keep the id.
    pub fn update(&self, id: &str, f: impl FnOnce(&R) -> R) -> Result<Self> {
        let position = self.position(id)?;
        let updated = f(&self.records[position]);
        if updated.id() != id {
            return Err(QueryError::InvalidRecord(format!(
                "update changed id '{id}' to '{}'",
                updated.id()
            )));
        }
        self.with_replaced(updated)
    }

    /// A new collection with a record appended
    pub fn with_inserted(&self, record: R) -> Result<Self> {
        if self.contains(record.id()) {
            return Err(QueryError::DuplicateRecordId(record.id().to_string()));
        }
        let mut records = self.records.as_ref().clone();
        let mut index = self.index.as_ref().clone();
        index.insert(record.id().to_string(), records.len());
        records.push(record);
        Ok(Self {
            records: Arc::new(records),
            index: Arc::new(index),
        })
    }

    /// A new collection without the record of this id
    pub fn with_removed(&self, id: &str) -> Result<Self> {
        let position = self.position(id)?;
        let mut records = self.records.as_ref().clone();
        records.remove(position);
        let index = build_index(&records)?;
        Ok(Self {
            records: Arc::new(records),
            index: Arc::new(index),
        })
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| QueryError::RecordNotFound(id.to_string()))
    }
}

impl<'a, R> IntoIterator for &'a RecordCollection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// src/core/storage/data_types.rs

//! Defines the value wrapper stored in the keyspace.

use crate::core::storage::zset::SortedSet;
use bytes::Bytes;

/// The payload of a stored key. The engine's commands only operate on
/// sorted sets; the plain string variant exists so a key of another type
/// has a shape to take, which is what makes WRONGTYPE reachable.
#[derive(Debug, Clone)]
pub enum DataValue {
    String(Bytes),
    SortedSet(SortedSet),
}

impl DataValue {
    /// Returns the memory used by the payload in bytes.
    pub fn memory_usage(&self) -> usize {
        match self {
            DataValue::String(value) => value.len(),
            DataValue::SortedSet(zset) => zset.memory_usage(),
        }
    }
}

/// A wrapper for all values stored in the keyspace, carrying the data and
/// its bookkeeping metadata.
#[derive(Debug, Clone)]
pub struct StoredValue {
    pub data: DataValue,
    /// Bumped on every mutation.
    pub version: u64,
    /// The calculated size of the `data` field in bytes.
    pub size: usize,
}

impl StoredValue {
    pub fn new(data: DataValue) -> Self {
        let size = data.memory_usage();
        Self {
            data,
            version: 1,
            size,
        }
    }
}

//! Persisted Global State
//!
//! Per-application key-value storage that survives across calls. Programs
//! never mutate it directly: they return `StateWrite`s, and the ledger
//! applies them when the whole group is approved.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{BTreeMap, Vec};

/// A persisted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum StateValue {
    Uint(u64),
    Bytes(Vec<u8>),
}

/// One staged write to the invoking application's global state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct StateWrite {
    pub key: Vec<u8>,
    pub value: StateValue,
}

impl StateWrite {
    /// Stage an integer write
    pub fn uint(key: &[u8], value: u64) -> Self {
        Self {
            key: key.to_vec(),
            value: StateValue::Uint(value),
        }
    }
}

/// Global state of one application
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct GlobalState {
    values: BTreeMap<Vec<u8>, StateValue>,
}

impl GlobalState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a value by key
    pub fn get(&self, key: &[u8]) -> Option<&StateValue> {
        self.values.get(key)
    }

    /// Read an integer value; `None` if missing or stored as bytes
    pub fn get_uint(&self, key: &[u8]) -> Option<u64> {
        match self.get(key) {
            Some(StateValue::Uint(value)) => Some(*value),
            _ => None,
        }
    }

    /// Write a value by key
    pub fn put(&mut self, key: &[u8], value: StateValue) {
        self.values.insert(key.to_vec(), value);
    }

    /// Apply staged writes in order
    pub fn apply(&mut self, writes: &[StateWrite]) {
        for write in writes {
            self.values.insert(write.key.clone(), write.value.clone());
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no keys are stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

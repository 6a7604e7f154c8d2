//! Per-configuration memo table for converted values

use crate::schema::ContractId;
use std::cell::RefCell;
use std::collections::HashMap;
use types::Value;

/// Identity of one accessor within one contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub contract: ContractId,
    pub accessor: usize,
}

/// Converted values keyed by accessor identity.
///
/// Entries are never invalidated: an accessor read once keeps its value even
/// if the entry store changes afterwards.
#[derive(Debug, Default)]
pub struct ConversionCache {
    conversions: RefCell<HashMap<CacheKey, Value>>,
}

impl ConversionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Previously converted value for `key`
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        self.conversions.borrow().get(key).cloned()
    }

    /// Remember a converted value
    pub fn insert(&self, key: CacheKey, value: Value) {
        self.conversions.borrow_mut().insert(key, value);
    }

    /// Number of cached conversions
    pub fn len(&self) -> usize {
        self.conversions.borrow().len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.conversions.borrow().is_empty()
    }
}

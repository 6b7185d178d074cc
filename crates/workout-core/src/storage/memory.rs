use std::collections::HashMap;

use super::SlotStore;
use crate::error::StorageError;

/// In-memory slot store with an optional byte quota.
///
/// The quota mirrors browser local storage limits: a write whose value is
/// larger than the quota fails with [`StorageError::QuotaExceeded`] and
/// leaves the previous value in place.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn set_quota(&mut self, quota_bytes: Option<usize>) {
        self.quota_bytes = quota_bytes;
    }
}

impl SlotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    quota,
                });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_replaces_slot() {
        let mut store = MemoryStore::new();
        assert!(store.read("k").unwrap().is_none());
        store.write("k", "one").unwrap();
        store.write("k", "two").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn quota_rejects_large_writes_and_keeps_old_value() {
        let mut store = MemoryStore::with_quota(4);
        store.write("k", "abcd").unwrap();
        let err = store.write("k", "abcde").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 5, quota: 4 }));
        assert_eq!(store.read("k").unwrap().as_deref(), Some("abcd"));
    }
}

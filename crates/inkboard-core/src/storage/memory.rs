//! In-memory storage implementation.

use super::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// An optional quota (in bytes, summed over keys and values) makes writes
/// fail the way a browser's local storage does once it is full.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory storage that rejects writes beyond `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Total bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|e| {
            StorageError::Other(format!("Lock error: {}", e))
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|e| {
            StorageError::Other(format!("Lock error: {}", e))
        })?;

        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(others);
            if needed > available {
                return Err(StorageError::QuotaExceeded { needed, available });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|e| {
            StorageError::Other(format!("Lock error: {}", e))
        })?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = self.entries.read().map_err(|e| {
            StorageError::Other(format!("Lock error: {}", e))
        })?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let storage = MemoryStorage::new();
        storage.set("theme", "dark").unwrap();

        assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_missing_key() {
        let storage = MemoryStorage::new();
        assert!(storage.get("nonexistent").unwrap().is_none());
        assert!(!storage.contains("nonexistent").unwrap());
    }

    #[test]
    fn test_remove() {
        let storage = MemoryStorage::new();
        storage.set("test", "value").unwrap();
        storage.remove("test").unwrap();
        assert!(!storage.contains("test").unwrap());

        // Removing again is fine
        storage.remove("test").unwrap();
    }

    #[test]
    fn test_keys() {
        let storage = MemoryStorage::new();
        storage.set("drawings", "[]").unwrap();
        storage.set("theme", "light").unwrap();

        let keys = storage.keys().unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"drawings".to_string()));
        assert!(keys.contains(&"theme".to_string()));
    }

    #[test]
    fn test_quota_exceeded() {
        let storage = MemoryStorage::with_quota(16);
        storage.set("a", "short").unwrap();

        let result = storage.set("b", "this value is far too long");
        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));

        // Failed write leaves previous contents alone
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("short"));
        assert!(storage.get("b").unwrap().is_none());
    }

    #[test]
    fn test_quota_counts_replacement_once() {
        let storage = MemoryStorage::with_quota(10);
        storage.set("key", "1234567").unwrap();
        // Overwriting the same key does not double count the old value
        storage.set("key", "7654321").unwrap();
        assert_eq!(storage.used_bytes(), 10);
    }
}

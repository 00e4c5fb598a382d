use std::collections::HashMap;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;
use spin_sdk::key_value::Store;

use crate::config::seq_key;

/// Byte-oriented key-value backend the account records live in.
///
/// Values are JSON documents; `get_json`/`set_json` do the encoding so
/// backends only move bytes around.
pub trait KvStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()>;

    fn delete(&self, key: &str) -> anyhow::Result<()>;

    fn exists(&self, key: &str) -> anyhow::Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()>
    where
        Self: Sized,
    {
        self.set(key, &serde_json::to_vec(value)?)
    }
}

/// Spin's default key-value store, the backend used when running as a component.
pub fn open_default_store() -> anyhow::Result<Store> {
    Store::open_default().map_err(|e| anyhow::anyhow!("Failed to open KV store: {:?}", e))
}

impl KvStore for Store {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        Store::get(self, key).map_err(|e| anyhow::anyhow!("KV get '{}' failed: {:?}", key, e))
    }

    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        Store::set(self, key, value).map_err(|e| anyhow::anyhow!("KV set '{}' failed: {:?}", key, e))
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        Store::delete(self, key).map_err(|e| anyhow::anyhow!("KV delete '{}' failed: {:?}", key, e))
    }
}

/// Process-local store for tests and for running outside Spin.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Issue the next id of a sequence, starting at 1.
pub fn next_id<S: KvStore>(store: &S, kind: &str) -> anyhow::Result<u64> {
    let key = seq_key(kind);
    let next = store.get_json::<u64>(&key)?.unwrap_or(0) + 1;
    store.set_json(&key, &next)?;
    Ok(next)
}

use crate::errors::CoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryPrefs {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::prefs::PrefsStore for MemoryPrefs {
    async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CoreError> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CoreError> {
        self.entries.write().clear();
        Ok(())
    }

    async fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

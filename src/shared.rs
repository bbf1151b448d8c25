//! A tree shared between threads.
//!
//! All mutations and reads go through one reader/writer lock per tree:
//! readers run concurrently with each other, never with a writer.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::error::ConfigError;
use crate::tree::ConfigTree;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<ConfigTree>>,
}

impl SharedConfig {
    pub fn new(tree: ConfigTree) -> Self {
        SharedConfig {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Hold the read lock for several lookups in a row.
    pub fn read(&self) -> RwLockReadGuard<'_, ConfigTree> {
        self.inner.read()
    }

    /// Run `f` with exclusive access to the tree.
    pub fn write<R>(&self, f: impl FnOnce(&mut ConfigTree) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.inner.read().get(path).cloned()
    }

    pub fn set(&self, path: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.inner.write().set(path, value)
    }

    pub fn add(&self, path: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.inner.write().add(path, value)
    }

    pub fn del(&self, path: &str) -> Option<Value> {
        self.inner.write().del(path)
    }

    pub fn load_text(&self, input: &str) -> Result<(), ConfigError> {
        self.inner.write().load_text(input)
    }

    pub fn merge_text(&self, input: &str) -> Result<(), ConfigError> {
        self.inner.write().merge_text(input)
    }

    /// A deep copy of the current tree.
    pub fn snapshot(&self) -> ConfigTree {
        self.inner.read().clone()
    }

    pub fn marshal(&self) -> String {
        self.inner.read().marshal()
    }
}

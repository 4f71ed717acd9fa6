//! Request-scoped logging context.
//!
//! A [`LogContext`] is a small key→value store created per request. The
//! middleware binds the correlation id into it, hands a handle to downstream
//! code through the request extensions, and clears the binding when the
//! request is done. Handlers that cannot reach the request (deep helpers,
//! spawned work) look it up through [`LogContext::current`], which reads the
//! task-local installed for the lifetime of the downstream future.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

tokio::task_local! {
    static CURRENT: LogContext;
}

/// Shared handle to one request's logging context. Cheap to clone (Arc).
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers never leave the map half-updated; poisoning is recovered.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind `value` under `key`, replacing any previous binding.
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.write().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// Remove the binding under `key`, returning the value it held.
    ///
    /// Also clears bindings while a panicking handler unwinds.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The context of the request currently being handled on this task,
    /// or `None` outside a request.
    pub fn current() -> Option<LogContext> {
        CURRENT.try_with(|ctx| ctx.clone()).ok()
    }

    /// Run `fut` with `self` installed as the task's current context.
    pub async fn scope<F, T>(self, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        CURRENT.scope(self, fut).await
    }
}

//! Hash-keyed cache for whatever a backend compiles a program into (shader, pipeline, closure).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::foundation::error::BlendResult;
use crate::ucode::Hash128;

type Slot<T> = Arc<Mutex<Option<Arc<T>>>>;

/// Compiles each program hash at most once, even when many threads ask for it together.
///
/// Callers racing on the same hash wait on that hash's slot; different hashes compile in
/// parallel. A failed compilation leaves the slot empty so a later call can retry.
pub struct ProgramCache<T> {
    slots: Mutex<HashMap<Hash128, Slot<T>>>,
}

impl<T> Default for ProgramCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ProgramCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramCache")
            .field("slots", &self.len())
            .field("compiled", &self.compiled())
            .finish()
    }
}

fn lock<V>(m: &Mutex<V>) -> MutexGuard<'_, V> {
    // Slot writes are a single store.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T> ProgramCache<T> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Cached artifact for `hash`, or the result of running `compile` if there is none yet.
    pub fn get_or_compile<F>(&self, hash: Hash128, compile: F) -> BlendResult<Arc<T>>
    where
        F: FnOnce() -> BlendResult<T>,
    {
        let slot = lock(&self.slots).entry(hash).or_default().clone();

        let mut guard = lock(&slot);
        if let Some(done) = guard.as_ref() {
            return Ok(done.clone());
        }

        tracing::debug!(%hash, "compiling program");
        let value = Arc::new(compile()?);
        *guard = Some(value.clone());
        Ok(value)
    }

    pub fn get(&self, hash: Hash128) -> Option<Arc<T>> {
        let slot = lock(&self.slots).get(&hash)?.clone();
        let guard = lock(&slot);
        guard.clone()
    }

    /// Number of hashes ever requested, including failed ones.
    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of hashes holding a compiled artifact.
    pub fn compiled(&self) -> usize {
        let slots: Vec<Slot<T>> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|s| lock(s).is_some()).count()
    }

    pub fn clear(&self) {
        lock(&self.slots).clear();
    }
}

#[cfg(test)]
#[path = "../tests/unit/cache.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Mutex;

use crate::services::session::SessionHandle;

/// Live session handles keyed by attempt id. Removing (or replacing) an entry
/// drops the handle; once every clone is gone the actor's command channel
/// closes and its task winds down, aborting any in-flight answer writes.
pub(crate) struct SessionRegistry {
    inner: Mutex<HashMap<String, SessionHandle>>,
}

/// Returned by [`SessionRegistry::try_insert`] when the registry is at
/// capacity.
#[derive(Debug)]
pub(crate) struct RegistryFull;

impl SessionRegistry {
    pub(crate) fn new() -> Self {
        Self { inner: Mutex::new(HashMap::new()) }
    }

    /// Inserts under the capacity cap in a single lock acquisition, so
    /// concurrent joins cannot overshoot it. Replacing a live session for the
    /// same attempt never counts against the cap; a replaced handle is
    /// returned so the caller can log the rejoin.
    pub(crate) fn try_insert(
        &self,
        attempt_id: String,
        handle: SessionHandle,
        capacity: usize,
    ) -> Result<Option<SessionHandle>, RegistryFull> {
        let mut inner = self.inner.lock().expect("session registry poisoned");
        if !inner.contains_key(&attempt_id) && inner.len() >= capacity {
            return Err(RegistryFull);
        }
        Ok(inner.insert(attempt_id, handle))
    }

    pub(crate) fn get(&self, attempt_id: &str) -> Option<SessionHandle> {
        self.inner.lock().expect("session registry poisoned").get(attempt_id).cloned()
    }

    pub(crate) fn remove(&self, attempt_id: &str) -> Option<SessionHandle> {
        self.inner.lock().expect("session registry poisoned").remove(attempt_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().expect("session registry poisoned").len()
    }
}

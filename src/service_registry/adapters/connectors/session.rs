//! Interior-mutable holder for a connector's live session.

use std::sync::{PoisonError, RwLock};

/// Optional live session shared between connect, tool calls, and disconnect.
///
/// Lock poisoning is recovered: the slot only ever holds a complete session
/// or nothing.
#[derive(Debug)]
pub(super) struct SessionSlot<T> {
    inner: RwLock<Option<T>>,
}

impl<T> Default for SessionSlot<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }
}

impl<T: Clone> SessionSlot<T> {
    pub(super) fn get(&self) -> Option<T> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(super) fn set(&self, session: T) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    pub(super) fn clear(&self) -> Option<T> {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub(super) fn is_set(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

//! Core, non-public machinery shared by both container flavours.

use crate::error::{ContainerError, Result};
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
  // Bindings currently being resolved on this thread. A key showing up twice
  // means a factory (directly or transitively) asked for itself.
  static RESOLVING: RefCell<HashSet<ResolutionKey>> = RefCell::new(HashSet::new());
}

/// Hands out a process-unique id for a new container.
pub(crate) fn next_container_id() -> u64 {
  NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ResolutionKey {
  container: u64,
  id: String,
}

/// An RAII guard marking a binding as "being resolved" on the current thread.
///
/// Entering a key that is already held fails with
/// [`ContainerError::CircularDependency`] instead of recursing. The key is
/// released when the guard drops, including during unwinding.
pub(crate) struct ResolutionGuard {
  key: ResolutionKey,
}

impl ResolutionGuard {
  pub(crate) fn enter(container: u64, id: &str) -> Result<Self> {
    let key = ResolutionKey {
      container,
      id: id.to_owned(),
    };
    let fresh = RESOLVING.with(|stack| stack.borrow_mut().insert(key.clone()));
    if !fresh {
      tracing::debug!(target: "fibre_container", id, "circular resolution rejected");
      return Err(ContainerError::CircularDependency(id.to_owned()));
    }
    Ok(Self { key })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING.with(|stack| {
      stack.borrow_mut().remove(&self.key);
    });
  }
}

//! The main `Container` struct and its associated methods.

use crate::core::{next_container_id, ResolutionGuard};
use crate::error::{ContainerError, Result};
use crate::factory::{Factory, Instance};
use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;

/// A thread-safe, string-keyed dependency injection container.
///
/// Every identifier maps to exactly one [`Factory`]. Registering under an
/// existing identifier replaces the previous factory. Nothing is built at
/// registration time: factories run when [`get`](Container::get) is called,
/// and plain bindings run again on every call.
///
/// Containers are independent of one another and of [`global()`](crate::global).
pub struct Container {
  id: u64,
  bindings: DashMap<String, Arc<Factory>>,
  // Held across an extend's read-then-write. Reentrant so a factory run by
  // `extend` may itself extend.
  extending: ReentrantMutex<()>,
}

impl Default for Container {
  fn default() -> Self {
    Self {
      id: next_container_id(),
      bindings: DashMap::new(),
      extending: ReentrantMutex::new(()),
    }
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- Inspection ---

  /// Returns whether `id` currently has a binding. Nothing is resolved.
  pub fn has(&self, id: &str) -> bool {
    self.bindings.contains_key(id)
  }

  /// Number of bindings.
  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  /// Returns whether no identifier is bound.
  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  /// The bound identifiers, sorted.
  pub fn ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.bindings.iter().map(|e| e.key().clone()).collect();
    ids.sort();
    ids
  }

  // --- Registration ---

  /// Stores `factory` under `id`, replacing any previous binding.
  pub fn bind(&self, id: impl Into<String>, factory: Factory) {
    let id = id.into();
    tracing::trace!(
      target: "fibre_container",
      id = %id,
      produces = factory.produces(),
      shared = factory.is_shared(),
      "binding registered"
    );
    self.bindings.insert(id, Arc::new(factory));
  }

  /// Binds a factory that runs on every [`get`](Container::get).
  pub fn set<T, F>(&self, id: impl Into<String>, factory: F)
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> T + Send + Sync + 'static,
  {
    self.bind(id, Factory::new(factory));
  }

  /// Binds a factory that may fail, typically because it resolves other
  /// bindings with `?`. Its error is returned from `get` unchanged.
  pub fn try_set<T, F>(&self, id: impl Into<String>, factory: F)
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    self.bind(id, Factory::fallible(factory));
  }

  /// Binds a factory producing a trait object, resolved with `get::<dyn Trait>`.
  pub fn set_trait<I, F>(&self, id: impl Into<String>, factory: F)
  where
    I: ?Sized + Send + Sync + 'static,
    F: Fn(&Container) -> Arc<I> + Send + Sync + 'static,
  {
    self.bind(id, Factory::from_trait(factory));
  }

  /// Binds an already constructed value. Every `get` returns the same `Arc`.
  pub fn instance<T: Send + Sync + 'static>(&self, id: impl Into<String>, value: T) {
    self.bind(id, Factory::value(value));
  }

  /// Binds a factory whose first result is cached for the life of this binding.
  ///
  /// Re-registering `id` (with any method) drops the cached value.
  pub fn singleton<T, F>(&self, id: impl Into<String>, factory: F)
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> T + Send + Sync + 'static,
  {
    self.bind(id, Factory::new(factory).shared());
  }

  /// Like [`singleton`](Container::singleton), but a failing factory leaves
  /// the cache empty and the next `get` tries again.
  pub fn try_singleton<T, F>(&self, id: impl Into<String>, factory: F)
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    self.bind(id, Factory::fallible(factory).shared());
  }

  /// Binds a cached trait object.
  pub fn singleton_trait<I, F>(&self, id: impl Into<String>, factory: F)
  where
    I: ?Sized + Send + Sync + 'static,
    F: Fn(&Container) -> Arc<I> + Send + Sync + 'static,
  {
    self.bind(id, Factory::from_trait(factory).shared());
  }

  // --- Resolution ---

  /// Resolves `id` and returns its value as `T`.
  ///
  /// # Errors
  ///
  /// - [`ContainerError::NotFound`] if nothing is bound under `id`.
  /// - [`ContainerError::TypeMismatch`] if the binding produces another type.
  /// - [`ContainerError::CircularDependency`] if `id` is already being
  ///   resolved further up the current call stack.
  /// - Whatever a fallible factory returned.
  pub fn get<T>(&self, id: &str) -> Result<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    let factory = self.binding(id)?;
    self.resolve_with(id, &factory)
  }

  // --- Redefinition ---

  /// Replaces the binding for `id` with one built on its current value.
  ///
  /// The current binding is resolved once, right now, and the result is
  /// frozen into the new binding. Later `get` calls run
  /// `wrapper(frozen, container)`; the old factory never runs again. Chained
  /// extends therefore compose values:
  ///
  /// ```
  /// use fibre_container::Container;
  /// use std::sync::Arc;
  ///
  /// let container = Container::new();
  /// container.set("x", |_| 1);
  /// container.extend("x", |prev: Arc<i32>, _| *prev * 2).unwrap();
  /// container.extend("x", |prev: Arc<i32>, _| *prev * 2).unwrap();
  /// assert_eq!(*container.get::<i32>("x").unwrap(), 4);
  /// ```
  ///
  /// The new binding is written unconditionally, even if the resolved factory
  /// re-registered `id` while running. Concurrent `extend` calls on the same
  /// container are serialized, so none of them is lost.
  ///
  /// # Errors
  ///
  /// Fails exactly like `get::<T>(id)` would.
  pub fn extend<T, U, F>(&self, id: &str, wrapper: F) -> Result<()>
  where
    T: ?Sized + Send + Sync + 'static,
    U: Send + Sync + 'static,
    F: Fn(Arc<T>, &Container) -> U + Send + Sync + 'static,
  {
    self.rebind(id, move |previous: Arc<T>| {
      Factory::new(move |c| wrapper(Arc::clone(&previous), c))
    })
  }

  /// [`extend`](Container::extend) for wrappers producing a trait object,
  /// e.g. a decorator around the previous service.
  pub fn extend_trait<T, I, F>(&self, id: &str, wrapper: F) -> Result<()>
  where
    T: ?Sized + Send + Sync + 'static,
    I: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<T>, &Container) -> Arc<I> + Send + Sync + 'static,
  {
    self.rebind(id, move |previous: Arc<T>| {
      Factory::from_trait(move |c| wrapper(Arc::clone(&previous), c))
    })
  }

  // --- Removal ---

  /// Removes the binding for `id`, if any.
  pub fn unset(&self, id: &str) {
    if self.bindings.remove(id).is_some() {
      tracing::trace!(target: "fibre_container", id, "binding removed");
    }
  }

  /// Removes every binding present when the call starts. Values already
  /// handed out are unaffected.
  ///
  /// Bindings are removed one at a time and dropped with no map lock held, so
  /// a captured value's `Drop` may use the container.
  pub fn flush(&self) {
    let ids = self.ids();
    for id in &ids {
      let removed = self.bindings.remove(id);
      drop(removed);
    }
    tracing::debug!(target: "fibre_container", count = ids.len(), "container flushed");
  }

  // --- PRIVATE HELPERS ---

  // The map guard is released before the factory runs so factories can
  // freely resolve and register.
  fn binding(&self, id: &str) -> Result<Arc<Factory>> {
    self
      .bindings
      .get(id)
      .map(|entry| Arc::clone(entry.value()))
      .ok_or_else(|| ContainerError::NotFound(id.to_owned()))
  }

  fn resolve_with<T>(&self, id: &str, factory: &Factory) -> Result<Arc<T>>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    let instance: Instance = {
      let _guard = ResolutionGuard::enter(self.id, id)?;
      factory.produce(self)?
    };
    instance
      .downcast_ref::<Arc<T>>()
      .cloned()
      .ok_or_else(|| ContainerError::TypeMismatch {
        id: id.to_owned(),
        expected: type_name::<T>(),
        found: factory.produces(),
      })
  }

  fn rebind<T>(&self, id: &str, wrap: impl FnOnce(Arc<T>) -> Factory) -> Result<()>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    let _extending = self.extending.lock();
    let current = self.binding(id)?;
    let previous = self.resolve_with::<T>(id, &current)?;
    let extended = wrap(previous);

    tracing::trace!(
      target: "fibre_container",
      id,
      produces = extended.produces(),
      "binding extended"
    );
    let replaced = self.bindings.insert(id.to_owned(), Arc::new(extended));
    drop(replaced);
    Ok(())
  }
}

impl<K: Into<String>> FromIterator<(K, Factory)> for Container {
  fn from_iter<I: IntoIterator<Item = (K, Factory)>>(iter: I) -> Self {
    let container = Container::new();
    for (id, factory) in iter {
      container.bind(id, factory);
    }
    container
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut bindings: Vec<(String, &'static str)> = self
      .bindings
      .iter()
      .map(|e| (e.key().clone(), e.value().produces()))
      .collect();
    bindings.sort();
    f.debug_map().entries(bindings).finish()
  }
}

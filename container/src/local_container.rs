//! A single-threaded, non-thread-safe flavour of the container.

use crate::core::{next_container_id, ResolutionGuard};
use crate::error::{ContainerError, Result};
use once_cell::unsync::OnceCell;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

// A local, non-thread-safe version of the instance and factory types.
// They use `Rc` and `unsync::OnceCell`.
type LocalInstance = Rc<dyn Any>;
type LocalFactoryFn = dyn Fn(&LocalContainer) -> Result<LocalInstance>;

/// The single-threaded counterpart of [`Factory`](crate::Factory).
pub struct LocalFactory {
  produces: &'static str,
  shared: bool,
  call: Box<LocalFactoryFn>,
}

impl LocalFactory {
  /// A factory that runs `factory` on every resolution.
  pub fn new<T: 'static>(factory: impl Fn(&LocalContainer) -> T + 'static) -> Self {
    Self::from_rc(move |c| Ok(Rc::new(factory(c))))
  }

  /// A factory whose failures propagate out of `get` unchanged.
  pub fn fallible<T: 'static>(factory: impl Fn(&LocalContainer) -> Result<T> + 'static) -> Self {
    Self::from_rc(move |c| factory(c).map(Rc::new))
  }

  /// A factory producing a trait object (or any value already behind an `Rc`).
  pub fn from_trait<I: ?Sized + 'static>(
    factory: impl Fn(&LocalContainer) -> Rc<I> + 'static,
  ) -> Self {
    Self::from_rc(move |c| Ok(factory(c)))
  }

  /// A factory that always returns the same pre-built value.
  pub fn value<T: 'static>(value: T) -> Self {
    let instance: LocalInstance = Rc::new(Rc::new(value));
    Self {
      produces: type_name::<T>(),
      shared: true,
      call: Box::new(move |_| Ok(Rc::clone(&instance))),
    }
  }

  /// Wraps this factory so it runs at most once successfully.
  pub fn shared(self) -> Self {
    if self.shared {
      return self;
    }
    let cell: OnceCell<LocalInstance> = OnceCell::new();
    let inner = self.call;
    Self {
      produces: self.produces,
      shared: true,
      call: Box::new(move |c| cell.get_or_try_init(|| inner(c)).cloned()),
    }
  }

  /// The name of the type this factory produces.
  pub fn produces(&self) -> &'static str {
    self.produces
  }

  /// Whether repeated resolutions hand back the same value.
  pub fn is_shared(&self) -> bool {
    self.shared
  }

  fn from_rc<T: ?Sized + 'static>(
    factory: impl Fn(&LocalContainer) -> Result<Rc<T>> + 'static,
  ) -> Self {
    Self {
      produces: type_name::<T>(),
      shared: false,
      call: Box::new(move |c| factory(c).map(|value| Rc::new(value) as LocalInstance)),
    }
  }
}

impl fmt::Debug for LocalFactory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LocalFactory")
      .field("produces", &self.produces)
      .field("shared", &self.shared)
      .finish()
  }
}

/// A single-threaded, non-thread-safe dependency injection container.
///
/// Same semantics as [`Container`](crate::Container), built on a `HashMap`
/// behind a `RefCell` with `Rc` for shared ownership. Bound values do not
/// need to be `Send` or `Sync`.
///
/// The table is never borrowed while a factory runs, so factories may
/// register and resolve through the `&LocalContainer` they receive.
pub struct LocalContainer {
  id: u64,
  bindings: RefCell<HashMap<String, Rc<LocalFactory>>>,
}

impl Default for LocalContainer {
  fn default() -> Self {
    Self {
      id: next_container_id(),
      bindings: RefCell::default(),
    }
  }
}

impl LocalContainer {
  /// Creates a new, empty `LocalContainer`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns whether `id` currently has a binding. Nothing is resolved.
  pub fn has(&self, id: &str) -> bool {
    self.bindings.borrow().contains_key(id)
  }

  /// Number of bindings.
  pub fn len(&self) -> usize {
    self.bindings.borrow().len()
  }

  /// Returns whether no identifier is bound.
  pub fn is_empty(&self) -> bool {
    self.bindings.borrow().is_empty()
  }

  /// The bound identifiers, sorted.
  pub fn ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.bindings.borrow().keys().cloned().collect();
    ids.sort();
    ids
  }

  // --- Registration ---

  /// Stores `factory` under `id`, replacing any previous binding.
  pub fn bind(&self, id: impl Into<String>, factory: LocalFactory) {
    let id = id.into();
    tracing::trace!(
      target: "fibre_container",
      id = %id,
      produces = factory.produces(),
      "local binding registered"
    );
    let replaced = self.bindings.borrow_mut().insert(id, Rc::new(factory));
    // Dropped outside the borrow: a value's `Drop` may touch the container.
    drop(replaced);
  }

  /// Binds a factory that runs on every [`get`](LocalContainer::get).
  pub fn set<T: 'static>(&self, id: impl Into<String>, factory: impl Fn(&LocalContainer) -> T + 'static) {
    self.bind(id, LocalFactory::new(factory));
  }

  /// Binds a factory that may fail; its error is returned from `get`.
  pub fn try_set<T: 'static>(
    &self,
    id: impl Into<String>,
    factory: impl Fn(&LocalContainer) -> Result<T> + 'static,
  ) {
    self.bind(id, LocalFactory::fallible(factory));
  }

  /// Binds a factory producing a trait object.
  pub fn set_trait<I: ?Sized + 'static>(
    &self,
    id: impl Into<String>,
    factory: impl Fn(&LocalContainer) -> Rc<I> + 'static,
  ) {
    self.bind(id, LocalFactory::from_trait(factory));
  }

  /// Binds an already constructed value. Every `get` returns the same `Rc`.
  pub fn instance<T: 'static>(&self, id: impl Into<String>, value: T) {
    self.bind(id, LocalFactory::value(value));
  }

  /// Binds a factory whose first result is cached for the life of this binding.
  pub fn singleton<T: 'static>(
    &self,
    id: impl Into<String>,
    factory: impl Fn(&LocalContainer) -> T + 'static,
  ) {
    self.bind(id, LocalFactory::new(factory).shared());
  }

  /// Like [`singleton`](LocalContainer::singleton), retrying after a failure.
  pub fn try_singleton<T: 'static>(
    &self,
    id: impl Into<String>,
    factory: impl Fn(&LocalContainer) -> Result<T> + 'static,
  ) {
    self.bind(id, LocalFactory::fallible(factory).shared());
  }

  /// Binds a cached trait object.
  pub fn singleton_trait<I: ?Sized + 'static>(
    &self,
    id: impl Into<String>,
    factory: impl Fn(&LocalContainer) -> Rc<I> + 'static,
  ) {
    self.bind(id, LocalFactory::from_trait(factory).shared());
  }

  // --- Resolution ---

  /// Resolves `id` and returns its value as `T`.
  ///
  /// Fails with the same errors as [`Container::get`](crate::Container::get).
  pub fn get<T: ?Sized + 'static>(&self, id: &str) -> Result<Rc<T>> {
    let factory = self.binding(id)?;
    self.resolve_with(id, &factory)
  }

  // --- Redefinition ---

  /// Resolves `id` once now and rebinds it to `wrapper(frozen, container)`.
  ///
  /// See [`Container::extend`](crate::Container::extend).
  pub fn extend<T, U, F>(&self, id: &str, wrapper: F) -> Result<()>
  where
    T: ?Sized + 'static,
    U: 'static,
    F: Fn(Rc<T>, &LocalContainer) -> U + 'static,
  {
    self.rebind(id, move |previous: Rc<T>| {
      LocalFactory::new(move |c| wrapper(Rc::clone(&previous), c))
    })
  }

  /// [`extend`](LocalContainer::extend) for wrappers producing a trait object.
  pub fn extend_trait<T, I, F>(&self, id: &str, wrapper: F) -> Result<()>
  where
    T: ?Sized + 'static,
    I: ?Sized + 'static,
    F: Fn(Rc<T>, &LocalContainer) -> Rc<I> + 'static,
  {
    self.rebind(id, move |previous: Rc<T>| {
      LocalFactory::from_trait(move |c| wrapper(Rc::clone(&previous), c))
    })
  }

  // --- Removal ---

  /// Removes the binding for `id`, if any.
  pub fn unset(&self, id: &str) {
    let removed = self.bindings.borrow_mut().remove(id);
    if removed.is_some() {
      tracing::trace!(target: "fibre_container", id, "local binding removed");
    }
  }

  /// Removes every binding. Values already handed out are unaffected.
  pub fn flush(&self) {
    let flushed = std::mem::take(&mut *self.bindings.borrow_mut());
    tracing::debug!(target: "fibre_container", count = flushed.len(), "local container flushed");
  }

  // --- PRIVATE HELPERS ---

  fn binding(&self, id: &str) -> Result<Rc<LocalFactory>> {
    self
      .bindings
      .borrow()
      .get(id)
      .cloned()
      .ok_or_else(|| ContainerError::NotFound(id.to_owned()))
  }

  fn resolve_with<T: ?Sized + 'static>(&self, id: &str, factory: &LocalFactory) -> Result<Rc<T>> {
    let instance = {
      let _guard = ResolutionGuard::enter(self.id, id)?;
      (factory.call)(self)?
    };
    instance
      .downcast_ref::<Rc<T>>()
      .cloned()
      .ok_or_else(|| ContainerError::TypeMismatch {
        id: id.to_owned(),
        expected: type_name::<T>(),
        found: factory.produces(),
      })
  }

  fn rebind<T: ?Sized + 'static>(
    &self,
    id: &str,
    wrap: impl FnOnce(Rc<T>) -> LocalFactory,
  ) -> Result<()> {
    let current = self.binding(id)?;
    let previous = self.resolve_with::<T>(id, &current)?;
    let extended = wrap(previous);

    tracing::trace!(
      target: "fibre_container",
      id,
      produces = extended.produces(),
      "local binding extended"
    );
    let replaced = self.bindings.borrow_mut().insert(id.to_owned(), Rc::new(extended));
    drop(replaced);
    Ok(())
  }
}

impl<K: Into<String>> FromIterator<(K, LocalFactory)> for LocalContainer {
  fn from_iter<I: IntoIterator<Item = (K, LocalFactory)>>(iter: I) -> Self {
    let container = LocalContainer::new();
    for (id, factory) in iter {
      container.bind(id, factory);
    }
    container
  }
}

impl fmt::Debug for LocalContainer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bindings = self.bindings.borrow();
    let mut entries: Vec<(&String, &'static str)> =
      bindings.iter().map(|(id, factory)| (id, factory.produces())).collect();
    entries.sort();
    f.debug_map().entries(entries).finish()
  }
}

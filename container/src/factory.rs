//! Factories: the function values stored behind every binding.

use crate::container::Container;
use crate::error::Result;
use once_cell::sync::OnceCell;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A type-erased produced value. It always wraps an `Arc<T>` so that both
/// sized types and trait objects can be handed back from [`Container::get`].
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

type FactoryFn = dyn Fn(&Container) -> Result<Instance> + Send + Sync;

/// A producer for a bound value.
///
/// A factory receives the container it is resolved from, so it can look up
/// other bindings while building its own value. Whatever the closure captures
/// is owned by the factory.
///
/// Most code never names this type and uses the registration methods on
/// [`Container`] instead. It is public so bindings can be assembled up front
/// and collected into a container.
///
/// ```
/// use fibre_container::{Container, Factory};
///
/// let container: Container = [
///   ("host", Factory::new(|_| "localhost".to_string())),
///   ("port", Factory::new(|_| 8080_u16)),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(*container.get::<u16>("port").unwrap(), 8080);
/// ```
pub struct Factory {
  produces: &'static str,
  shared: bool,
  call: Box<FactoryFn>,
}

impl Factory {
  /// A factory that runs `factory` on every resolution.
  pub fn new<T, F>(factory: F) -> Self
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> T + Send + Sync + 'static,
  {
    Self::from_arc(move |c| Ok(Arc::new(factory(c))))
  }

  /// A factory whose failures propagate out of [`Container::get`] unchanged.
  pub fn fallible<T, F>(factory: F) -> Self
  where
    T: Send + Sync + 'static,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    Self::from_arc(move |c| factory(c).map(Arc::new))
  }

  /// A factory producing a trait object (or any value already behind an `Arc`).
  pub fn from_trait<I, F>(factory: F) -> Self
  where
    I: ?Sized + Send + Sync + 'static,
    F: Fn(&Container) -> Arc<I> + Send + Sync + 'static,
  {
    Self::from_arc(move |c| Ok(factory(c)))
  }

  /// A factory that always returns the same pre-built value.
  pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
    let instance: Instance = Arc::new(Arc::new(value));
    Self {
      produces: type_name::<T>(),
      shared: true,
      call: Box::new(move |_| Ok(Arc::clone(&instance))),
    }
  }

  /// Wraps this factory so it runs at most once successfully.
  ///
  /// The cache lives inside the returned factory, so it is discarded along
  /// with the binding. A failed first run leaves the cache empty.
  pub fn shared(self) -> Self {
    if self.shared {
      return self;
    }
    let cell: OnceCell<Instance> = OnceCell::new();
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

  pub(crate) fn produce(&self, container: &Container) -> Result<Instance> {
    (self.call)(container)
  }

  fn from_arc<T, F>(factory: F) -> Self
  where
    T: ?Sized + Send + Sync + 'static,
    F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
  {
    Self {
      produces: type_name::<T>(),
      shared: false,
      call: Box::new(move |c| factory(c).map(|value| Arc::new(value) as Instance)),
    }
  }
}

impl fmt::Debug for Factory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Factory")
      .field("produces", &self.produces)
      .field("shared", &self.shared)
      .finish()
  }
}

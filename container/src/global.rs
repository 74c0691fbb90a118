//! The process-wide container instance and its accessor.

use crate::container::Container;
use once_cell::sync::Lazy;

// Created on first access in a thread-safe manner and kept for the rest of
// the process. Nothing in `Container` itself refers to it.
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Provides a reference to the process-wide container.
///
/// Every call returns the same instance, so bindings registered from one part
/// of an application are visible everywhere else.
///
/// # Examples
///
/// ```
/// use fibre_container::global;
///
/// global().set("greeting", |_| String::from("Hello from global!"));
/// assert!(global().has("greeting"));
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}

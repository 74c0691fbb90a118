//! Public macros for ergonomic resolution.

/// Resolves a binding, panicking if it cannot be resolved.
///
/// `resolve!(Type, "id")` reads from the [`global()`](crate::global)
/// container. `resolve!(in container, Type, "id")` reads from any
/// container, including a `LocalContainer`.
///
/// # Panics
///
/// Panics with the resolution error's message when the binding is missing,
/// has another type, or is circular. For a non-panicking version, call
/// `get` directly.
///
/// # Examples
///
/// ```
/// use fibre_container::{global, resolve, Container};
///
/// global().singleton("app.name", |_| String::from("fibre"));
/// assert_eq!(*resolve!(String, "app.name"), "fibre");
///
/// let container = Container::new();
/// container.set("answer", |_| 42_u32);
/// assert_eq!(*resolve!(in container, u32, "answer"), 42);
/// ```
#[macro_export]
macro_rules! resolve {
  // Arm for an explicit container: resolve!(in container, MyService, "id")
  (in $container:expr, $type:ty, $id:expr) => {
    match $container.get::<$type>($id) {
      ::std::result::Result::Ok(value) => value,
      ::std::result::Result::Err(err) => {
        panic!("Failed to resolve required binding: {}", err)
      }
    }
  };

  // Arm for the global container: resolve!(MyService, "id")
  ($type:ty, $id:expr) => {
    $crate::resolve!(in $crate::global(), $type, $id)
  };
}

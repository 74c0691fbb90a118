//! The error type returned by fallible container operations.

use thiserror::Error;

/// Errors produced while resolving or extending a binding.
///
/// Registration never fails; only `get` and `extend` (and the fallible
/// factories they run) return these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContainerError {
  /// No binding is registered under the identifier.
  #[error("Identifier \"{0}\" is not defined in container.")]
  NotFound(String),

  /// A binding exists but produces a different type than the one requested.
  #[error("Identifier \"{id}\" resolves to `{found}`, not `{expected}`.")]
  TypeMismatch {
    id: String,
    expected: &'static str,
    found: &'static str,
  },

  /// Resolving the identifier required resolving itself again.
  #[error("Circular dependency detected while resolving identifier \"{0}\".")]
  CircularDependency(String),
}

impl ContainerError {
  /// The identifier the error refers to.
  pub fn id(&self) -> &str {
    match self {
      ContainerError::NotFound(id) => id,
      ContainerError::TypeMismatch { id, .. } => id,
      ContainerError::CircularDependency(id) => id,
    }
  }
}

/// Shorthand for results carrying a [`ContainerError`].
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;

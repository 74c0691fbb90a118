//! # Fibre Container
//!
//! A small, thread-safe dependency injection container keyed by string
//! identifiers.
//!
//! Each identifier is bound to a factory. Factories are lazy: nothing is built
//! until the identifier is resolved, and a plain binding is rebuilt on every
//! resolution. Factories receive the container itself, so they can resolve
//! their own dependencies.
//!
//! ## Core Concepts
//!
//! - **Binding**: an identifier paired with its current [`Factory`].
//!   Registering the same identifier again replaces the factory.
//! - **Singleton**: a binding whose first result is cached for as long as the
//!   binding exists.
//! - **Extend**: replace a binding with one that wraps its *current value*.
//!   The old binding is resolved once when `extend` is called and the result
//!   is frozen into the new binding.
//! - **Global Container**: a lazily created, process-wide instance reachable
//!   through [`global()`]. Containers created with [`Container::new`] are
//!   fully independent of it.
//!
//! Resolution is fallible: a missing identifier yields
//! [`ContainerError::NotFound`], a self-referencing resolution yields
//! [`ContainerError::CircularDependency`] instead of overflowing the stack.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_container::{Container, ContainerError};
//! use std::sync::Arc;
//!
//! struct Mailer {
//!   host: String,
//! }
//!
//! let container = Container::new();
//! container.set("mail.host", |_| String::from("smtp.example.com"));
//! container.try_singleton("mailer", |c| {
//!   Ok(Mailer {
//!     host: (*c.get::<String>("mail.host")?).clone(),
//!   })
//! });
//!
//! let mailer = container.get::<Mailer>("mailer").unwrap();
//! assert_eq!(mailer.host, "smtp.example.com");
//! assert!(Arc::ptr_eq(&mailer, &container.get::<Mailer>("mailer").unwrap()));
//!
//! container.extend("mail.host", |host: Arc<String>, _| host.to_uppercase()).unwrap();
//! assert_eq!(*container.get::<String>("mail.host").unwrap(), "SMTP.EXAMPLE.COM");
//!
//! assert_eq!(
//!   container.get::<Mailer>("nope").err(),
//!   Some(ContainerError::NotFound("nope".to_string()))
//! );
//! ```
//!
//! ## Features
//!
//! - `local`: enables [`LocalContainer`], a single-threaded container for
//!   values that are not `Send`/`Sync`.

mod container;
mod core;
mod error;
mod factory;
mod global;
#[cfg(feature = "local")]
mod local_container;
mod macros;

pub use container::Container;
pub use error::{ContainerError, Result};
pub use factory::Factory;
pub use global::global;
#[cfg(feature = "local")]
pub use local_container::{LocalContainer, LocalFactory};

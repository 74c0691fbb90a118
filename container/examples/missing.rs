use fibre_container::{global, resolve, ContainerError};
use std::panic;
use std::sync::Arc;

fn main() {
  // --- Using the fallible `get()` method ---
  match global().get::<String>("never.registered") {
    Ok(_) => panic!("Should not have found the binding!"),
    Err(err) => println!("get() failed as expected: {}", err),
  }

  // `extend` on a missing identifier fails the same way.
  let err = global()
    .extend("never.registered", |prev: Arc<String>, _| prev.len())
    .unwrap_err();
  assert_eq!(err, ContainerError::NotFound("never.registered".to_string()));

  // --- Using the panicking `resolve!` macro ---
  let result = panic::catch_unwind(|| {
    let _value = resolve!(String, "never.registered");
  });
  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Caught the expected panic from resolve!.");
}

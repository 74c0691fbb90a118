use fibre_container::{Container, ContainerError};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

// The trait must be Send + Sync for the container to accept it.
trait Greeter: Send + Sync {
  fn greet(&self) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self) -> String {
    "Hello!".to_string()
  }
}

#[derive(Debug, PartialEq, Eq)]
struct SimpleService {
  id: u32,
}

// --- Basic Tests ---

#[test]
fn test_set_then_get_returns_the_factory_value() {
  let container = Container::new();
  container.set("number", |_| 7_i64);
  container.set("service", |_| SimpleService { id: 101 });

  assert_eq!(*container.get::<i64>("number").unwrap(), 7);
  assert_eq!(
    *container.get::<SimpleService>("service").unwrap(),
    SimpleService { id: 101 }
  );
}

#[test]
fn test_plain_binding_runs_factory_on_every_get() {
  let container = Container::new();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&calls);
  container.set("counted", move |_| counter.fetch_add(1, Ordering::SeqCst) + 1);

  let r1 = container.get::<usize>("counted").unwrap();
  let r2 = container.get::<usize>("counted").unwrap();
  let r3 = container.get::<usize>("counted").unwrap();

  assert_eq!(calls.load(Ordering::SeqCst), 3);
  assert_eq!((*r1, *r2, *r3), (1, 2, 3));
  assert!(!Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_singleton_runs_factory_once() {
  let container = Container::new();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&calls);
  container.singleton("counted", move |_| counter.fetch_add(1, Ordering::SeqCst) + 1);

  let r1 = container.get::<usize>("counted").unwrap();
  let r2 = container.get::<usize>("counted").unwrap();
  let r3 = container.get::<usize>("counted").unwrap();

  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert_eq!((*r1, *r2, *r3), (1, 1, 1));
  assert!(Arc::ptr_eq(&r1, &r3));
}

#[test]
fn test_singleton_registration_is_lazy() {
  let container = Container::new();
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&calls);
  container.singleton("lazy", move |_| counter.fetch_add(1, Ordering::SeqCst));

  assert!(container.has("lazy"));
  assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_re_registering_a_singleton_discards_the_cache() {
  let container = Container::new();
  container.singleton("config", |_| String::from("first"));
  let first = container.get::<String>("config").unwrap();

  container.singleton("config", |_| String::from("second"));
  let second = container.get::<String>("config").unwrap();

  assert_eq!(*first, "first");
  assert_eq!(*second, "second");
  assert!(Arc::ptr_eq(&second, &container.get::<String>("config").unwrap()));
}

#[test]
fn test_instance_returns_the_same_arc() {
  let container = Container::new();
  container.instance("service", SimpleService { id: 202 });

  let r1 = container.get::<SimpleService>("service").unwrap();
  let r2 = container.get::<SimpleService>("service").unwrap();

  assert_eq!(r1.id, 202);
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_missing_identifier() {
  let container = Container::new();

  assert!(!container.has("nope"));
  let err = container.get::<u32>("nope").unwrap_err();
  assert_eq!(err, ContainerError::NotFound("nope".to_string()));
  assert_eq!(err.id(), "nope");
  assert_eq!(
    err.to_string(),
    "Identifier \"nope\" is not defined in container."
  );
}

#[test]
fn test_wrong_type_is_reported() {
  let container = Container::new();
  container.set("port", |_| String::from("8080"));

  let err = container.get::<u16>("port").unwrap_err();
  assert_eq!(
    err,
    ContainerError::TypeMismatch {
      id: "port".to_string(),
      expected: std::any::type_name::<u16>(),
      found: std::any::type_name::<String>(),
    }
  );
}

#[test]
fn test_overwrite_keeps_only_the_latest_factory() {
  let container = Container::new();
  container.set("value", |_| 1_u8);
  container.set("value", |_| 2_u8);

  assert_eq!(*container.get::<u8>("value").unwrap(), 2);
  assert_eq!(container.len(), 1);
}

#[test]
fn test_overwrite_may_change_the_bound_type() {
  let container = Container::new();
  container.set("value", |_| 1_u8);
  container.set("value", |_| "one");

  assert_eq!(*container.get::<&str>("value").unwrap(), "one");
  assert!(container.get::<u8>("value").is_err());
}

#[test]
fn test_flush_removes_everything() {
  let container = Container::new();
  container.set("a", |_| 1_i32);
  container.singleton("b", |_| 2_i32);
  container.instance("c", 3_i32);

  container.flush();

  assert!(container.is_empty());
  for id in ["a", "b", "c"] {
    assert!(!container.has(id));
    assert_eq!(
      container.get::<i32>(id).unwrap_err(),
      ContainerError::NotFound(id.to_string())
    );
  }
}

#[test]
fn test_flush_does_not_affect_values_already_resolved() {
  let container = Container::new();
  container.singleton("kept", |_| String::from("still here"));
  let kept = container.get::<String>("kept").unwrap();

  container.flush();

  assert_eq!(*kept, "still here");
}

#[test]
fn test_unset_removes_a_single_binding_and_is_idempotent() {
  let container = Container::new();
  container.set("a", |_| 1_i32);
  container.set("b", |_| 2_i32);

  container.unset("a");
  container.unset("a");
  container.unset("never-bound");

  assert!(!container.has("a"));
  assert!(container.get::<i32>("a").is_err());
  assert_eq!(*container.get::<i32>("b").unwrap(), 2);
}

#[test]
fn test_trait_resolution() {
  let container = Container::new();
  container.set_trait::<dyn Greeter, _>("greeter", |_| Arc::new(EnglishGreeter));

  let greeter = container.get::<dyn Greeter>("greeter").unwrap();
  assert_eq!(greeter.greet(), "Hello!");
}

#[test]
fn test_trait_singleton_is_shared() {
  let container = Container::new();
  container.singleton_trait::<dyn Greeter, _>("greeter", |_| Arc::new(EnglishGreeter));

  let g1 = container.get::<dyn Greeter>("greeter").unwrap();
  let g2 = container.get::<dyn Greeter>("greeter").unwrap();
  assert!(Arc::ptr_eq(&g1, &g2));
}

#[test]
fn test_each_id_resolves_its_own_captured_value() {
  let container = Container::new();
  for i in 1..=100_u32 {
    container.set(format!("_{}", i), move |_| i);
  }

  for i in 1..=100_u32 {
    assert_eq!(*container.get::<u32>(&format!("_{}", i)).unwrap(), i);
  }
}

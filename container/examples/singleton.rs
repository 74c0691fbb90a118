use fibre_container::Container;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() {
  let container = Container::new();

  // This factory runs once; the result is cached by the binding.
  container.singleton("singleton_tracker", |_| {
    println!("Creating SINGLETON RequestTracker...");
    RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }
  });

  // This factory runs on every resolution.
  container.set("plain_tracker", |_| {
    println!("Creating PLAIN RequestTracker...");
    RequestTracker {
      id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
    }
  });

  println!("--- Resolving Singletons ---");
  let s1 = container.get::<RequestTracker>("singleton_tracker").unwrap();
  let s2 = container.get::<RequestTracker>("singleton_tracker").unwrap();
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  println!("--- Resolving Plain Bindings ---");
  let p1 = container.get::<RequestTracker>("plain_tracker").unwrap();
  let p2 = container.get::<RequestTracker>("plain_tracker").unwrap();
  println!("Plain 1 ID: {}, Plain 2 ID: {}", p1.id, p2.id);
  assert_eq!((p1.id, p2.id), (1, 2));

  println!("--- Re-registering the Singleton ---");
  container.singleton("singleton_tracker", |_| RequestTracker { id: 99 });
  let s3 = container.get::<RequestTracker>("singleton_tracker").unwrap();
  println!("Fresh singleton ID: {}", s3.id);
  assert!(!Arc::ptr_eq(&s1, &s3));
}

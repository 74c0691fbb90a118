use fibre_container::{global, resolve};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// Binds `_1`..`_100` on the global container, doubles each through `extend`,
// and prints the results. Run with `RUST_LOG=fibre_container=trace` to see
// the container's own events.
fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let container = global();

  for i in 1..=100_i64 {
    let id = format!("_{}", i);

    container.set(id.clone(), move |_| i);
    container
      .extend(&id, |prev: Arc<i64>, _| *prev * 2)
      .expect("binding was registered just above");

    let value = resolve!(i64, &id);
    assert_eq!(*value, 2 * i);
    println!("{} => {}", id, value);
  }
}

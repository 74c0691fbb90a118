use fibre_container::Container;
use std::sync::Arc;

trait Notifier: Send + Sync {
  fn notify(&self, message: &str) -> String;
}

struct EmailNotifier {
  sender: String,
}

impl Notifier for EmailNotifier {
  fn notify(&self, message: &str) -> String {
    format!("email from {}: {}", self.sender, message)
  }
}

struct Retrying {
  inner: Arc<dyn Notifier>,
  attempts: u32,
}

impl Notifier for Retrying {
  fn notify(&self, message: &str) -> String {
    format!("{} (up to {} attempts)", self.inner.notify(message), self.attempts)
  }
}

fn main() {
  let container = Container::new();
  container.instance("mail.sender", String::from("noreply@example.com"));
  container.set("mail.attempts", |_| 3_u32);

  // A trait binding whose factory resolves its own dependencies.
  container.singleton_trait::<dyn Notifier, _>("notifier", |c| {
    let sender = c.get::<String>("mail.sender").unwrap();
    Arc::new(EmailNotifier {
      sender: (*sender).clone(),
    })
  });

  // Decorate the existing service without touching its registration.
  container
    .extend_trait::<dyn Notifier, dyn Notifier, _>("notifier", |inner, c| {
      let attempts = *c.get::<u32>("mail.attempts").unwrap();
      Arc::new(Retrying { inner, attempts })
    })
    .unwrap();

  let notifier = container.get::<dyn Notifier>("notifier").unwrap();
  println!("{}", notifier.notify("Your subscription is expiring soon."));
}

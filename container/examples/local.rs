use fibre_container::LocalContainer;
use std::cell::RefCell;
use std::rc::Rc;

// A service that is neither Send nor Sync.
struct Journal {
  entries: RefCell<Vec<String>>,
}

fn main() {
  let container = LocalContainer::new();
  container.singleton("journal", |_| Journal {
    entries: RefCell::new(Vec::new()),
  });
  container.set("writer", |c| {
    let journal = c.get::<Journal>("journal").unwrap();
    journal.entries.borrow_mut().push("writer created".to_string());
    journal
  });

  container.get::<Rc<Journal>>("writer").unwrap();
  container.get::<Rc<Journal>>("writer").unwrap();

  let journal = container.get::<Journal>("journal").unwrap();
  println!("{:?}", journal.entries.borrow());
  assert_eq!(journal.entries.borrow().len(), 2);
}

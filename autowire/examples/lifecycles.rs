use fibre_autowire::{Resolver, TypeCatalog};
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
  let mut resolver = Resolver::with_catalog(Arc::new(TypeCatalog::new()));

  // --- Shared Registration ---
  // This construction function will only be called ONCE.
  resolver
    .register("shared_tracker", |_| {
      println!("Creating SHARED RequestTracker...");
      Ok(RequestTracker {
        id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
      })
    })
    .unwrap();

  // --- Factory Registration ---
  // This construction function will be called EVERY time the key is resolved.
  resolver
    .register_factory("factory_tracker", |_| {
      println!("Creating FACTORY RequestTracker...");
      Ok(RequestTracker {
        id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
      })
    })
    .unwrap();

  println!("--- Resolving Shared ---");
  let s1 = resolver.make_as::<RequestTracker>("shared_tracker", &[]).unwrap();
  let s2 = resolver.make_as::<RequestTracker>("shared_tracker", &[]).unwrap();
  println!("Shared 1 ID: {}, Shared 2 ID: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2), "Shared instances should be identical");

  println!("--- Resolving Factory ---");
  let f1 = resolver.make_as::<RequestTracker>("factory_tracker", &[]).unwrap();
  let f2 = resolver.make_as::<RequestTracker>("factory_tracker", &[]).unwrap();
  println!("Factory 1 ID: {}, Factory 2 ID: {}", f1.id, f2.id);
  assert!(!Arc::ptr_eq(&f1, &f2), "Factory instances should be different");
}

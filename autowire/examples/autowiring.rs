use fibre_autowire::{json, resolve, Blueprint, Resolver, TypeCatalog};
use std::sync::Arc;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct SmtpSender {
  host: String,
}

impl MessageSender for SmtpSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email via {} to {}: '{}'", self.host, to, message)
  }
}

struct Notifier {
  sender: Arc<SmtpSender>,
  signature: String,
}

impl Notifier {
  fn notify(&self, to: &str, message: &str) -> String {
    self.sender.send(to, &format!("{} -- {}", message, self.signature))
  }
}

fn main() {
  // --- Declaration ---
  let catalog = Arc::new(TypeCatalog::new());
  catalog.define(
    Blueprint::new("SmtpSender", |args| Ok(SmtpSender { host: args.get(0)? }))
      .param("smtp_host")
      .implements("MessageSender"),
  );
  catalog.define(
    Blueprint::new("Notifier", |args| {
      Ok(Notifier {
        sender: args.instance(0)?,
        signature: args.get(1)?,
      })
    })
    .dependency("sender", "MessageSender")
    .param("signature"),
  );

  // --- Wiring ---
  let mut resolver = Resolver::with_catalog(catalog);
  resolver.set_param("smtp_host", json!("mail.example.org"));
  resolver.make("SmtpSender", &[]).unwrap();
  resolver.bind_interface("MessageSender", "SmtpSender").unwrap();

  // --- Resolution ---
  // `sender` comes from the binding, `signature` from the caller.
  let notifier = resolve!(resolver, Notifier, "Notifier", ["The Fibre Team"]);
  let result = notifier.notify("test@example.com", "Hello from Fibre!");

  println!("{}", result);
  assert!(result.contains("mail.example.org"));
  assert!(result.contains("The Fibre Team"));
}

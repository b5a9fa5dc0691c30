//! # Fibre Autowire
//!
//! An autowiring dependency resolver for Rust.
//!
//! Given a type name and optional explicit arguments, a [`Resolver`] produces a
//! fully constructed object graph: constructor dependencies are resolved by
//! type, scalar parameters are filled from named configuration values, and
//! results are cached as shared singletons or produced fresh on every call.
//!
//! ## Core Concepts
//!
//! - **Type catalog**: constructors are declared once as [`Blueprint`]s in a
//!   [`TypeCatalog`], listing their parameters in order. A parameter is either
//!   a dependency on another type, or an untyped slot.
//! - **Autowiring**: when nothing is registered for a requested type, its
//!   blueprint is used. Dependencies are resolved (and shared) recursively,
//!   untyped slots take a named parameter with the same name, and whatever
//!   remains is filled from the caller's arguments, left to right.
//! - **Registrations**: `register` installs a construction function whose
//!   result is shared, `register_factory` one that runs on every request.
//! - **Interface bindings**: `bind_interface` redirects an abstract name to a
//!   registered key or to a catalog type implementing it.
//! - **Fresh instances**: `make_new` never hands out the shared instance; a
//!   cached instance is shallow-copied when its type allows it.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_autowire::{json, Blueprint, Resolver, TypeCatalog};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self, who: &str) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!   fn greet(&self, who: &str) -> String {
//!     format!("Hello, {}!", who)
//!   }
//! }
//!
//! struct Welcome {
//!   greeter: Arc<English>,
//!   guest: String,
//! }
//!
//! let catalog = Arc::new(TypeCatalog::new());
//! catalog.define(Blueprint::new("English", |_| Ok(English)).implements("Greeter"));
//! catalog.define(
//!   Blueprint::new("Welcome", |args| {
//!     Ok(Welcome {
//!       greeter: args.instance(0)?,
//!       guest: args.get(1)?,
//!     })
//!   })
//!   .dependency("greeter", "Greeter")
//!   .param("guest"),
//! );
//!
//! let mut resolver = Resolver::with_catalog(catalog);
//! resolver.bind_interface("Greeter", "English").unwrap();
//!
//! let welcome = resolver.make_as::<Welcome>("Welcome", &[json!("Ada")]).unwrap();
//! assert_eq!(welcome.greeter.greet(&welcome.guest), "Hello, Ada!");
//! ```

mod args;
mod autowire;
mod blueprint;
mod catalog;
mod config;
mod core;
mod error;
mod global;
mod macros;
mod resolver;
#[cfg(feature = "shared")]
mod shared;

pub use args::{Arg, Args, Instance};
pub use blueprint::{Blueprint, Param};
pub use catalog::TypeCatalog;
pub use config::{ResolverBuilder, ResolverConfig, DEFAULT_MAX_DEPTH};
pub use crate::core::derive_key;
pub use error::{ResolveError, Result};
pub use global::global_catalog;
pub use resolver::Resolver;
pub use serde_json::{json, Value};
#[cfg(feature = "shared")]
pub use shared::SharedResolver;

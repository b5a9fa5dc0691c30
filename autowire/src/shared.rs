//! A thread-safe handle around a [`Resolver`].

use crate::args::Instance;
use crate::error::Result;
use crate::resolver::Resolver;
use parking_lot::{Mutex, MutexGuard};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// A cloneable, thread-safe handle to one [`Resolver`].
///
/// Every operation takes a single lock for its whole duration, nested
/// resolutions included, so the check-then-cache steps of a resolution and
/// the last-arguments slot are never interleaved between threads.
/// Construction functions receive the locked `&mut Resolver` and must use it
/// rather than the handle; going through the handle from inside a
/// construction function would deadlock.
#[derive(Clone)]
pub struct SharedResolver {
  inner: Arc<Mutex<Resolver>>,
}

impl Default for SharedResolver {
  fn default() -> Self {
    Self::new(Resolver::new())
  }
}

impl From<Resolver> for SharedResolver {
  fn from(resolver: Resolver) -> Self {
    Self::new(resolver)
  }
}

impl SharedResolver {
  pub fn new(resolver: Resolver) -> Self {
    Self {
      inner: Arc::new(Mutex::new(resolver)),
    }
  }

  /// Locks the resolver for a sequence of operations.
  pub fn lock(&self) -> MutexGuard<'_, Resolver> {
    self.inner.lock()
  }

  /// Runs `f` with the resolver locked.
  pub fn with<R>(&self, f: impl FnOnce(&mut Resolver) -> R) -> R {
    f(&mut self.inner.lock())
  }

  // --- Registration ---
  pub fn register<T, F>(&self, key: &str, ctor: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn(&mut Resolver) -> Result<T> + Send + Sync + 'static,
  {
    self.inner.lock().register(key, ctor)
  }

  pub fn register_factory<T, F>(&self, key: &str, ctor: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn(&mut Resolver) -> Result<T> + Send + Sync + 'static,
  {
    self.inner.lock().register_factory(key, ctor)
  }

  pub fn add_instance<T: Any + Send + Sync>(&self, key: &str, value: T) -> Result<()> {
    self.inner.lock().add_instance(key, value)
  }

  pub fn bind_interface(&self, interface: &str, target: &str) -> Result<()> {
    self.inner.lock().bind_interface(interface, target)
  }

  pub fn set_param(&self, name: &str, value: impl Into<Value>) {
    self.inner.lock().set_param(name, value)
  }

  // --- Resolution ---
  pub fn make(&self, type_name: &str, args: &[Value]) -> Result<Instance> {
    self.inner.lock().make(type_name, args)
  }

  pub fn make_new(&self, type_name: &str, args: &[Value]) -> Result<Instance> {
    self.inner.lock().make_new(type_name, args)
  }

  pub fn make_as<T: Any + Send + Sync>(&self, type_name: &str, args: &[Value]) -> Result<Arc<T>> {
    self.inner.lock().make_as(type_name, args)
  }

  pub fn make_new_as<T: Any + Send + Sync>(&self, type_name: &str, args: &[Value]) -> Result<Arc<T>> {
    self.inner.lock().make_new_as(type_name, args)
  }

  pub fn param(&self, name: &str) -> Result<Value> {
    self.inner.lock().param(name)
  }

  /// A snapshot of the last explicit argument list.
  pub fn args(&self) -> Vec<Value> {
    self.inner.lock().args().to_vec()
  }
}

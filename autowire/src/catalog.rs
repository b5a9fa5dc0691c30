//! The table of declared constructors shared by resolvers.

use crate::args::Instance;
use crate::blueprint::Blueprint;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

pub(crate) type Copier = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

pub(crate) fn copier_for<T: Any + Clone + Send + Sync>() -> Copier {
  Arc::new(|instance: &Instance| {
    instance
      .downcast_ref::<T>()
      .map(|value| Arc::new(value.clone()) as Instance)
  })
}

/// A concurrent catalog of constructible types.
///
/// The catalog answers the questions the resolver would otherwise put to a
/// reflection facility: does a type exist, what does its constructor take,
/// how is it built, and which interfaces does it implement. Definitions can be
/// added at any time through a shared reference, and a single catalog can back
/// any number of resolvers.
#[derive(Default)]
pub struct TypeCatalog {
  blueprints: DashMap<String, Arc<Blueprint>>,
  copiers: DashMap<TypeId, Copier>,
}

impl TypeCatalog {
  /// Creates a new, empty `TypeCatalog`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a blueprint. A later definition under the same name replaces the
  /// earlier one.
  pub fn define(&self, blueprint: Blueprint) {
    tracing::debug!(
      type_name = blueprint.name(),
      arity = blueprint.arity(),
      "defining type"
    );
    let blueprint = Arc::new(blueprint);
    if let Some((type_id, copier)) = blueprint.copier() {
      self.copiers.insert(*type_id, copier.clone());
    }
    self.blueprints.insert(blueprint.name().to_owned(), blueprint);
  }

  /// Lets `make_new` copy cached instances of `T`, whoever built them.
  pub fn allow_copy<T: Any + Clone + Send + Sync>(&self) {
    self.copiers.insert(TypeId::of::<T>(), copier_for::<T>());
  }

  pub fn get(&self, type_name: &str) -> Option<Arc<Blueprint>> {
    self.blueprints.get(type_name).map(|entry| entry.value().clone())
  }

  pub fn contains(&self, type_name: &str) -> bool {
    self.blueprints.contains_key(type_name)
  }

  /// Whether `type_name` is defined and declares `interface`.
  pub fn implements(&self, type_name: &str, interface: &str) -> bool {
    self
      .blueprints
      .get(type_name)
      .is_some_and(|entry| entry.implements_interface(interface))
  }

  pub fn len(&self) -> usize {
    self.blueprints.len()
  }

  pub fn is_empty(&self) -> bool {
    self.blueprints.is_empty()
  }

  /// Returns a shallow copy of `instance` if its type is copyable.
  pub fn copy(&self, instance: &Instance) -> Option<Instance> {
    let type_id = (**instance).type_id();
    let copier = self.copiers.get(&type_id).map(|entry| entry.value().clone())?;
    copier(instance)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Clone, Debug, PartialEq)]
  struct Mailer(u8);

  #[test]
  fn implements_needs_a_defined_type() {
    let catalog = TypeCatalog::new();
    catalog.define(Blueprint::new("Mailer", |_| Ok(Mailer(1))).implements("Transport"));

    assert!(catalog.implements("Mailer", "Transport"));
    assert!(!catalog.implements("Mailer", "Queue"));
    assert!(!catalog.implements("Missing", "Transport"));
  }

  #[test]
  fn copy_requires_a_registered_copier() {
    let catalog = TypeCatalog::new();
    let instance: Instance = Arc::new(Mailer(3));
    assert!(catalog.copy(&instance).is_none());

    catalog.allow_copy::<Mailer>();
    let copy = catalog.copy(&instance).unwrap();
    assert_eq!(copy.downcast_ref::<Mailer>(), Some(&Mailer(3)));
    assert!(!Arc::ptr_eq(&copy, &instance));
  }
}

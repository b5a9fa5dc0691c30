//! The process-wide type catalog.

use crate::catalog::TypeCatalog;
use once_cell::sync::Lazy;
use std::sync::Arc;

// Created on first access. Resolvers built without an explicit catalog share it.
static GLOBAL_CATALOG: Lazy<Arc<TypeCatalog>> = Lazy::new(|| Arc::new(TypeCatalog::new()));

/// Provides a handle to the global type catalog.
///
/// Types defined here are visible to every resolver created with
/// [`Resolver::new`](crate::Resolver::new). Resolver state itself is never
/// global; each resolver owns its registrations and cache.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{global_catalog, Blueprint, Resolver};
///
/// struct Clock;
/// global_catalog().define(Blueprint::new("Clock", |_| Ok(Clock)));
///
/// let mut resolver = Resolver::new();
/// assert!(resolver.make_as::<Clock>("Clock", &[]).is_ok());
/// ```
pub fn global_catalog() -> Arc<TypeCatalog> {
  GLOBAL_CATALOG.clone()
}

//! Resolver configuration and its builder.

use crate::catalog::TypeCatalog;
use crate::global::global_catalog;
use crate::resolver::Resolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The default bound on nested resolutions.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Tunables for a [`Resolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
  /// Maximum number of resolutions that may be in progress at once.
  pub max_depth: usize,
  /// Fail with `CycleDetected` when a key is requested while it is still
  /// being resolved. When off, cycles end at `max_depth`.
  pub detect_cycles: bool,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
      detect_cycles: true,
    }
  }
}

/// A builder for [`Resolver`] instances.
///
/// ```
/// use fibre_autowire::{Resolver, TypeCatalog};
/// use std::sync::Arc;
///
/// let resolver = Resolver::builder()
///   .catalog(Arc::new(TypeCatalog::new()))
///   .max_depth(16)
///   .build();
/// assert_eq!(resolver.config().max_depth, 16);
/// ```
#[derive(Default)]
pub struct ResolverBuilder {
  catalog: Option<Arc<TypeCatalog>>,
  config: ResolverConfig,
}

impl ResolverBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Uses `catalog` instead of the global one.
  pub fn catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
    self.catalog = Some(catalog);
    self
  }

  pub fn config(mut self, config: ResolverConfig) -> Self {
    self.config = config;
    self
  }

  /// Sets the maximum resolution depth. A value of zero is raised to one.
  pub fn max_depth(mut self, max_depth: usize) -> Self {
    self.config.max_depth = max_depth.max(1);
    self
  }

  pub fn detect_cycles(mut self, detect_cycles: bool) -> Self {
    self.config.detect_cycles = detect_cycles;
    self
  }

  pub fn build(self) -> Resolver {
    let catalog = self.catalog.unwrap_or_else(global_catalog);
    let mut config = self.config;
    config.max_depth = config.max_depth.max(1);
    Resolver::from_parts(catalog, config)
  }
}

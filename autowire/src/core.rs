//! Core, non-public data structures for the resolver.

use crate::args::Instance;
use crate::error::{ResolveError, Result};
use crate::resolver::Resolver;
use serde_json::Value;
use std::hash::{BuildHasher, Hasher};
use std::sync::Arc;

// Fixed seeds keep keys stable across resolvers and runs of the same build.
const KEY_SEEDS: [u64; 4] = [
  0x243f_6a88_85a3_08d3,
  0x1319_8a2e_0370_7344,
  0xa409_3822_299f_31d0,
  0x082e_fa98_ec4e_6c89,
];

const KEY_SEPARATOR: char = '#';

/// Derives the cache slot for a type and an explicit argument list.
///
/// Without arguments the key is the type name itself. Otherwise a 64-bit
/// digest of the canonical JSON text of `args` is appended, so structurally
/// equal argument lists share a key. Distinct lists whose digests collide
/// would share a key as well; that risk is accepted.
pub fn derive_key(type_name: &str, args: &[Value]) -> String {
  if args.is_empty() {
    return type_name.to_owned();
  }
  let canonical = Value::Array(args.to_vec()).to_string();
  let hasher = ahash::RandomState::with_seeds(KEY_SEEDS[0], KEY_SEEDS[1], KEY_SEEDS[2], KEY_SEEDS[3]);
  let mut state = hasher.build_hasher();
  state.write(canonical.as_bytes());
  let digest = state.finish();
  format!("{}{}{:016x}", type_name, KEY_SEPARATOR, digest)
}

pub(crate) type ConstructFn = Arc<dyn Fn(&mut Resolver) -> Result<Instance> + Send + Sync>;

/// A user-supplied construction function and its lifecycle.
#[derive(Clone)]
pub(crate) enum Provider {
  /// Invoked once; the result is cached under the key.
  Shared(ConstructFn),
  /// Invoked on every resolution; never cached.
  Factory(ConstructFn),
}

impl Provider {
  pub(crate) fn is_factory(&self) -> bool {
    matches!(self, Provider::Factory(_))
  }
}

/// The keys currently being resolved, outermost first.
#[derive(Debug, Default)]
pub(crate) struct ResolutionStack {
  keys: Vec<String>,
}

impl ResolutionStack {
  /// Pushes `key`, refusing re-entry and runaway depth.
  pub(crate) fn enter(&mut self, key: &str, detect_cycles: bool, max_depth: usize) -> Result<()> {
    if detect_cycles && self.keys.iter().any(|k| k == key) {
      let mut chain = self.keys.clone();
      chain.push(key.to_owned());
      tracing::debug!(chain = ?chain, "circular dependency detected");
      return Err(ResolveError::CycleDetected { chain });
    }
    if self.keys.len() >= max_depth {
      tracing::debug!(key, limit = max_depth, "resolution depth limit exceeded");
      return Err(ResolveError::DepthExceeded {
        key: key.to_owned(),
        limit: max_depth,
      });
    }
    self.keys.push(key.to_owned());
    Ok(())
  }

  /// Drops every key entered above `depth`.
  pub(crate) fn truncate(&mut self, depth: usize) {
    self.keys.truncate(depth);
  }

  pub(crate) fn depth(&self) -> usize {
    self.keys.len()
  }
}

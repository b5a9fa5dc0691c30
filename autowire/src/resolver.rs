//! The `Resolver`: registrations, cached instances, and the resolution
//! procedures that tie them to the type catalog.

use crate::args::{Args, Instance};
use crate::autowire::SlotPlan;
use crate::catalog::TypeCatalog;
use crate::config::{ResolverBuilder, ResolverConfig};
use crate::core::{derive_key, Provider, ResolutionStack};
use crate::error::{ResolveError, Result};
use serde_json::Value;
use std::any::{type_name, Any};
use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, trace};

/// A dependency resolver.
///
/// A resolver builds object graphs from the blueprints of its
/// [`TypeCatalog`], fills untyped constructor parameters from named
/// parameters and caller arguments, and caches what it builds. Construction
/// can be taken over per key with [`register`](Resolver::register) (built
/// once, then shared) or [`register_factory`](Resolver::register_factory)
/// (built on every request), and abstract names can be redirected with
/// [`bind_interface`](Resolver::bind_interface).
///
/// All state is owned by the resolver and mutated through `&mut self`; wrap
/// it in a [`SharedResolver`](crate::SharedResolver) to use it from several
/// threads.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{json, Blueprint, Resolver, TypeCatalog};
/// use std::sync::Arc;
///
/// struct Database {
///   dsn: String,
/// }
/// struct Users {
///   db: Arc<Database>,
/// }
///
/// let catalog = Arc::new(TypeCatalog::new());
/// catalog.define(Blueprint::new("Database", |args| Ok(Database { dsn: args.get(0)? })).param("dsn"));
/// catalog.define(
///   Blueprint::new("Users", |args| Ok(Users { db: args.instance(0)? })).dependency("db", "Database"),
/// );
///
/// let mut resolver = Resolver::builder().catalog(catalog).build();
/// resolver.set_param("dsn", json!("postgres://localhost/app"));
///
/// let users = resolver.make_as::<Users>("Users", &[]).unwrap();
/// assert_eq!(users.db.dsn, "postgres://localhost/app");
///
/// let again = resolver.make_as::<Users>("Users", &[]).unwrap();
/// assert!(Arc::ptr_eq(&users, &again));
/// ```
pub struct Resolver {
  catalog: Arc<TypeCatalog>,
  config: ResolverConfig,
  known: HashSet<String>,
  providers: HashMap<String, Provider>,
  instances: HashMap<String, Instance>,
  interfaces: HashMap<String, String>,
  params: HashMap<String, Value>,
  last_args: Vec<Value>,
  stack: ResolutionStack,
}

impl Default for Resolver {
  fn default() -> Self {
    Self::new()
  }
}

impl Resolver {
  /// Creates a resolver backed by the global catalog.
  pub fn new() -> Self {
    ResolverBuilder::new().build()
  }

  /// Creates a resolver backed by `catalog`.
  pub fn with_catalog(catalog: Arc<TypeCatalog>) -> Self {
    ResolverBuilder::new().catalog(catalog).build()
  }

  pub fn builder() -> ResolverBuilder {
    ResolverBuilder::new()
  }

  pub(crate) fn from_parts(catalog: Arc<TypeCatalog>, config: ResolverConfig) -> Self {
    Self {
      catalog,
      config,
      known: HashSet::new(),
      providers: HashMap::new(),
      instances: HashMap::new(),
      interfaces: HashMap::new(),
      params: HashMap::new(),
      last_args: Vec::new(),
      stack: ResolutionStack::default(),
    }
  }

  pub fn catalog(&self) -> &Arc<TypeCatalog> {
    &self.catalog
  }

  pub fn config(&self) -> &ResolverConfig {
    &self.config
  }

  // --- PRIVATE HELPERS ---

  fn add_provider(&mut self, key: &str, provider: Provider) -> Result<()> {
    if key.trim().is_empty() {
      return Err(ResolveError::InvalidArgument(
        "a construction function needs a non-empty key".to_owned(),
      ));
    }
    debug!(key, factory = provider.is_factory(), "registering construction function");
    self.known.insert(key.to_owned());
    self.providers.insert(key.to_owned(), provider);
    Ok(())
  }

  fn cache(&mut self, key: &str, instance: &Instance) {
    self.known.insert(key.to_owned());
    self.instances.insert(key.to_owned(), instance.clone());
  }

  /// Runs `resolve` with `key` pushed on the resolution stack.
  fn guarded<R>(&mut self, key: &str, resolve: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
    let mut guard = ResolutionGuard::enter(self, key)?;
    resolve(&mut *guard)
  }

  fn downcast<T: Any + Send + Sync>(instance: Instance, key: &str) -> Result<Arc<T>> {
    instance.downcast::<T>().map_err(|_| ResolveError::TypeMismatch {
      key: key.to_owned(),
      expected: type_name::<T>(),
    })
  }

  // --- REGISTRATION ---

  /// Registers a construction function for `key`.
  ///
  /// The function runs on the first resolution of `key`; its result is cached
  /// and shared from then on.
  pub fn register<T, F>(&mut self, key: &str, ctor: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn(&mut Resolver) -> Result<T> + Send + Sync + 'static,
  {
    let ctor = Arc::new(move |resolver: &mut Resolver| ctor(resolver).map(|v| Arc::new(v) as Instance));
    self.add_provider(key, Provider::Shared(ctor))
  }

  /// Registers a construction function that runs on every resolution of
  /// `key`. Its results are never cached.
  pub fn register_factory<T, F>(&mut self, key: &str, ctor: F) -> Result<()>
  where
    T: Any + Send + Sync,
    F: Fn(&mut Resolver) -> Result<T> + Send + Sync + 'static,
  {
    let ctor = Arc::new(move |resolver: &mut Resolver| ctor(resolver).map(|v| Arc::new(v) as Instance));
    self.add_provider(key, Provider::Factory(ctor))
  }

  /// Caches a ready-made instance under `key`.
  pub fn add_instance<T: Any + Send + Sync>(&mut self, key: &str, value: T) -> Result<()> {
    if key.trim().is_empty() {
      return Err(ResolveError::InvalidArgument(
        "an instance needs a non-empty key".to_owned(),
      ));
    }
    debug!(key, "adding instance");
    let instance: Instance = Arc::new(value);
    self.cache(key, &instance);
    Ok(())
  }

  /// Makes `interface` resolve to whatever `target` resolves to.
  ///
  /// `target` must either be known to the resolver already, or be a catalog
  /// type implementing `interface`. In the latter case a type without
  /// parameters is instantiated and cached right away; a type with
  /// parameters has to be registered or made first.
  pub fn bind_interface(&mut self, interface: &str, target: &str) -> Result<()> {
    if interface.trim().is_empty() || interface == target {
      return Err(ResolveError::InvalidArgument(format!(
        "cannot bind interface '{}' to '{}'",
        interface, target
      )));
    }
    let newly_known = self.known.insert(interface.to_owned());
    let outcome = self.bind_target(interface, target);
    if outcome.is_err() && newly_known {
      self.known.remove(interface);
    }
    outcome
  }

  fn bind_target(&mut self, interface: &str, target: &str) -> Result<()> {
    if self.known.contains(target) {
      debug!(interface, target, "binding interface to known key");
      self.interfaces.insert(interface.to_owned(), target.to_owned());
      return Ok(());
    }

    let blueprint = match self.catalog.get(target) {
      Some(blueprint) if self.catalog.implements(target, interface) => blueprint,
      _ => {
        return Err(ResolveError::InvalidArgument(format!(
          "expected a registered key or a type implementing the interface, given type: {}, interface: {}",
          target, interface
        )))
      }
    };
    if blueprint.arity() > 0 {
      return Err(ResolveError::PreconditionFailed(format!(
        "the constructor of '{}' has parameters; register or make it before binding '{}'",
        target, interface
      )));
    }

    let instance = blueprint.instantiate(&Args::empty(target))?;
    debug!(interface, target, "binding interface to eagerly built type");
    self.cache(target, &instance);
    self.interfaces.insert(interface.to_owned(), target.to_owned());
    Ok(())
  }

  /// Sets a named parameter, replacing any earlier value.
  pub fn set_param(&mut self, name: &str, value: impl Into<Value>) {
    self.params.insert(name.to_owned(), value.into());
  }

  // --- RESOLUTION ---

  /// Resolves `type_name`, building it on first use and sharing it after.
  ///
  /// Explicit `args` fill the constructor parameters that are neither
  /// dependencies nor named parameters, left to right. Each distinct argument
  /// list is cached separately.
  pub fn make(&mut self, type_name: &str, args: &[Value]) -> Result<Instance> {
    let key = derive_key(type_name, args);
    self.last_args = args.to_vec();
    self.guarded(&key, |this| this.make_keyed(type_name, &key, args))
  }

  fn make_keyed(&mut self, type_name: &str, key: &str, args: &[Value]) -> Result<Instance> {
    if self.known.contains(key) {
      return self.lookup(key);
    }

    // A factory that reads `args()` itself, for a name with no blueprint.
    if !self.catalog.contains(type_name) {
      if let Some(Provider::Factory(ctor)) = self.providers.get(type_name).cloned() {
        trace!(type_name, key, "invoking factory with explicit arguments");
        return ctor(self);
      }
    }

    let instance = self.autowire(type_name, args)?;
    self.cache(key, &instance);
    Ok(instance)
  }

  /// Resolves `type_name` without sharing.
  ///
  /// A factory runs as usual. An instance already cached for the same
  /// arguments is copied (a shallow copy; see
  /// [`TypeCatalog::allow_copy`]). Anything else is autowired and returned
  /// without being cached.
  pub fn make_new(&mut self, type_name: &str, args: &[Value]) -> Result<Instance> {
    self.last_args = args.to_vec();

    if let Some(Provider::Factory(ctor)) = self.providers.get(type_name).cloned() {
      return self.guarded(type_name, |this| ctor(this));
    }

    let key = derive_key(type_name, args);
    if let Some(cached) = self.instances.get(&key) {
      trace!(key = %key, "copying cached instance");
      return self
        .catalog
        .copy(cached)
        .ok_or_else(|| ResolveError::NotCopyable(key.clone()));
    }

    self.guarded(&key, |this| this.autowire(type_name, args))
  }

  /// [`make`](Resolver::make), downcast to `T`.
  pub fn make_as<T: Any + Send + Sync>(&mut self, type_name: &str, args: &[Value]) -> Result<Arc<T>> {
    let instance = self.make(type_name, args)?;
    Self::downcast(instance, type_name)
  }

  /// [`make_new`](Resolver::make_new), downcast to `T`.
  pub fn make_new_as<T: Any + Send + Sync>(
    &mut self,
    type_name: &str,
    args: &[Value],
  ) -> Result<Arc<T>> {
    let instance = self.make_new(type_name, args)?;
    Self::downcast(instance, type_name)
  }

  /// Returns the named parameter `name`.
  pub fn param(&self, name: &str) -> Result<Value> {
    self
      .params
      .get(name)
      .cloned()
      .ok_or_else(|| ResolveError::NotFound(name.to_owned()))
  }

  /// The explicit arguments of the most recent `make` or `make_new` call.
  ///
  /// This is a single slot overwritten by every call, nested ones included;
  /// a construction function should read it before resolving anything else.
  pub fn args(&self) -> &[Value] {
    &self.last_args
  }

  pub fn has_param(&self, name: &str) -> bool {
    self.params.contains_key(name)
  }

  /// Whether `key` is registered, bound, or has been resolved before.
  pub fn is_known(&self, key: &str) -> bool {
    self.known.contains(key)
  }

  pub fn is_cached(&self, key: &str) -> bool {
    self.instances.contains_key(key)
  }

  // --- LOOKUP & AUTOWIRING ---

  /// Resolves a known key: factory, then cache, then interface binding,
  /// then the first run of a shared construction function.
  fn lookup(&mut self, key: &str) -> Result<Instance> {
    if !self.known.contains(key) {
      return Err(ResolveError::NotRegistered(key.to_owned()));
    }

    let provider = self.providers.get(key).cloned();
    if let Some(Provider::Factory(ctor)) = &provider {
      trace!(key, "invoking factory");
      return ctor(self);
    }

    if let Some(instance) = self.instances.get(key) {
      trace!(key, "cache hit");
      return Ok(instance.clone());
    }

    if let Some(target) = self.interfaces.get(key).cloned() {
      trace!(interface = key, target = %target, "following interface binding");
      return self.guarded(&target, |this| this.lookup(&target));
    }

    match provider {
      Some(Provider::Shared(ctor)) => {
        trace!(key, "invoking construction function");
        let instance = ctor(&mut *self)?;
        self.instances.insert(key.to_owned(), instance.clone());
        Ok(instance)
      }
      _ => Err(ResolveError::NotRegistered(key.to_owned())),
    }
  }

  /// Builds `type_name` from its blueprint. The caller decides whether the
  /// result is cached, except for parameterless types, which are always
  /// cached under their bare name.
  fn autowire(&mut self, type_name: &str, args: &[Value]) -> Result<Instance> {
    let blueprint = self
      .catalog
      .get(type_name)
      .ok_or_else(|| ResolveError::UnknownType(type_name.to_owned()))?;

    if blueprint.arity() == 0 {
      let instance = blueprint.instantiate(&Args::empty(type_name))?;
      debug!(type_name, "autowired parameterless type");
      self.cache(type_name, &instance);
      return Ok(instance);
    }

    let plan = SlotPlan::classify(
      &blueprint,
      |dependency| self.known.contains(dependency) || self.catalog.contains(dependency),
      &self.params,
    )?;
    trace!(type_name, depth = self.stack.depth(), plan = ?plan, "classified constructor parameters");

    let mut resolved = Vec::new();
    for dependency in plan.dependencies() {
      resolved.push(self.make(&dependency, &[])?);
    }

    let assembled = plan.assemble(resolved, args)?;
    let instance = blueprint.instantiate(&assembled)?;
    debug!(type_name, arity = blueprint.arity(), "autowired type");
    Ok(instance)
  }
}

/// Keeps a key on the resolution stack of a resolver until dropped.
///
/// Dropping restores the depth recorded on entry, so a construction function
/// that panics does not leave its key behind to be reported as a cycle later.
struct ResolutionGuard<'a> {
  resolver: &'a mut Resolver,
  depth: usize,
}

impl<'a> ResolutionGuard<'a> {
  fn enter(resolver: &'a mut Resolver, key: &str) -> Result<Self> {
    let depth = resolver.stack.depth();
    let ResolverConfig {
      max_depth,
      detect_cycles,
    } = resolver.config;
    resolver.stack.enter(key, detect_cycles, max_depth)?;
    Ok(Self { resolver, depth })
  }
}

impl Deref for ResolutionGuard<'_> {
  type Target = Resolver;

  fn deref(&self) -> &Resolver {
    &*self.resolver
  }
}

impl DerefMut for ResolutionGuard<'_> {
  fn deref_mut(&mut self) -> &mut Resolver {
    &mut *self.resolver
  }
}

impl Drop for ResolutionGuard<'_> {
  fn drop(&mut self) {
    self.resolver.stack.truncate(self.depth);
  }
}

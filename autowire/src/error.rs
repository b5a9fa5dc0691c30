use thiserror::Error;

/// Every way a registration or resolution can fail.
///
/// Errors raised deep inside a nested resolution reach the original caller
/// unchanged, so the variant and its message always name the dependency that
/// actually failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// A registration call received an unusable argument, or `bind_interface`
  /// was pointed at something that is neither a known key nor a type
  /// implementing the interface.
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  /// `bind_interface` targeted a type whose constructor takes parameters
  /// without the target being registered or instantiated first.
  #[error("Precondition failed: {0}")]
  PreconditionFailed(String),

  /// A type-hinted constructor parameter names a type that is neither known
  /// to the resolver nor defined in the catalog.
  #[error("Invalid parameter '{param}' of '{type_name}'. The type '{dependency}' may not exist")]
  InvalidDependency {
    type_name: String,
    param: String,
    dependency: String,
  },

  /// The assembled argument list does not fit the constructor.
  #[error("Arguments for '{type_name}' do not match its constructor. Required: {required}, given: {given}")]
  ArityMismatch {
    type_name: String,
    required: usize,
    given: usize,
  },

  /// The lookup procedure reached a key that was never registered.
  #[error("Key '{0}' is not registered")]
  NotRegistered(String),

  /// `param` was asked for a name that was never set.
  #[error("Parameter '{0}' not found. Register it first via set_param")]
  NotFound(String),

  /// Autowiring was requested for a type the catalog does not define.
  #[error("Type '{0}' is not defined in the type catalog")]
  UnknownType(String),

  /// A key was requested again while it was still being resolved.
  #[error("Circular dependency detected: {}", .chain.join(" -> "))]
  CycleDetected { chain: Vec<String> },

  /// The resolution stack grew past the configured limit.
  #[error("Resolution depth limit of {limit} exceeded while resolving '{key}'")]
  DepthExceeded { key: String, limit: usize },

  /// `make_new` found a cached instance whose type cannot be copied.
  #[error("Cached instance under '{0}' cannot be copied; its type declares no copy capability")]
  NotCopyable(String),

  /// A typed resolution resolved to an instance of a different type.
  #[error("Instance resolved for '{key}' is not a `{expected}`")]
  TypeMismatch { key: String, expected: &'static str },

  /// A constructor read an argument of the wrong kind, or one that is missing.
  #[error("Argument {position} of '{type_name}': {reason}")]
  BadArgument {
    type_name: String,
    position: usize,
    reason: String,
  },

  /// A construction function reported its own failure.
  #[error("Construction of '{type_name}' failed: {reason}")]
  Construction { type_name: String, reason: String },
}

impl ResolveError {
  /// Convenience for construction functions that need to fail with a message.
  pub fn construction(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
    ResolveError::Construction {
      type_name: type_name.into(),
      reason: reason.into(),
    }
  }
}

/// A specialized `Result` type for resolver operations.
pub type Result<T, E = ResolveError> = std::result::Result<T, E>;

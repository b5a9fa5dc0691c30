//! Declared constructors: what the resolver knows about a constructible type.

use crate::args::{Args, Instance};
use crate::catalog::{copier_for, Copier};
use crate::error::Result;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

pub(crate) type BuildFn = Arc<dyn Fn(&Args) -> Result<Instance> + Send + Sync>;

/// A single declared constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
  name: String,
  dependency: Option<String>,
}

impl Param {
  pub fn name(&self) -> &str {
    &self.name
  }

  /// The type this parameter is hinted with, if any.
  pub fn dependency(&self) -> Option<&str> {
    self.dependency.as_deref()
  }
}

/// The constructor descriptor of one type.
///
/// Parameters are declared in constructor order. A blueprint with no
/// parameters is instantiated without arguments.
///
/// # Examples
///
/// ```
/// use fibre_autowire::Blueprint;
/// use std::sync::Arc;
///
/// struct Mailer;
/// struct Signup {
///   mailer: Arc<Mailer>,
///   sender: String,
/// }
///
/// let signup = Blueprint::new("Signup", |args| {
///   Ok(Signup {
///     mailer: args.instance::<Mailer>(0)?,
///     sender: args.get(1)?,
///   })
/// })
/// .dependency("mailer", "Mailer")
/// .param("sender");
///
/// assert_eq!(signup.arity(), 2);
/// ```
#[derive(Clone)]
pub struct Blueprint {
  name: String,
  params: Vec<Param>,
  interfaces: Vec<String>,
  build: BuildFn,
  copier: Option<(TypeId, Copier)>,
}

impl Blueprint {
  /// Declares a type whose instances are produced by `build`.
  pub fn new<T, F>(name: impl Into<String>, build: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
  {
    Self {
      name: name.into(),
      params: Vec::new(),
      interfaces: Vec::new(),
      build: Arc::new(move |args: &Args| build(args).map(|value| Arc::new(value) as Instance)),
      copier: None,
    }
  }

  /// Like [`Blueprint::new`], and also lets `make_new` hand out shallow
  /// copies of cached instances of `T`.
  pub fn cloneable<T, F>(name: impl Into<String>, build: F) -> Self
  where
    T: Any + Clone + Send + Sync,
    F: Fn(&Args) -> Result<T> + Send + Sync + 'static,
  {
    let mut blueprint = Self::new(name, build);
    blueprint.copier = Some((TypeId::of::<T>(), copier_for::<T>()));
    blueprint
  }

  /// Appends an untyped parameter, filled from a named parameter or the
  /// caller's arguments.
  pub fn param(mut self, name: impl Into<String>) -> Self {
    self.params.push(Param {
      name: name.into(),
      dependency: None,
    });
    self
  }

  /// Appends a parameter resolved by type.
  pub fn dependency(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
    self.params.push(Param {
      name: name.into(),
      dependency: Some(type_name.into()),
    });
    self
  }

  /// Declares that the type implements `interface`.
  pub fn implements(mut self, interface: impl Into<String>) -> Self {
    self.interfaces.push(interface.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn params(&self) -> &[Param] {
    &self.params
  }

  pub fn arity(&self) -> usize {
    self.params.len()
  }

  pub fn implements_interface(&self, interface: &str) -> bool {
    self.interfaces.iter().any(|i| i == interface)
  }

  pub(crate) fn copier(&self) -> Option<&(TypeId, Copier)> {
    self.copier.as_ref()
  }

  /// Runs the build function with a fully assembled argument list.
  pub fn instantiate(&self, args: &Args) -> Result<Instance> {
    (self.build)(args)
  }
}

impl fmt::Debug for Blueprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Blueprint")
      .field("name", &self.name)
      .field("params", &self.params)
      .field("interfaces", &self.interfaces)
      .field("cloneable", &self.copier.is_some())
      .finish_non_exhaustive()
  }
}

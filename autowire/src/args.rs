//! Values flowing into constructors.

use crate::error::{ResolveError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A constructed object as held by the resolver.
///
/// Shared instances are handed out as clones of this `Arc`, so reference
/// equality (`Arc::ptr_eq`) is the identity the resolver guarantees for
/// cached keys.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// One slot of a constructor's final argument list.
#[derive(Clone)]
pub enum Arg {
  /// A scalar from the caller or from a named parameter.
  Value(Value),
  /// A resolved dependency.
  Instance(Instance),
}

impl fmt::Debug for Arg {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Arg::Value(v) => write!(f, "Value({})", v),
      Arg::Instance(_) => write!(f, "Instance(..)"),
    }
  }
}

/// The ordered argument list a blueprint's build function receives.
///
/// Positions match the declared parameter order of the blueprint.
#[derive(Debug, Clone)]
pub struct Args {
  type_name: String,
  slots: Vec<Arg>,
}

impl Args {
  pub(crate) fn new(type_name: &str, slots: Vec<Arg>) -> Self {
    Self {
      type_name: type_name.to_owned(),
      slots,
    }
  }

  pub(crate) fn empty(type_name: &str) -> Self {
    Self::new(type_name, Vec::new())
  }

  /// Name of the type being constructed.
  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }

  pub fn arg(&self, position: usize) -> Option<&Arg> {
    self.slots.get(position)
  }

  /// Returns the dependency at `position`, downcast to `T`.
  pub fn instance<T: Any + Send + Sync>(&self, position: usize) -> Result<Arc<T>> {
    match self.slot(position)? {
      Arg::Instance(instance) => instance
        .clone()
        .downcast::<T>()
        .map_err(|_| self.bad(position, format!("expected an instance of `{}`", type_name::<T>()))),
      Arg::Value(_) => Err(self.bad(position, "expected an instance, found a value")),
    }
  }

  /// Returns the raw scalar at `position`.
  pub fn value(&self, position: usize) -> Result<&Value> {
    match self.slot(position)? {
      Arg::Value(value) => Ok(value),
      Arg::Instance(_) => Err(self.bad(position, "expected a value, found an instance")),
    }
  }

  /// Deserializes the scalar at `position` into `T`.
  pub fn get<T: DeserializeOwned>(&self, position: usize) -> Result<T> {
    let value = self.value(position)?;
    T::deserialize(value).map_err(|e| self.bad(position, e.to_string()))
  }

  /// Returns the scalar at `position` as a string slice.
  pub fn str(&self, position: usize) -> Result<&str> {
    self
      .value(position)?
      .as_str()
      .ok_or_else(|| self.bad(position, "expected a string"))
  }

  fn slot(&self, position: usize) -> Result<&Arg> {
    self.slots.get(position).ok_or_else(|| {
      self.bad(
        position,
        format!("missing, only {} argument(s) were supplied", self.slots.len()),
      )
    })
  }

  fn bad(&self, position: usize, reason: impl Into<String>) -> ResolveError {
    ResolveError::BadArgument {
      type_name: self.type_name.clone(),
      position,
      reason: reason.into(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[derive(Debug)]
  struct Engine;

  fn sample() -> Args {
    Args::new(
      "Car",
      vec![
        Arg::Instance(Arc::new(Engine)),
        Arg::Value(json!("red")),
        Arg::Value(json!(4)),
      ],
    )
  }

  #[test]
  fn typed_accessors_read_their_slots() {
    let args = sample();
    assert_eq!(args.len(), 3);
    assert!(args.instance::<Engine>(0).is_ok());
    assert_eq!(args.str(1).unwrap(), "red");
    assert_eq!(args.get::<u8>(2).unwrap(), 4);
  }

  #[test]
  fn wrong_kind_reports_position() {
    let args = sample();
    let err = args.value(0).unwrap_err();
    assert!(matches!(err, ResolveError::BadArgument { position: 0, .. }));

    let err = args.instance::<String>(0).unwrap_err();
    assert!(err.to_string().contains("alloc::string::String"));

    let err = args.str(2).unwrap_err();
    assert!(matches!(err, ResolveError::BadArgument { position: 2, .. }));
  }

  #[test]
  fn missing_position_is_an_error() {
    let err = sample().value(7).unwrap_err();
    assert_eq!(
      err,
      ResolveError::BadArgument {
        type_name: "Car".into(),
        position: 7,
        reason: "missing, only 3 argument(s) were supplied".into(),
      }
    );
  }
}

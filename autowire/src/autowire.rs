//! Constructor parameter classification and argument assembly.
//!
//! Every declared parameter becomes one slot of a [`SlotPlan`]: a dependency
//! resolved by type, a named parameter filled by name, or a caller slot
//! consuming the explicit arguments left to right. Computed values therefore
//! always land at their declared position, however many caller arguments
//! surround them.

use crate::args::{Arg, Args, Instance};
use crate::blueprint::Blueprint;
use crate::error::{ResolveError, Result};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
  Dependency(String),
  Named(Value),
  Caller(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SlotPlan {
  type_name: String,
  slots: Vec<Slot>,
  caller_slots: usize,
}

impl SlotPlan {
  /// Classifies every parameter of `blueprint` before anything is built.
  ///
  /// `is_resolvable` decides whether a hinted type can be produced; a hint it
  /// rejects fails the whole plan.
  pub(crate) fn classify(
    blueprint: &Blueprint,
    is_resolvable: impl Fn(&str) -> bool,
    named: &HashMap<String, Value>,
  ) -> Result<Self> {
    let mut slots = Vec::with_capacity(blueprint.arity());
    let mut caller_slots = 0;

    for param in blueprint.params() {
      let slot = match param.dependency() {
        Some(dependency) if is_resolvable(dependency) => Slot::Dependency(dependency.to_owned()),
        Some(dependency) => {
          return Err(ResolveError::InvalidDependency {
            type_name: blueprint.name().to_owned(),
            param: param.name().to_owned(),
            dependency: dependency.to_owned(),
          })
        }
        None => match named.get(param.name()) {
          Some(value) => Slot::Named(value.clone()),
          None => {
            caller_slots += 1;
            Slot::Caller(caller_slots - 1)
          }
        },
      };
      slots.push(slot);
    }

    Ok(Self {
      type_name: blueprint.name().to_owned(),
      slots,
      caller_slots,
    })
  }

  /// Hinted types, in declared order.
  pub(crate) fn dependencies(&self) -> Vec<String> {
    self
      .slots
      .iter()
      .filter_map(|slot| match slot {
        Slot::Dependency(type_name) => Some(type_name.clone()),
        _ => None,
      })
      .collect()
  }

  /// Fills the plan with resolved dependencies and the caller's arguments.
  ///
  /// `resolved` must follow the order of [`SlotPlan::dependencies`].
  pub(crate) fn assemble(self, resolved: Vec<Instance>, caller: &[Value]) -> Result<Args> {
    let required = self.slots.len();
    let computed = required - self.caller_slots;
    let given = computed + caller.len();
    let mismatch = |given| ResolveError::ArityMismatch {
      type_name: self.type_name.clone(),
      required,
      given,
    };
    if given != required {
      return Err(mismatch(given));
    }

    let mut resolved = resolved.into_iter();
    let slots = self
      .slots
      .iter()
      .map(|slot| match slot {
        Slot::Dependency(_) => resolved.next().map(Arg::Instance),
        Slot::Named(value) => Some(Arg::Value(value.clone())),
        Slot::Caller(index) => caller.get(*index).cloned().map(Arg::Value),
      })
      .collect::<Option<Vec<_>>>()
      .ok_or_else(|| mismatch(given))?;

    Ok(Args::new(&self.type_name, slots))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::sync::Arc;

  struct Dep;

  fn long() -> Blueprint {
    Blueprint::new("Long", |_| Ok(()))
      .dependency("b", "B")
      .param("message")
      .dependency("myclass", "MyInterface")
      .param("user")
  }

  #[test]
  fn classifies_each_parameter_in_order() {
    let mut named = HashMap::new();
    named.insert("user".to_owned(), json!("admin"));

    let plan = SlotPlan::classify(&long(), |_| true, &named).unwrap();
    assert_eq!(
      plan.slots,
      vec![
        Slot::Dependency("B".into()),
        Slot::Caller(0),
        Slot::Dependency("MyInterface".into()),
        Slot::Named(json!("admin")),
      ]
    );
    assert_eq!(plan.dependencies(), ["B", "MyInterface"]);
  }

  #[test]
  fn unresolvable_hint_fails_classification() {
    let err = SlotPlan::classify(&long(), |t| t == "B", &HashMap::new()).unwrap_err();
    assert_eq!(
      err,
      ResolveError::InvalidDependency {
        type_name: "Long".into(),
        param: "myclass".into(),
        dependency: "MyInterface".into(),
      }
    );
  }

  #[test]
  fn computed_values_keep_their_declared_positions() {
    let plan = SlotPlan::classify(&long(), |_| true, &HashMap::new()).unwrap();
    let b: Instance = Arc::new(Dep);
    let my: Instance = Arc::new(Dep);
    let args = plan
      .assemble(vec![b.clone(), my.clone()], &[json!("hi"), json!("USER")])
      .unwrap();

    assert_eq!(args.len(), 4);
    assert!(Arc::ptr_eq(&args.instance::<Dep>(0).unwrap(), &b.downcast::<Dep>().unwrap()));
    assert_eq!(args.str(1).unwrap(), "hi");
    assert!(Arc::ptr_eq(&args.instance::<Dep>(2).unwrap(), &my.downcast::<Dep>().unwrap()));
    assert_eq!(args.str(3).unwrap(), "USER");
  }

  #[test]
  fn too_few_or_too_many_caller_args_mismatch() {
    let plan = SlotPlan::classify(&long(), |_| true, &HashMap::new()).unwrap();
    let deps = || vec![Arc::new(Dep) as Instance, Arc::new(Dep) as Instance];

    let err = plan.clone().assemble(deps(), &[json!("hi")]).unwrap_err();
    assert_eq!(
      err,
      ResolveError::ArityMismatch {
        type_name: "Long".into(),
        required: 4,
        given: 3,
      }
    );

    let err = plan
      .assemble(deps(), &[json!(1), json!(2), json!(3)])
      .unwrap_err();
    assert!(matches!(err, ResolveError::ArityMismatch { required: 4, given: 5, .. }));
  }
}

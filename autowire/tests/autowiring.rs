mod common;

use common::{resolver, MyClass, NoConstructor, B, C, E};
use fibre_autowire::{json, Blueprint, ResolveError};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn register_e(resolver: &mut fibre_autowire::Resolver) {
  resolver
    .register("E", |_| {
      Ok(E {
        name: "bom".into(),
        boom: "bar".into(),
      })
    })
    .unwrap();
}

#[test]
fn test_instantiate_advanced_type() {
  let mut resolver = resolver();
  register_e(&mut resolver);
  resolver.bind_interface("MyInterface", "MyClass").unwrap();

  let long = resolver
    .make_as::<common::Long>("Long", &[json!("This is a Message"), json!("USER")])
    .unwrap();

  assert_eq!(long.message, "Hiiii This is a Message from USER");
  assert_eq!(long.b.c.e.name, "bom");
  let my = resolver.make_as::<MyClass>("MyClass", &[]).unwrap();
  assert!(Arc::ptr_eq(&long.my, &my));
}

#[test]
fn test_chain_fails_where_scalars_cannot_be_filled() {
  let mut resolver = resolver();

  let err = resolver.make("B", &[]).unwrap_err();

  assert_eq!(
    err,
    ResolveError::ArityMismatch {
      type_name: "E".into(),
      required: 2,
      given: 0,
    }
  );
  assert!(!resolver.is_cached("B"));
  assert!(!resolver.is_cached("C"));
}

#[test]
fn test_named_params_complete_the_chain() {
  let mut resolver = resolver();
  resolver.set_param("name", "Foo");
  resolver.set_param("boom", "Bar");
  // Ignored: `c` is a typed dependency of `B`.
  resolver.set_param("c", "not a C");

  let b = resolver.make_as::<B>("B", &[]).unwrap();

  assert_eq!(b.c.e.name, "Foo");
  assert_eq!(b.c.e.boom, "Bar");
}

#[test]
fn test_dependencies_are_shared_singletons() {
  let mut resolver = resolver();
  resolver.set_param("name", "Foo");
  resolver.set_param("boom", "Bar");

  let b = resolver.make_as::<B>("B", &[]).unwrap();
  let c = resolver.make_as::<C>("C", &[]).unwrap();
  let e = resolver.make_as::<E>("E", &[]).unwrap();

  assert!(Arc::ptr_eq(&b.c, &c));
  assert!(Arc::ptr_eq(&c.e, &e));
}

#[test]
fn test_caller_args_fill_remaining_slots_in_order() {
  let mut resolver = resolver();
  resolver.set_param("name", "Foo");

  let e = resolver.make_as::<E>("E", &[json!("caller")]).unwrap();

  assert_eq!(e.name, "Foo");
  assert_eq!(e.boom, "caller");
}

#[test]
fn test_named_params_are_read_at_resolution_time() {
  let mut resolver = resolver();

  let err = resolver.make("E", &[json!("only one")]).unwrap_err();
  assert!(matches!(err, ResolveError::ArityMismatch { required: 2, given: 1, .. }));

  resolver.set_param("boom", "late");
  let e = resolver.make_as::<E>("E", &[json!("only one")]).unwrap();
  assert_eq!((e.name.as_str(), e.boom.as_str()), ("only one", "late"));
}

#[test]
fn test_too_many_args_is_an_arity_mismatch() {
  let mut resolver = resolver();
  resolver.set_param("name", "Foo");

  let err = resolver
    .make("E", &[json!("a"), json!("b")])
    .unwrap_err();

  assert_eq!(
    err,
    ResolveError::ArityMismatch {
      type_name: "E".into(),
      required: 2,
      given: 3,
    }
  );
}

#[test]
fn test_unknown_dependency_fails_before_instantiation() {
  let mut resolver = resolver();
  resolver.catalog().define(
    Blueprint::new("Broken", |_| Ok(()))
      .dependency("first", "NoConstructor")
      .dependency("second", "Missing"),
  );

  let err = resolver.make("Broken", &[]).unwrap_err();

  assert_eq!(
    err,
    ResolveError::InvalidDependency {
      type_name: "Broken".into(),
      param: "second".into(),
      dependency: "Missing".into(),
    }
  );
  assert!(!resolver.is_cached("NoConstructor"));
}

#[test]
fn test_unknown_type_is_reported() {
  let mut resolver = resolver();

  let err = resolver.make("Nope", &[]).unwrap_err();

  assert_eq!(err, ResolveError::UnknownType("Nope".into()));
  assert!(!resolver.is_known("Nope"));
}

#[test]
fn test_registered_key_satisfies_a_dependency() {
  let mut resolver = resolver();
  resolver.catalog().define(
    Blueprint::new("Report", |args| Ok(args.instance::<String>(0)?))
      .dependency("title", "report.title"),
  );
  resolver.add_instance("report.title", String::from("Quarterly")).unwrap();

  let report = resolver.make_as::<Arc<String>>("Report", &[]).unwrap();

  assert_eq!(report.as_str(), "Quarterly");
}

#[test]
fn test_parameterless_type_with_args_is_cached_under_both_keys() {
  let mut resolver = resolver();

  let with_args = resolver
    .make_as::<NoConstructor>("NoConstructor", &[json!(1)])
    .unwrap();
  let bare = resolver.make_as::<NoConstructor>("NoConstructor", &[]).unwrap();

  assert!(Arc::ptr_eq(&with_args, &bare));
}

#[test]
fn test_build_errors_propagate_unchanged() {
  let mut resolver = resolver();
  resolver
    .register("Flaky", |_| -> fibre_autowire::Result<()> {
      Err(ResolveError::construction("Flaky", "connection refused"))
    })
    .unwrap();
  resolver
    .catalog()
    .define(Blueprint::new("Client", |_| Ok(())).dependency("flaky", "Flaky"));

  let err = resolver.make("Client", &[]).unwrap_err();

  assert_eq!(err, ResolveError::construction("Flaky", "connection refused"));
  assert!(!resolver.is_cached("Flaky"));
}

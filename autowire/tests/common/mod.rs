#![allow(dead_code)]

use fibre_autowire::{Blueprint, Resolver, TypeCatalog};
use std::sync::Arc;

// --- Test Fixtures ---

#[derive(Debug, Clone, PartialEq)]
pub struct NoConstructor;

#[derive(Debug)]
pub struct NeedAnArgument {
  pub a: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
  pub name: String,
}

#[derive(Debug, Default)]
pub struct MyClass;

pub struct Long {
  pub b: Arc<B>,
  pub my: Arc<MyClass>,
  pub message: String,
}

pub struct B {
  pub c: Arc<C>,
}

pub struct C {
  pub e: Arc<E>,
}

#[derive(Debug)]
pub struct E {
  pub name: String,
  pub boom: String,
}

/// A catalog declaring every fixture type.
pub fn catalog() -> Arc<TypeCatalog> {
  let catalog = TypeCatalog::new();

  catalog.define(Blueprint::cloneable("NoConstructor", |_| Ok(NoConstructor)));
  catalog.define(
    Blueprint::new("NeedAnArgument", |args| Ok(NeedAnArgument { a: args.get(0)? })).param("a"),
  );
  catalog.define(Blueprint::cloneable("User", |args| Ok(User { name: args.get(0)? })).param("name"));
  catalog.define(Blueprint::new("MyClass", |_| Ok(MyClass)).implements("MyInterface"));
  catalog.define(
    Blueprint::new("Long", |args| {
      Ok(Long {
        b: args.instance(0)?,
        my: args.instance(1)?,
        message: format!("Hiiii {} from {}", args.str(2)?, args.str(3)?),
      })
    })
    .dependency("b", "B")
    .dependency("myclass", "MyInterface")
    .param("message")
    .param("user"),
  );
  catalog.define(Blueprint::new("B", |args| Ok(B { c: args.instance(0)? })).dependency("c", "C"));
  catalog.define(Blueprint::new("C", |args| Ok(C { e: args.instance(0)? })).dependency("e", "E"));
  catalog.define(
    Blueprint::new("E", |args| {
      Ok(E {
        name: args.get(0)?,
        boom: args.get(1)?,
      })
    })
    .param("name")
    .param("boom"),
  );

  Arc::new(catalog)
}

/// A resolver over a fresh fixture catalog.
pub fn resolver() -> Resolver {
  Resolver::with_catalog(catalog())
}

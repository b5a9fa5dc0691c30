//! Public macros for ergonomic typed resolution.

/// Resolves a typed instance from a resolver, panicking on failure.
///
/// This is the shorthand for call sites where a missing or misconfigured
/// dependency is a programming error. For a non-panicking version, call
/// `make_as` or `make_new_as` directly.
///
/// # Panics
///
/// Panics with the underlying [`ResolveError`](crate::ResolveError) message
/// if the instance cannot be resolved or is not a `$type`.
///
/// # Examples
///
/// ```
/// use fibre_autowire::{resolve, Blueprint, Resolver, TypeCatalog};
/// use std::sync::Arc;
///
/// #[derive(Clone)]
/// struct User {
///   name: String,
/// }
///
/// let catalog = Arc::new(TypeCatalog::new());
/// catalog.define(Blueprint::cloneable("User", |args| Ok(User { name: args.get(0)? })).param("name"));
/// let mut resolver = Resolver::with_catalog(catalog);
///
/// // Shared resolution, with explicit arguments.
/// let foo = resolve!(resolver, User, "User", ["Foo"]);
/// assert_eq!(foo.name, "Foo");
///
/// // A fresh copy of the cached instance.
/// let copy = resolve!(new resolver, User, "User", ["Foo"]);
/// assert!(!Arc::ptr_eq(&foo, &copy));
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for a fresh instance: resolve!(new resolver, Type, "name", [args..])
    (new $resolver:expr, $type:ty, $name:expr $(, [$($arg:expr),* $(,)?])?) => {
        $resolver
            .make_new_as::<$type>($name, &[$($($crate::Value::from($arg)),*)?])
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve a new instance of '{}' as {}: {}",
                    $name,
                    std::any::type_name::<$type>(),
                    err
                )
            })
    };

    // Arm for shared resolution: resolve!(resolver, Type, "name", [args..])
    ($resolver:expr, $type:ty, $name:expr $(, [$($arg:expr),* $(,)?])?) => {
        $resolver
            .make_as::<$type>($name, &[$($($crate::Value::from($arg)),*)?])
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required service '{}' as {}: {}",
                    $name,
                    std::any::type_name::<$type>(),
                    err
                )
            })
    };
}

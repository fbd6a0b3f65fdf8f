//! See [`Reflect`](derive_reflect).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits:
///
/// - `Typed`: the cached descriptor.
/// - `Reflect`: the runtime view used by the serializer.
/// - `FromRepr`: construction by the deserializer.
/// - `Class` (for `struct T { ... }`) or `Union` (for `enum T { ... }`).
///
/// The shape decides the representation:
///
/// | shape | representation |
/// |---|---|
/// | `struct T { a: A, b: B }` | mapping, one key per field |
/// | `struct T(A);` | the same as `A` |
/// | `struct T(A, B);` | sequence of two items |
/// | `struct T;` | null |
/// | `enum T { ... }` | tagged variant, see below |
///
/// Lifetime parameters are not supported. Type parameters get the bounds
/// `Typed + Reflect + FromRepr`, and every instantiation has its own
/// descriptor.
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(rename_all = "camelCase", deny_unknown_fields, auto_register)]
/// struct Server {
///     host_name: String,
/// }
/// ```
///
/// - `rename_all = "..."`: case conversion of field names (structs) or
///   variant tags (enums). One of `lowercase`, `UPPERCASE`, `PascalCase`,
///   `camelCase`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`,
///   `SCREAMING-KEBAB-CASE`.
/// - `deny_unknown_fields`: keys no field claims fail deserialization.
///   Named structs only.
/// - `auto_register`: submit the type to `TypeRegistry::auto_register`.
///   Ignored for generic types.
///
/// ## Enum tagging
///
/// ```rust, ignore
/// #[derive(Reflect)]
/// #[reflect(tag = "kind")]
/// enum Shape {
///     Circle { r: f64 },
///     #[reflect(rename = "rect", alias = "rectangle")]
///     Rect { w: f64, h: f64 },
/// }
/// ```
///
/// - nothing: internal tag under the key `"type"`.
/// - `tag = "..."`: internal tag under the given key.
/// - `tag = "...", content = "..."`: adjacent tag and payload.
/// - `external`: a single-key mapping from the tag to the payload.
/// - `untagged`: the payload alone.
///
/// Variants accept `rename` (the tag) and `alias` (extra tags accepted on
/// input).
///
/// ## Field attributes
///
/// Only on named fields, of structs and of struct variants.
///
/// - `rename = "..."`: the key in the representation.
/// - `alias = "..."`: an extra key accepted on input. Repeatable.
/// - `default` / `default = path`: used when the key is absent, from
///   `Default::default` or from `fn() -> T`.
/// - `skip`: never written, always defaulted. The field still needs
///   `Reflect` and a default.
/// - `skip_if_default`: elided when equal to `Default::default()`, which
///   is also its default on input.
/// - `skip_if = path`: elided when `fn(&T) -> bool` holds.
/// - `serialize_with = path`: `fn(&T) -> Result<Value>` replaces the
///   generic serializer. Its output is emitted unchecked.
/// - `deserialize_with = path`: `fn(&Value) -> Result<T>` replaces the
///   generic deserializer.
/// - `base`: the field is a base class. Its fields come first in the
///   representation; an own field with the same name replaces the
///   inherited one. Named structs only, and exclusive with the other field
///   attributes.
///
/// Paths may also be written as strings: `default = "Self::port"`.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    impls::match_reflect_impls(ast)
}

//! Procedural macros for `overlay_config`.
//!
//! `#[derive(Overlay)]` turns the `#[overlay(...)]` annotations on a struct's
//! fields into a static descriptor table and a `walk` method, so the runtime
//! never has to inspect types.
//!
//! Field attributes:
//!
//! - `env = "KEY"`: environment variable overriding the field;
//! - `default = "literal"`: value used while the field is still zero;
//!   integer, float and boolean literals are accepted as well;
//! - `nested`: the field is another schema, an `Option`/`Box` of one, or a
//!   `BTreeMap`/`HashMap` whose values are schemas;
//! - `skip`: the walker never touches the field.
//!
//! The struct attribute `#[overlay(crate = "path")]` points the generated
//! code at a renamed `overlay_config` dependency.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `overlay_config::Overlay`.
#[proc_macro_derive(Overlay, attributes(overlay))]
pub fn derive_overlay(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

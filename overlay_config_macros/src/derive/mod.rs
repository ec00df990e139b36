//! Expansion pipeline for `#[derive(Overlay)]`: parse, then generate.

mod crate_path;
mod generate;
mod parse;

use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Expand the derive for `input`, failing fast on invalid annotations.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let schema = parse::parse_input(input)?;
    let krate = crate_path::resolve(schema.attrs.crate_path.as_ref());
    Ok(generate::generate_overlay_impl(&schema, &krate))
}

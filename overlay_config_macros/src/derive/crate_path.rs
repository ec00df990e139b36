//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[overlay(crate = "...")]` attribute value into the
//! tokens generated code uses in place of `overlay_config::`.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path, defaulting to `overlay_config`.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { overlay_config }, |path| quote! { #path })
}

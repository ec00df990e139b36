//! Parsing utilities for the `Overlay` derive macro.

use syn::{Attribute, Token, parenthesized};

mod input;
mod literals;
mod serde_attrs;
#[cfg(test)]
mod tests;
mod type_utils;

pub(crate) use input::{SchemaField, SchemaInput, parse_input};
use literals::{lit_default, lit_str};
pub(crate) use serde_attrs::{serde_field_key, serde_rename_all};
pub(crate) use type_utils::{is_map, map_value, mentions_param, option_inner};

/// Struct-level `#[overlay(...)]` attributes.
#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(Overlay)]`.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub env: Option<String>,
    pub default: Option<String>,
    pub nested: bool,
    pub skip: bool,
}

/// Iterate all `#[overlay(...)]` attributes once and apply a callback.
fn parse_overlay<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&syn::meta::ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("overlay")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn unknown_key(meta: &syn::meta::ParseNestedMeta, expected: &str) -> syn::Error {
    let name = meta
        .path
        .get_ident()
        .map_or_else(|| String::from("<path>"), ToString::to_string);
    meta.error(format!("unknown overlay attribute '{name}'; expected {expected}"))
}

/// Extracts `#[overlay(...)]` metadata applied to a struct.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_overlay(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            out.crate_path = Some(path);
            return Ok(());
        }
        Err(unknown_key(meta, "`crate`"))
    })?;
    Ok(out)
}

/// Applies a recognised field attribute, returning `true` if handled.
fn apply_field_attr(meta: &syn::meta::ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<bool> {
    let Some(ident) = meta.path.get_ident() else {
        return Ok(false);
    };
    match ident.to_string().as_str() {
        "env" => {
            let s = lit_str(meta, "env")?;
            if s.value().is_empty() {
                return Err(syn::Error::new(s.span(), "env must not be empty"));
            }
            out.env = Some(s.value());
            Ok(true)
        }
        "default" => {
            out.default = Some(lit_default(meta)?);
            Ok(true)
        }
        "nested" => {
            out.nested = true;
            Ok(true)
        }
        "skip" => {
            out.skip = true;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Parses field-level `#[overlay(...)]` attributes.
///
/// Unlike serde, unknown keys are rejected: a misspelt `env` would otherwise
/// silently disable an override.
pub(crate) fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_overlay(&field.attrs, |meta| {
        if apply_field_attr(meta, &mut out)? {
            return Ok(());
        }
        discard_unknown(meta)?;
        Err(unknown_key(meta, "`env`, `default`, `nested` or `skip`"))
    })?;
    validate_field_attrs(field, &out)?;
    Ok(out)
}

fn validate_field_attrs(field: &syn::Field, attrs: &FieldAttrs) -> syn::Result<()> {
    let has_scalar_attrs = attrs.env.is_some() || attrs.default.is_some();
    if attrs.skip && (attrs.nested || has_scalar_attrs) {
        return Err(syn::Error::new_spanned(
            field,
            "`skip` cannot be combined with other overlay attributes",
        ));
    }
    if attrs.nested && has_scalar_attrs {
        return Err(syn::Error::new_spanned(
            field,
            "`nested` fields are walked recursively and cannot take `env` or `default`",
        ));
    }
    Ok(())
}

//! Input parsing for the `Overlay` derive macro.
//!
//! Gathers the struct identifier, generics, fields and attribute metadata in
//! one pass so expansion can fail fast with useful errors.

use syn::{Data, DeriveInput, Fields};

use super::{
    FieldAttrs, StructAttrs, parse_field_attrs, parse_struct_attrs, serde_field_key,
    serde_rename_all,
};

/// One named field together with its parsed annotations.
pub(crate) struct SchemaField {
    pub ident: syn::Ident,
    pub ty: syn::Type,
    /// Field name without any raw-identifier prefix.
    pub name: String,
    /// Document key, after serde renames.
    pub key: String,
    pub attrs: FieldAttrs,
}

/// Everything the generator needs from the derive input.
pub(crate) struct SchemaInput {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub attrs: StructAttrs,
    pub fields: Vec<SchemaField>,
}

/// Gathers information from the user-provided struct.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<SchemaInput> {
    let attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return Ok(SchemaInput {
                    ident: input.ident.clone(),
                    generics: input.generics.clone(),
                    attrs,
                    fields: Vec::new(),
                });
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Overlay requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Overlay can only be derived for structs",
            ));
        }
    };

    let rename_all = serde_rename_all(&input.attrs)?;
    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Overlay requires named fields"));
        };
        let raw = ident.to_string();
        fields.push(SchemaField {
            name: raw.strip_prefix("r#").unwrap_or(&raw).to_owned(),
            key: serde_field_key(field, rename_all)?,
            attrs: parse_field_attrs(field)?,
            ty: field.ty.clone(),
            ident,
        });
    }
    Ok(SchemaInput {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        attrs,
        fields,
    })
}

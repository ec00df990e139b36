//! Code generation for `#[derive(Overlay)]`.
//!
//! Every field yields a `FieldDescriptor` literal. Scalar, nested and map
//! fields additionally yield one walker call in `walk`, in declaration order.

use proc_macro2::TokenStream;
use quote::quote;

use syn::{Generics, Ident, Type, parse_quote};

use crate::derive::parse::{
    SchemaField, SchemaInput, is_map, map_value, mentions_param, option_inner,
};

/// Walker classification of a field, decided from its annotations and type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Scalar,
    Nested,
    Map,
    OptionalMap,
    Passthrough,
}

impl Step {
    fn of(field: &SchemaField) -> Self {
        if field.attrs.skip {
            return Self::Passthrough;
        }
        if field.attrs.nested {
            if is_map(&field.ty) {
                return Self::Map;
            }
            if option_inner(&field.ty).is_some_and(is_map) {
                return Self::OptionalMap;
            }
            return Self::Nested;
        }
        if field.attrs.env.is_some() || field.attrs.default.is_some() {
            return Self::Scalar;
        }
        Self::Passthrough
    }

    fn kind(self, krate: &TokenStream) -> TokenStream {
        match self {
            Self::Scalar => quote! { #krate::FieldKind::Scalar },
            Self::Nested => quote! { #krate::FieldKind::Nested },
            Self::Map | Self::OptionalMap => quote! { #krate::FieldKind::Map },
            Self::Passthrough => quote! { #krate::FieldKind::Passthrough },
        }
    }
}

fn optional_str(value: Option<&String>) -> TokenStream {
    value.map_or_else(
        || quote! { ::core::option::Option::None },
        |text| quote! { ::core::option::Option::Some(#text) },
    )
}

fn descriptor(field: &SchemaField, step: Step, krate: &TokenStream) -> TokenStream {
    let name = &field.name;
    let key = &field.key;
    let kind = step.kind(krate);
    let env = optional_str(field.attrs.env.as_ref());
    let default = optional_str(field.attrs.default.as_ref());
    quote! {
        #krate::FieldDescriptor {
            name: #name,
            key: #key,
            kind: #kind,
            env: #env,
            default: #default,
        }
    }
}

fn walk_step(field: &SchemaField, step: Step, descriptor: &TokenStream) -> Option<TokenStream> {
    let ident = &field.ident;
    let name = &field.name;
    match step {
        Step::Scalar => Some(quote! {
            walker.scalar(&mut self.#ident, #descriptor);
        }),
        Step::Nested => Some(quote! {
            walker.nested(#name, &mut self.#ident);
        }),
        Step::Map => Some(quote! {
            walker.map(#name, self.#ident.iter_mut());
        }),
        Step::OptionalMap => Some(quote! {
            if let ::core::option::Option::Some(entries) = self.#ident.as_mut() {
                walker.map(#name, entries.iter_mut());
            }
        }),
        Step::Passthrough => None,
    }
}

/// The type that must satisfy the walker's trait bound for `step`, with that
/// trait.
fn bounded_type<'f>(
    field: &'f SchemaField,
    step: Step,
    krate: &TokenStream,
) -> Option<(&'f Type, TokenStream)> {
    match step {
        Step::Scalar => Some((&field.ty, quote! { #krate::Scalar })),
        Step::Nested => Some((&field.ty, quote! { #krate::Overlay })),
        Step::Map => map_value(&field.ty).map(|value| (value, quote! { #krate::Overlay })),
        Step::OptionalMap => option_inner(&field.ty)
            .and_then(map_value)
            .map(|value| (value, quote! { #krate::Overlay })),
        Step::Passthrough => None,
    }
}

/// Copies the schema's generics, adding a bound for every walked field whose
/// type mentions a type parameter.
fn bounded_generics(schema: &SchemaInput, krate: &TokenStream) -> Generics {
    let mut generics = schema.generics.clone();
    let params: Vec<&Ident> = schema
        .generics
        .type_params()
        .map(|param| &param.ident)
        .collect();
    if params.is_empty() {
        return generics;
    }
    let predicates: Vec<syn::WherePredicate> = schema
        .fields
        .iter()
        .filter_map(|field| bounded_type(field, Step::of(field), krate))
        .filter(|(ty, _)| mentions_param(ty, &params))
        .map(|(ty, bound)| parse_quote! { #ty: #bound })
        .collect();
    generics.make_where_clause().predicates.extend(predicates);
    generics
}

/// Generate the `Overlay` implementation for `schema`.
pub(crate) fn generate_overlay_impl(schema: &SchemaInput, krate: &TokenStream) -> TokenStream {
    let ident = &schema.ident;
    let generics = bounded_generics(schema, krate);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut descriptors = Vec::with_capacity(schema.fields.len());
    let mut steps = Vec::new();
    for field in &schema.fields {
        let step = Step::of(field);
        let tokens = descriptor(field, step, krate);
        steps.extend(walk_step(field, step, &tokens));
        descriptors.push(tokens);
    }
    if steps.is_empty() {
        steps.push(quote! { let _ = walker; });
    }

    quote! {
        impl #impl_generics #krate::Overlay for #ident #ty_generics #where_clause {
            const FIELDS: &'static [#krate::FieldDescriptor] = &[#(#descriptors),*];

            fn walk(&mut self, walker: &mut #krate::Walker<'_>) {
                #(#steps)*
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Token-level checks of the generated implementation.

    use super::*;
    use crate::derive::parse::parse_input;
    use anyhow::{Result, ensure};
    use rstest::rstest;
    use syn::parse_quote;

    fn expand(input: &syn::DeriveInput) -> Result<String> {
        let schema = parse_input(input)?;
        Ok(generate_overlay_impl(&schema, &quote! { overlay_config }).to_string())
    }

    #[rstest]
    fn scalar_fields_resolve_with_inline_descriptor() -> Result<()> {
        let input: syn::DeriveInput = parse_quote! {
            struct Server {
                #[overlay(env = "PORT", default = 8080)]
                port: u16,
            }
        };
        let out = expand(&input)?;
        ensure!(out.contains("walker . scalar (& mut self . port"), "{out}");
        ensure!(out.contains("env : :: core :: option :: Option :: Some (\"PORT\")"), "{out}");
        ensure!(out.contains("default : :: core :: option :: Option :: Some (\"8080\")"), "{out}");
        ensure!(out.contains("overlay_config :: FieldKind :: Scalar"), "{out}");
        Ok(())
    }

    #[rstest]
    #[case::struct_field(quote! { Database }, "walker . nested (\"db\" , & mut self . db)")]
    #[case::boxed(quote! { Option<Box<Database>> }, "walker . nested (\"db\" , & mut self . db)")]
    #[case::map(quote! { BTreeMap<String, Database> }, "walker . map (\"db\" , self . db . iter_mut ())")]
    #[case::optional_map(
        quote! { Option<HashMap<String, Database>> },
        "walker . map (\"db\" , entries . iter_mut ())"
    )]
    fn nested_fields_pick_walker_call(
        #[case] tokens: TokenStream,
        #[case] expected: &str,
    ) -> Result<()> {
        let ty: syn::Type = syn::parse2(tokens)?;
        let input: syn::DeriveInput = parse_quote! {
            struct Root {
                #[overlay(nested)]
                db: #ty,
            }
        };
        let out = expand(&input)?;
        ensure!(out.contains(expected), "{out}");
        Ok(())
    }

    #[rstest]
    fn unannotated_and_skipped_fields_are_not_walked() -> Result<()> {
        let input: syn::DeriveInput = parse_quote! {
            struct Root {
                name: String,
                #[overlay(skip)]
                extra: Vec<String>,
            }
        };
        let out = expand(&input)?;
        ensure!(!out.contains("walker . scalar"), "{out}");
        ensure!(out.contains("let _ = walker ;"), "{out}");
        ensure!(
            out.matches("overlay_config :: FieldKind :: Passthrough").count() == 2,
            "{out}"
        );
        Ok(())
    }

    #[rstest]
    fn descriptors_use_serde_keys() -> Result<()> {
        let input: syn::DeriveInput = parse_quote! {
            #[serde(rename_all = "kebab-case")]
            struct Root {
                #[serde(rename = "type")]
                kind: String,
                max_size: u32,
            }
        };
        let out = expand(&input)?;
        ensure!(out.contains("name : \"kind\" , key : \"type\""), "{out}");
        ensure!(out.contains("name : \"max_size\" , key : \"max-size\""), "{out}");
        Ok(())
    }

    #[rstest]
    fn generic_fields_gain_walker_bounds() -> Result<()> {
        let input: syn::DeriveInput = parse_quote! {
            struct Wrapper<T, V, S> where T: Clone {
                #[overlay(nested)]
                inner: T,
                #[overlay(nested)]
                entries: BTreeMap<String, V>,
                #[overlay(default = "1")]
                level: S,
                #[overlay(nested)]
                fixed: Database,
            }
        };
        let out = expand(&input)?;
        ensure!(
            out.contains(
                "impl < T , V , S > overlay_config :: Overlay for Wrapper < T , V , S > where T : Clone , \
                 T : overlay_config :: Overlay , V : overlay_config :: Overlay , \
                 S : overlay_config :: Scalar"
            ),
            "{out}"
        );
        ensure!(!out.contains("Database : overlay_config"), "{out}");
        Ok(())
    }

    #[rstest]
    fn non_generic_schemas_have_no_where_clause() -> Result<()> {
        let input: syn::DeriveInput = parse_quote! {
            struct Plain {
                #[overlay(nested)]
                inner: Database,
            }
        };
        let out = expand(&input)?;
        ensure!(!out.contains("where"), "{out}");
        Ok(())
    }
}

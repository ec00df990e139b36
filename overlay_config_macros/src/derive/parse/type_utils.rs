//! Type introspection helpers.
//!
//! These utilities perform shallow inspection of `syn::Type` values to
//! recognise `Option<T>` and the map containers the walker can iterate.

use syn::visit::Visit;
use syn::{GenericArgument, Ident, PathArguments, Type};

const MAP_TYPES: [&str; 3] = ["BTreeMap", "HashMap", "IndexMap"];

/// The last path segment of `ty`, if it is a path type.
fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    let Type::Path(p) = ty else {
        return None;
    };
    p.path.segments.last()
}

/// Returns the inner type if `ty` is `Option<T>`.
///
/// The check is shallow and matches on the final path segment, so
/// `std::option::Option<T>` is recognised and `Option<Option<T>>` yields
/// `Option<T>`.
pub(crate) fn option_inner(ty: &Type) -> Option<&Type> {
    let last = last_segment(ty)?;
    if last.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

/// Whether `ty` is a map container with key and value type arguments.
pub(crate) fn is_map(ty: &Type) -> bool {
    let Some(last) = last_segment(ty) else {
        return false;
    };
    if !MAP_TYPES.iter().any(|name| last.ident == *name) {
        return false;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return false;
    };
    args.args
        .iter()
        .filter(|arg| matches!(arg, GenericArgument::Type(_)))
        .count()
        >= 2
}

/// The value type of a map container: its second type argument, so a
/// `HashMap` hasher parameter is skipped.
pub(crate) fn map_value(ty: &Type) -> Option<&Type> {
    if !is_map(ty) {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last_segment(ty)?.arguments else {
        return None;
    };
    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        })
        .nth(1)
}

struct ParamFinder<'a> {
    params: &'a [&'a Ident],
    found: bool,
}

impl<'ast> Visit<'ast> for ParamFinder<'_> {
    fn visit_type_path(&mut self, node: &'ast syn::TypePath) {
        if node.qself.is_none()
            && let Some(first) = node.path.segments.first()
            && self.params.iter().any(|param| first.ident == **param)
        {
            self.found = true;
        }
        syn::visit::visit_type_path(self, node);
    }
}

/// Whether `ty` refers to any of the generic type parameters `params`.
pub(crate) fn mentions_param(ty: &Type, params: &[&Ident]) -> bool {
    let mut finder = ParamFinder {
        params,
        found: false,
    };
    finder.visit_type(ty);
    finder.found
}

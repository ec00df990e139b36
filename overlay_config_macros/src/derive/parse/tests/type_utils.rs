//! Tests for shallow type inspection.

use super::super::{is_map, map_value, mentions_param, option_inner};
use anyhow::{Result, ensure};
use rstest::rstest;
use syn::{Type, parse_quote};

#[rstest]
#[case::btree(parse_quote! { BTreeMap<String, Database> }, true)]
#[case::qualified(parse_quote! { std::collections::HashMap<String, Database> }, true)]
#[case::index(parse_quote! { IndexMap<String, Database> }, true)]
#[case::vec(parse_quote! { Vec<Database> }, false)]
#[case::bare(parse_quote! { BTreeMap }, false)]
#[case::optional(parse_quote! { Option<BTreeMap<String, Database>> }, false)]
fn detects_map_types(#[case] ty: Type, #[case] expected: bool) -> Result<()> {
    ensure!(is_map(&ty) == expected);
    Ok(())
}

#[rstest]
fn option_inner_unwraps_one_level() -> Result<()> {
    let ty: Type = parse_quote! { Option<Option<u8>> };
    let expected: Type = parse_quote! { Option<u8> };
    ensure!(option_inner(&ty) == Some(&expected));
    let plain: Type = parse_quote! { u8 };
    ensure!(option_inner(&plain).is_none());
    Ok(())
}

#[rstest]
fn map_value_skips_the_hasher() -> Result<()> {
    let ty: Type = parse_quote! { HashMap<String, Shard, RandomState> };
    let expected: Type = parse_quote! { Shard };
    ensure!(map_value(&ty) == Some(&expected));
    let plain: Type = parse_quote! { Vec<Shard> };
    ensure!(map_value(&plain).is_none());
    Ok(())
}

#[rstest]
#[case::bare(parse_quote! { T }, true)]
#[case::wrapped(parse_quote! { Option<Box<T>> }, true)]
#[case::associated(parse_quote! { T::Item }, true)]
#[case::concrete(parse_quote! { Database }, false)]
#[case::suffix(parse_quote! { crate::T }, false)]
fn detects_type_parameters(#[case] ty: Type, #[case] expected: bool) -> Result<()> {
    let param: syn::Ident = parse_quote! { T };
    ensure!(mentions_param(&ty, &[&param]) == expected);
    Ok(())
}

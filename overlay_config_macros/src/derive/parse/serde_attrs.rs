//! Reads the serde attributes that decide which document key a field uses.
//!
//! Field descriptors must report the key `serde::Deserialize` actually reads,
//! so only the deserialize side of `rename` and `rename_all` is considered.

use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutyKebabCase, ToShoutySnakeCase, ToSnakeCase,
    ToUpperCamelCase,
};
use syn::{Attribute, Field, LitStr, Token};

/// Container-level case conversion applied to field names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

const RULES: [(&str, RenameRule); 8] = [
    ("lowercase", RenameRule::Lower),
    ("UPPERCASE", RenameRule::Upper),
    ("PascalCase", RenameRule::Pascal),
    ("camelCase", RenameRule::Camel),
    ("snake_case", RenameRule::Snake),
    ("SCREAMING_SNAKE_CASE", RenameRule::ScreamingSnake),
    ("kebab-case", RenameRule::Kebab),
    ("SCREAMING-KEBAB-CASE", RenameRule::ScreamingKebab),
];

impl RenameRule {
    fn from_lit(lit: &LitStr) -> syn::Result<Self> {
        let name = lit.value();
        RULES
            .iter()
            .find_map(|(label, rule)| (*label == name).then_some(*rule))
            .ok_or_else(|| {
                syn::Error::new(lit.span(), format!("unsupported rename_all rule '{name}'"))
            })
    }

    fn convert(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_ascii_lowercase(),
            Self::Upper => name.to_ascii_uppercase(),
            Self::Pascal => name.to_upper_camel_case(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Snake => name.to_snake_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::ScreamingKebab => name.to_shouty_kebab_case(),
        }
    }
}

/// Finds `#[serde(key = "..")]` or `#[serde(key(deserialize = ".."))]`.
///
/// Later attributes win, matching serde's own behaviour for repeated keys.
fn deserialize_value(attrs: &[Attribute], key: &str) -> syn::Result<Option<LitStr>> {
    let mut found = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident(key) {
                return super::discard_unknown(&meta);
            }
            if meta.input.peek(Token![=]) {
                found = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|side| {
                    if side.path.is_ident("deserialize") {
                        found = Some(side.value()?.parse::<LitStr>()?);
                        Ok(())
                    } else {
                        super::discard_unknown(&side)
                    }
                })
            } else {
                Ok(())
            }
        })?;
    }
    Ok(found)
}

/// The container's `rename_all` rule, if any.
pub(crate) fn serde_rename_all(attrs: &[Attribute]) -> syn::Result<Option<RenameRule>> {
    deserialize_value(attrs, "rename_all")?
        .map(|lit| RenameRule::from_lit(&lit))
        .transpose()
}

/// The document key serde reads `field` from.
///
/// An explicit `rename` takes priority over the container rule.
pub(crate) fn serde_field_key(field: &Field, rule: Option<RenameRule>) -> syn::Result<String> {
    if let Some(lit) = deserialize_value(&field.attrs, "rename")? {
        return Ok(lit.value());
    }
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "unnamed fields are not supported"))?;
    let raw = ident.to_string();
    let name = raw.strip_prefix("r#").unwrap_or(&raw);
    Ok(rule.map_or_else(|| name.to_owned(), |rule| rule.convert(name)))
}

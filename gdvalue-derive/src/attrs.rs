use std::collections::HashSet;

use proc_macro2::Span;
use syn::{spanned::Spanned, Attribute, Field, LitStr};

#[derive(Default, Clone)]
pub(crate) struct GdvFieldAttr {
    pub(crate) rename: Option<LitStr>,
    pub(crate) skip: bool,
    pub(crate) default: bool,
}

impl GdvFieldAttr {
    /// The map key for a named field.
    pub(crate) fn key(&self, field: &Field) -> String {
        self.rename.as_ref().map_or_else(
            || {
                field
                    .ident
                    .as_ref()
                    .map_or_else(String::new, |ident| {
                        ident.to_string().trim_start_matches("r#").to_owned()
                    })
            },
            LitStr::value,
        )
    }
}

#[derive(Default, Clone)]
pub(crate) struct GdvVariantAttr {
    pub(crate) rename: Option<LitStr>,
}

#[derive(Default, Clone)]
pub(crate) struct GdvContainerAttr {
    pub(crate) tag: Option<LitStr>,
}

pub(crate) fn parse_gdv_field_attrs(attrs: &[Attribute]) -> syn::Result<GdvFieldAttr> {
    let mut out = GdvFieldAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("gdv") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                if out.skip {
                    return Err(meta.error("duplicate `gdv(skip)`"));
                }
                out.skip = true;
                return Ok(());
            }
            if meta.path.is_ident("default") {
                if out.default {
                    return Err(meta.error("duplicate `gdv(default)`"));
                }
                out.default = true;
                return Ok(());
            }
            if meta.path.is_ident("rename") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `gdv(rename=...)`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit);
                return Ok(());
            }
            Err(meta.error("unsupported `gdv(...)` field attribute (allowed: rename, skip, default)"))
        })?;
    }

    if out.skip && (out.rename.is_some() || out.default) {
        return Err(syn::Error::new(
            Span::call_site(),
            "`gdv(skip)` cannot be combined with `rename` or `default`",
        ));
    }

    Ok(out)
}

pub(crate) fn parse_gdv_variant_attrs(attrs: &[Attribute]) -> syn::Result<GdvVariantAttr> {
    let mut out = GdvVariantAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("gdv") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") || meta.path.is_ident("tag") {
                if out.rename.is_some() {
                    return Err(meta.error("duplicate `gdv(rename=...)` on variant"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                out.rename = Some(lit);
                return Ok(());
            }
            if meta.path.is_ident("skip") || meta.path.is_ident("default") {
                return Err(meta.error("`gdv(skip)` / `gdv(default)` are not valid on enum variants"));
            }
            Err(meta.error("unsupported `gdv(...)` variant attribute (allowed: rename)"))
        })?;
    }
    Ok(out)
}

pub(crate) fn parse_gdv_container_attrs(attrs: &[Attribute]) -> syn::Result<GdvContainerAttr> {
    let mut out = GdvContainerAttr::default();
    for attr in attrs {
        if !attr.path().is_ident("gdv") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") || meta.path.is_ident("rename") {
                if out.tag.is_some() {
                    return Err(meta.error("duplicate `gdv(tag=...)`"));
                }
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "`gdv(tag)` must not be empty"));
                }
                out.tag = Some(lit);
                return Ok(());
            }
            Err(meta.error("unsupported `gdv(...)` container attribute (allowed: tag)"))
        })?;
    }
    Ok(out)
}

/// Tuple fields have no key, so only an empty attribute list is accepted.
pub(crate) fn ensure_plain_tuple_field(field: &Field, ctx: &str) -> syn::Result<()> {
    let attr = parse_gdv_field_attrs(&field.attrs)?;
    if attr.skip || attr.default || attr.rename.is_some() {
        return Err(syn::Error::new(
            field.span(),
            format!("`gdv(...)` field attributes are not supported on {ctx}"),
        ));
    }
    Ok(())
}

/// Reject two fields that would be written under the same key.
pub(crate) fn check_unique_keys<'a>(
    keys: impl IntoIterator<Item = (&'a str, Span)>,
) -> syn::Result<()> {
    let mut seen = HashSet::new();
    for (key, span) in keys {
        if !seen.insert(key) {
            return Err(syn::Error::new(span, format!("duplicate gdv key `{key}`")));
        }
    }
    Ok(())
}

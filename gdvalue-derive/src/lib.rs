//! Derive macros for `gdvalue`'s `ToGdv` and `FromGdv` traits.
//!
//! - Structs with named fields become maps tagged with the struct name,
//!   keyed by symbols.
//! - Tuple structs become tagged tuples; unit structs become a symbol.
//! - Unit enum variants become symbols, other variants become containers
//!   tagged with the variant name.
//!
//! `#[gdv(tag = "...")]` on a struct and `#[gdv(rename = "...")]` on a
//! variant or field change the written names. `#[gdv(skip)]` and
//! `#[gdv(default)]` apply to named fields.

extern crate proc_macro;

mod attrs;
mod from_gdv;
mod to_gdv;

use proc_macro::TokenStream;
use syn::{
    parse_macro_input, spanned::Spanned, Data, DeriveInput, FieldsNamed, GenericArgument, Ident,
    PathArguments, Type,
};

use crate::attrs::{check_unique_keys, parse_gdv_field_attrs, GdvFieldAttr};

/// A named field with its parsed attributes.
pub(crate) struct NamedField<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) ty: &'a Type,
    pub(crate) key: String,
    pub(crate) attr: GdvFieldAttr,
}

pub(crate) fn named_fields(fields: &FieldsNamed) -> syn::Result<Vec<NamedField<'_>>> {
    let mut out = Vec::new();
    for field in &fields.named {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new(field.span(), "expected a named field"));
        };
        let attr = parse_gdv_field_attrs(&field.attrs)?;
        out.push(NamedField {
            ident,
            ty: &field.ty,
            key: attr.key(field),
            attr,
        });
    }
    check_unique_keys(
        out.iter()
            .filter(|f| !f.attr.skip)
            .map(|f| (f.key.as_str(), f.ident.span())),
    )?;
    Ok(out)
}

pub(crate) fn is_option_type(ty: &Type) -> bool {
    let Type::Path(tp) = ty else { return false };
    let Some(seg) = tp.path.segments.last() else {
        return false;
    };
    seg.ident == "Option"
}

/// Whether `ty` names `ident` anywhere, so a bound on it would be cyclic.
pub(crate) fn type_mentions_ident(ty: &Type, ident: &Ident) -> bool {
    match ty {
        Type::Path(tp) => tp.path.segments.iter().any(|seg| {
            if seg.ident == *ident {
                return true;
            }
            match &seg.arguments {
                PathArguments::AngleBracketed(args) => args.args.iter().any(|arg| match arg {
                    GenericArgument::Type(inner) => type_mentions_ident(inner, ident),
                    _ => false,
                }),
                _ => false,
            }
        }),
        Type::Reference(tr) => type_mentions_ident(&tr.elem, ident),
        Type::Tuple(tt) => tt.elems.iter().any(|elem| type_mentions_ident(elem, ident)),
        Type::Array(ta) => type_mentions_ident(&ta.elem, ident),
        Type::Slice(ts) => type_mentions_ident(&ts.elem, ident),
        Type::Group(tg) => type_mentions_ident(&tg.elem, ident),
        Type::Paren(tp) => type_mentions_ident(&tp.elem, ident),
        _ => false,
    }
}

pub(crate) fn add_where_bound(
    where_clause: &mut syn::WhereClause,
    ty: &Type,
    bound: proc_macro2::TokenStream,
) {
    let pred: syn::WherePredicate = syn::parse_quote!(#ty: #bound);
    where_clause.predicates.push(pred);
}

pub(crate) fn empty_where_clause() -> syn::WhereClause {
    syn::WhereClause {
        where_token: syn::token::Where::default(),
        predicates: syn::punctuated::Punctuated::new(),
    }
}

#[proc_macro_derive(ToGdv, attributes(gdv))]
pub fn derive_to_gdv(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => to_gdv::expand_struct(&input, data),
        Data::Enum(data) => to_gdv::expand_enum(&input, data),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "ToGdv not supported for unions",
        )),
    };
    TokenStream::from(out.unwrap_or_else(syn::Error::into_compile_error))
}

#[proc_macro_derive(FromGdv, attributes(gdv))]
pub fn derive_from_gdv(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => from_gdv::expand_struct(&input, data),
        Data::Enum(data) => from_gdv::expand_enum(&input, data),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "FromGdv not supported for unions",
        )),
    };
    TokenStream::from(out.unwrap_or_else(syn::Error::into_compile_error))
}

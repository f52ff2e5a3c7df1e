use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DataStruct, DeriveInput, Fields, FieldsUnnamed, Ident, WhereClause};

use crate::attrs::{ensure_plain_tuple_field, parse_gdv_container_attrs, parse_gdv_variant_attrs};
use crate::{
    add_where_bound, empty_where_clause, is_option_type, named_fields, type_mentions_ident,
};

/// Field initializers reading a tagged map at `p`. Unknown keys are ignored.
fn named_inits(
    name: &Ident,
    fields: &syn::FieldsNamed,
    wc: &mut WhereClause,
) -> syn::Result<Vec<TokenStream>> {
    let mut inits = Vec::new();
    for f in named_fields(fields)? {
        let ident = f.ident;
        let ty = f.ty;
        let key = &f.key;
        if f.attr.skip {
            add_where_bound(wc, ty, quote!(::core::default::Default));
            inits.push(quote! { #ident: ::core::default::Default::default(), });
            continue;
        }
        if !type_mentions_ident(ty, name) {
            add_where_bound(wc, ty, quote!(::gdvalue::FromGdv));
        }
        if is_option_type(ty) || f.attr.default {
            add_where_bound(wc, ty, quote!(::core::default::Default));
            inits.push(quote! {
                #ident: match p.map_get_value_at_sym_opt(#key)? {
                    ::core::option::Option::Some(sub) => sub.to()?,
                    ::core::option::Option::None => ::core::default::Default::default(),
                },
            });
        } else {
            inits.push(quote! {
                #ident: p.map_get_value_at_sym(#key)?.to()?,
            });
        }
    }
    Ok(inits)
}

/// Checks and element reads for a tuple at `p` with exactly the given fields.
fn tuple_reads(
    name: &Ident,
    fields: &FieldsUnnamed,
    ctx: &str,
    wc: &mut WhereClause,
) -> syn::Result<(TokenStream, Vec<TokenStream>)> {
    let mut items = Vec::new();
    for (idx, field) in fields.unnamed.iter().enumerate() {
        ensure_plain_tuple_field(field, ctx)?;
        if !type_mentions_ident(&field.ty, name) {
            add_where_bound(wc, &field.ty, quote!(::gdvalue::FromGdv));
        }
        items.push(quote!(p.tuple_get_value_at(#idx)?.to()?));
    }
    let len = items.len();
    let check = quote! {
        p.check_is_tuple()?;
        let size = p.container_size()?;
        if size != #len {
            return ::core::result::Result::Err(p.error(
                ::gdvalue::ErrorCode::Conversion,
                ::std::format!("expected tuple of {} elements, not {}", #len, size),
            ));
        }
    };
    Ok((check, items))
}

pub(crate) fn expand_struct(input: &DeriveInput, data: &DataStruct) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let tag = parse_gdv_container_attrs(&input.attrs)?
        .tag
        .map_or_else(|| name.to_string(), |lit| lit.value());
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let mut where_clause = where_clause.cloned().unwrap_or_else(empty_where_clause);

    let body = match &data.fields {
        Fields::Named(fields) => {
            let inits = named_inits(name, fields, &mut where_clause)?;
            quote! {
                p.check_tagged_map_tag(#tag)?;
                ::core::result::Result::Ok(Self { #(#inits)* })
            }
        }
        Fields::Unnamed(fields) => {
            let (check, items) = tuple_reads(name, fields, "tuple structs", &mut where_clause)?;
            quote! {
                #check
                p.check_container_tag(#tag)?;
                ::core::result::Result::Ok(Self(#(#items),*))
            }
        }
        Fields::Unit => quote! {
            let sym = p.symbol_get()?;
            if sym.as_str() == ::core::option::Option::Some(#tag) {
                ::core::result::Result::Ok(Self)
            } else {
                ::core::result::Result::Err(p.error(
                    ::gdvalue::ErrorCode::WrongKind,
                    ::std::format!(
                        "expected symbol {}, not {}",
                        ::gdvalue::Value::symbol(#tag),
                        p.value(),
                    ),
                ))
            }
        },
    };

    Ok(quote! {
        impl #impl_generics ::gdvalue::FromGdv for #name #ty_generics #where_clause {
            fn from_gdv(p: &::gdvalue::GdvParser<'_>) -> ::core::result::Result<Self, ::gdvalue::GdvError> {
                #body
            }
        }
    })
}

pub(crate) fn expand_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let mut where_clause = where_clause.cloned().unwrap_or_else(empty_where_clause);

    let mut unit_arms = Vec::new();
    let mut tagged_arms = Vec::new();

    for variant in &data.variants {
        let vname = parse_gdv_variant_attrs(&variant.attrs)?
            .rename
            .map_or_else(|| variant.ident.to_string(), |lit| lit.value());
        let ident = &variant.ident;
        match &variant.fields {
            Fields::Unit => {
                unit_arms.push(quote! {
                    ::core::option::Option::Some(#vname) => ::core::result::Result::Ok(Self::#ident),
                });
            }
            Fields::Unnamed(fields) => {
                let (check, items) =
                    tuple_reads(name, fields, "tuple variants", &mut where_clause)?;
                tagged_arms.push(quote! {
                    ::core::option::Option::Some(#vname) => {
                        #check
                        ::core::result::Result::Ok(Self::#ident(#(#items),*))
                    }
                });
            }
            Fields::Named(fields) => {
                let inits = named_inits(name, fields, &mut where_clause)?;
                tagged_arms.push(quote! {
                    ::core::option::Option::Some(#vname) => {
                        p.check_is_map()?;
                        ::core::result::Result::Ok(Self::#ident { #(#inits)* })
                    }
                });
            }
        }
    }

    Ok(quote! {
        impl #impl_generics ::gdvalue::FromGdv for #name #ty_generics #where_clause {
            fn from_gdv(p: &::gdvalue::GdvParser<'_>) -> ::core::result::Result<Self, ::gdvalue::GdvError> {
                let unknown = |found: ::gdvalue::Symbol| {
                    p.error(
                        ::gdvalue::ErrorCode::Conversion,
                        ::std::format!(
                            "{} is not a variant of `{}`",
                            ::gdvalue::Value::Symbol(found),
                            #type_name,
                        ),
                    )
                };
                if p.value().is_symbol() {
                    let sym = p.symbol_get()?;
                    match sym.as_str() {
                        #(#unit_arms)*
                        _ => ::core::result::Result::Err(unknown(sym)),
                    }
                } else {
                    let tag = p.tagged_container_get_tag()?;
                    match tag.as_str() {
                        #(#tagged_arms)*
                        _ => ::core::result::Result::Err(unknown(tag)),
                    }
                }
            }
        }
    })
}

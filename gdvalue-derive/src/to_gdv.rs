use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DataEnum, DataStruct, DeriveInput, Fields};

use crate::attrs::{ensure_plain_tuple_field, parse_gdv_container_attrs, parse_gdv_variant_attrs};
use crate::{add_where_bound, empty_where_clause, named_fields, type_mentions_ident, NamedField};

/// Statements filling `entries` from named fields bound to local variables.
fn map_entries(
    fields: &[NamedField<'_>],
    access: impl Fn(&NamedField<'_>) -> TokenStream,
) -> Vec<TokenStream> {
    fields
        .iter()
        .filter(|f| !f.attr.skip)
        .map(|f| {
            let key = &f.key;
            let value = access(f);
            quote! {
                entries.insert(
                    ::gdvalue::Value::symbol(#key),
                    ::gdvalue::ToGdv::to_gdv(#value),
                );
            }
        })
        .collect()
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
            let fields = named_fields(fields)?;
            for f in fields.iter().filter(|f| !f.attr.skip) {
                if !type_mentions_ident(f.ty, name) {
                    add_where_bound(&mut where_clause, f.ty, quote!(::gdvalue::ToGdv));
                }
            }
            let entries = map_entries(&fields, |f| {
                let ident = f.ident;
                quote!(&self.#ident)
            });
            quote! {
                #[allow(unused_mut)]
                let mut entries = ::gdvalue::GdvMap::new();
                #(#entries)*
                ::gdvalue::Value::tagged_map(::gdvalue::Symbol::intern(#tag), entries)
            }
        }
        Fields::Unnamed(fields) => {
            let mut items = Vec::new();
            for (idx, field) in fields.unnamed.iter().enumerate() {
                ensure_plain_tuple_field(field, "tuple structs")?;
                if !type_mentions_ident(&field.ty, name) {
                    add_where_bound(&mut where_clause, &field.ty, quote!(::gdvalue::ToGdv));
                }
                let index = syn::Index::from(idx);
                items.push(quote!(::gdvalue::ToGdv::to_gdv(&self.#index)));
            }
            quote! {
                ::gdvalue::Value::tagged_tuple(
                    ::gdvalue::Symbol::intern(#tag),
                    ::std::vec![#(#items),*],
                )
            }
        }
        Fields::Unit => quote!(::gdvalue::Value::symbol(#tag)),
    };

    Ok(quote! {
        impl #impl_generics ::gdvalue::ToGdv for #name #ty_generics #where_clause {
            fn to_gdv(&self) -> ::gdvalue::Value {
                #body
            }
        }
    })
}

pub(crate) fn expand_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let mut where_clause = where_clause.cloned().unwrap_or_else(empty_where_clause);
    let mut arms = Vec::new();

    for variant in &data.variants {
        let vname = parse_gdv_variant_attrs(&variant.attrs)?
            .rename
            .map_or_else(|| variant.ident.to_string(), |lit| lit.value());
        let ident = &variant.ident;
        match &variant.fields {
            Fields::Unit => {
                arms.push(quote! {
                    Self::#ident => ::gdvalue::Value::symbol(#vname)
                });
            }
            Fields::Unnamed(fields) => {
                let mut pats = Vec::new();
                let mut items = Vec::new();
                for (idx, field) in fields.unnamed.iter().enumerate() {
                    ensure_plain_tuple_field(field, "tuple variants")?;
                    if !type_mentions_ident(&field.ty, name) {
                        add_where_bound(&mut where_clause, &field.ty, quote!(::gdvalue::ToGdv));
                    }
                    let var = format_ident!("v{idx}");
                    items.push(quote!(::gdvalue::ToGdv::to_gdv(#var)));
                    pats.push(var);
                }
                arms.push(quote! {
                    Self::#ident( #(#pats),* ) => ::gdvalue::Value::tagged_tuple(
                        ::gdvalue::Symbol::intern(#vname),
                        ::std::vec![#(#items),*],
                    )
                });
            }
            Fields::Named(fields) => {
                let fields = named_fields(fields)?;
                let mut pats = Vec::new();
                for f in fields.iter().filter(|f| !f.attr.skip) {
                    if !type_mentions_ident(f.ty, name) {
                        add_where_bound(&mut where_clause, f.ty, quote!(::gdvalue::ToGdv));
                    }
                    let ident = f.ident;
                    pats.push(quote!(#ident));
                }
                let entries = map_entries(&fields, |f| {
                    let ident = f.ident;
                    quote!(#ident)
                });
                arms.push(quote! {
                    Self::#ident { #(#pats,)* .. } => {
                        #[allow(unused_mut)]
                let mut entries = ::gdvalue::GdvMap::new();
                        #(#entries)*
                        ::gdvalue::Value::tagged_map(::gdvalue::Symbol::intern(#vname), entries)
                    }
                });
            }
        }
    }

    let body = if arms.is_empty() {
        quote!(match *self {})
    } else {
        quote! {
            match self {
                #(#arms),*
            }
        }
    };

    Ok(quote! {
        impl #impl_generics ::gdvalue::ToGdv for #name #ty_generics #where_clause {
            fn to_gdv(&self) -> ::gdvalue::Value {
                #body
            }
        }
    })
}

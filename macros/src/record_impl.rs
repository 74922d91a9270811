//! Record derive macro implementation
//!
//! This module contains the implementation of the `Record` and `FieldSource`
//! derive macros, which generate string-keyed field access for struct fields.

use darling::{ast, FromDeriveInput, FromField, FromMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::utils::{field_key, is_option_type, is_vec_type};

/// How a struct field is turned into a `FieldValue`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromMeta)]
pub enum FieldKind {
    /// Converted through `ToFieldValue`
    #[default]
    #[darling(rename = "value")]
    Value,
    /// Converted through `Display` into an enum tag
    #[darling(rename = "enum")]
    Enum,
    /// A `Vec` of `FieldSource` items
    #[darling(rename = "nested")]
    Nested,
}

/// Receiver for the struct that derives `Record` or `FieldSource`
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
pub struct RecordReceiver {
    /// The struct identifier
    pub ident: syn::Ident,
    /// Generics of the struct
    pub generics: syn::Generics,
    /// The struct data with parsed fields
    pub data: ast::Data<(), RecordFieldReceiver>,
    /// Name of the identifier field, `id` when omitted
    #[darling(default)]
    pub id: Option<String>,
}

/// Receiver for the fields in the struct
#[derive(Debug, FromField)]
#[darling(attributes(field))]
pub struct RecordFieldReceiver {
    /// The field identifier
    pub ident: Option<syn::Ident>,
    /// The field type
    pub ty: syn::Type,
    /// Field name exposed to the query pipeline
    #[darling(default)]
    pub name: Option<String>,
    /// Conversion strategy
    #[darling(default)]
    pub kind: FieldKind,
    /// Leave the field out of the accessor entirely
    #[darling(default)]
    pub skip: bool,
}

/// Process the `Record` derive macro
pub fn process_derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let receiver = match RecordReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    let field_source = match generate_field_source_impl(&receiver) {
        Ok(tokens) => tokens,
        Err(err) => return err.to_compile_error().into(),
    };
    let record = match generate_record_impl(&receiver) {
        Ok(tokens) => tokens,
        Err(err) => return err.to_compile_error().into(),
    };

    TokenStream::from(quote! {
        #field_source
        #record
    })
}

/// Process the `FieldSource` derive macro
pub fn process_derive_field_source(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let receiver = match RecordReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    match generate_field_source_impl(&receiver) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate the `FieldSource` implementation
pub fn generate_field_source_impl(receiver: &RecordReceiver) -> syn::Result<TokenStream2> {
    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    let mut names = Vec::new();
    let mut accessors = Vec::new();

    for field in fields.iter().filter(|field| !field.skip) {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let key = field_key(field_ident, field.name.as_deref());
        let accessor = generate_accessor(field_ident, &field.ty, field.kind)?;

        accessors.push(quote! { #key => #accessor, });
        names.push(key);
    }

    let struct_name = &receiver.ident;
    let (impl_generics, ty_generics, where_clause) = receiver.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::record_query::FieldSource for #struct_name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::core::option::Option<::record_query::FieldValue> {
                match name {
                    #(#accessors)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![#(#names),*]
            }
        }
    })
}

/// Generate the `Record` implementation
pub fn generate_record_impl(receiver: &RecordReceiver) -> syn::Result<TokenStream2> {
    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    let id_name = receiver.id.as_deref().unwrap_or("id");
    let id_ident = fields
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == id_name)
        .ok_or_else(|| {
            syn::Error::new(
                receiver.ident.span(),
                format!("Record derive needs an identifier field named `{id_name}`"),
            )
        })?;

    let struct_name = &receiver.ident;
    let (impl_generics, ty_generics, where_clause) = receiver.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::record_query::Record for #struct_name #ty_generics #where_clause {
            fn id(&self) -> &str {
                ::core::convert::AsRef::<str>::as_ref(&self.#id_ident)
            }
        }
    })
}

/// Generate the accessor expression for one field
pub fn generate_accessor(
    field_ident: &syn::Ident,
    field_type: &syn::Type,
    kind: FieldKind,
) -> syn::Result<TokenStream2> {
    match kind {
        FieldKind::Value => Ok(quote! {
            ::record_query::ToFieldValue::to_field_value(&self.#field_ident)
        }),
        FieldKind::Enum if is_option_type(field_type) => Ok(quote! {
            self.#field_ident.as_ref().map(|value| {
                ::record_query::FieldValue::Enum(::std::string::ToString::to_string(value))
            })
        }),
        FieldKind::Enum => Ok(quote! {
            ::core::option::Option::Some(::record_query::FieldValue::Enum(
                ::std::string::ToString::to_string(&self.#field_ident),
            ))
        }),
        FieldKind::Nested if is_vec_type(field_type) => Ok(quote! {
            ::core::option::Option::Some(::record_query::FieldValue::Collection(
                self.#field_ident
                    .iter()
                    .map(::record_query::FieldSource::to_field_map)
                    .collect(),
            ))
        }),
        FieldKind::Nested => Err(syn::Error::new(
            field_ident.span(),
            "`kind = \"nested\"` fields must be a Vec of FieldSource items",
        )),
    }
}

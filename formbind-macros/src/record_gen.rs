use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_quote};

use crate::attrs::FieldAttrs;

pub fn generate_record_impl(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Record can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Record does not support unions",
            ));
        }
    };

    let mut descriptors = Vec::with_capacity(fields.len());
    let mut setters = Vec::with_capacity(fields.len());
    let mut generics = input.generics.clone();

    for (index, field) in fields.iter().enumerate() {
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let ty = &field.ty;
        let attrs = FieldAttrs::parse(&field.attrs)?;

        let name = ident.to_string();
        let name = name.strip_prefix("r#").unwrap_or(&name);
        let writable = !attrs.readonly;
        let tags = attrs.tags.iter().map(|(key, value)| {
            quote! { ::formbind::FieldTag { key: #key, value: #value } }
        });

        descriptors.push(quote! {
            ::formbind::Field {
                name: #name,
                shape: <#ty as ::formbind::FormType>::SHAPE,
                tags: &[#(#tags),*],
                writable: #writable,
            }
        });

        if writable {
            setters.push(quote! {
                #index => {
                    self.#ident = <#ty as ::formbind::FormType>::from_value(value)?;
                    ::core::result::Result::Ok(())
                }
            });
        }

        if !input.generics.params.is_empty() {
            generics
                .make_where_clause()
                .predicates
                .push(parse_quote! { #ty: ::formbind::FormType });
        }
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let type_identifier = struct_name.to_string();
    let count = descriptors.len();
    let record_shape = quote! {
        &const {
            ::formbind::RecordShape {
                type_identifier: #type_identifier,
                fields: &const {
                    let fields: [::formbind::Field; #count] = [#(#descriptors),*];
                    fields
                },
            }
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::formbind::FormType for #struct_name #ty_generics #where_clause {
            const SHAPE: &'static ::formbind::Shape = &const {
                ::formbind::Shape {
                    type_identifier: #type_identifier,
                    def: ::formbind::Def::Record(#record_shape),
                }
            };

            fn from_value(
                value: ::formbind::Value,
            ) -> ::core::result::Result<Self, ::formbind::ValueMismatch> {
                ::core::result::Result::Err(::formbind::ValueMismatch::of(&value))
            }

            fn as_record_mut(&mut self) -> ::core::option::Option<&mut dyn ::formbind::Record> {
                ::core::option::Option::Some(self)
            }
        }

        #[automatically_derived]
        impl #impl_generics ::formbind::Record for #struct_name #ty_generics #where_clause {
            fn record_shape(&self) -> &'static ::formbind::RecordShape {
                #record_shape
            }

            fn set_field(
                &mut self,
                index: usize,
                value: ::formbind::Value,
            ) -> ::core::result::Result<(), ::formbind::ValueMismatch> {
                match index {
                    #(#setters)*
                    _ => ::core::result::Result::Err(::formbind::ValueMismatch::of(&value)),
                }
            }
        }
    })
}

//! Derive macros for flowport.

use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input};

/// Derive `flowport::merge::Merge` for a config struct with named fields.
///
/// Each field is merged with its counterpart from the higher-priority layer,
/// so every field type must implement `Merge` itself.
///
/// ```ignore
/// use flowport_derive::Merge;
///
/// #[derive(Merge)]
/// struct EngineConfig {
///     command: Option<Vec<String>>,
///     probe_timeout_secs: Option<u64>,
/// }
/// ```
#[proc_macro_derive(Merge)]
pub fn derive_merge(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(&input, "Merge needs a struct with named fields")
                    .to_compile_error()
                    .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(&input, "Merge can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    let field_merges = fields.iter().map(|f| {
        let field_name = &f.ident;
        quote! {
            #field_name: ::flowport::merge::Merge::merge(self.#field_name, other.#field_name)
        }
    });

    let expanded = quote! {
        impl #impl_generics ::flowport::merge::Merge for #name #ty_generics #where_clause {
            fn merge(self, other: Self) -> Self {
                Self {
                    #(#field_merges),*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

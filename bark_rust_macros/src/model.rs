use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DataStruct, DeriveInput, Fields, Ident, LitStr};

pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let collection = collection_name(input)?;
    let meta_field = meta_field(input)?;

    Ok(quote! {
        impl #impl_generics bark_rust::Model for #name #ty_generics #where_clause {
            const COLLECTION: &'static str = #collection;

            fn meta(&self) -> &bark_rust::Meta {
                &self.#meta_field
            }

            fn meta_mut(&mut self) -> &mut bark_rust::Meta {
                &mut self.#meta_field
            }
        }
    })
}

/// Run `visit` on every argument of every `#[model(...)]` in `attrs`.
fn for_each_model_arg(
    attrs: &[Attribute],
    mut visit: impl FnMut(ParseNestedMeta<'_>) -> syn::Result<()>,
) -> syn::Result<()> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("model"))
        .try_for_each(|attr| attr.parse_nested_meta(&mut visit))
}

/// `#[model(collection = "...")]`, else the pluralised snake_case type name.
fn collection_name(input: &DeriveInput) -> syn::Result<String> {
    let mut collection = None;
    for_each_model_arg(&input.attrs, |arg| {
        if arg.path.is_ident("collection") {
            let value: LitStr = arg.value()?.parse()?;
            collection = Some(value.value());
            Ok(())
        } else {
            Err(arg.error("expected `collection = \"...\"`"))
        }
    })?;
    Ok(collection.unwrap_or_else(|| pluralise(&input.ident)))
}

/// The field tagged `#[model(meta)]`, else the field named `meta`.
fn meta_field(input: &DeriveInput) -> syn::Result<Ident> {
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => &named.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Model can only be derived for structs with named fields",
            ))
        }
    };

    for field in fields {
        let mut tagged = false;
        for_each_model_arg(&field.attrs, |arg| {
            if arg.path.is_ident("meta") {
                tagged = true;
                Ok(())
            } else {
                Err(arg.error("expected `meta`"))
            }
        })?;
        if let (true, Some(ident)) = (tagged, &field.ident) {
            return Ok(ident.clone());
        }
    }

    fields
        .iter()
        .filter_map(|field| field.ident.clone())
        .find(|ident| *ident == "meta")
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Model needs a `meta: Meta` field or a field tagged #[model(meta)]",
            )
        })
}

/// `ChewToy` -> `chew_toys`.
fn pluralise(ident: &Ident) -> String {
    let name = ident.to_string();
    let mut plural = String::with_capacity(name.len() + 2);
    for (i, ch) in name.char_indices() {
        if ch.is_uppercase() && i > 0 {
            plural.push('_');
        }
        plural.extend(ch.to_lowercase());
    }
    plural.push('s');
    plural
}

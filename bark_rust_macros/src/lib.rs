mod model;

use proc_macro::TokenStream;

// ============================================================================
// #[derive(Model)]
// ============================================================================

/// Derive macro that implements `bark_rust::Model` for a struct carrying a
/// `bark_rust::Meta` field.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Debug, Default, Serialize, Deserialize, Model)]
/// #[model(collection = "dogs")]
/// pub struct Dog {
///     #[serde(flatten)]
///     pub meta: Meta,
///     pub name: String,
/// }
/// ```
///
/// The metadata field defaults to one named `meta`; mark another field with
/// `#[model(meta)]` to use it instead. Without a `collection` attribute the
/// collection name is the snake_case struct name plus `s`.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive_model(input)
}

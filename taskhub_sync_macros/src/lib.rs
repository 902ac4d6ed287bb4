use proc_macro::TokenStream;

mod resource;

/// Derive macro for the `Resource` trait.
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Serialize, Deserialize, Resource)]
/// #[resource(kind = "team")]
/// struct Team {
///     #[serde(rename = "_id")]
///     #[resource(id)]
///     pub id: String,
///     pub name: String,
/// }
/// ```
///
/// - `#[resource(kind = "...")]` sets the resource kind used in operation keys
///   and log fields. If omitted, defaults to the snake_case struct name.
/// - `#[resource(id)]` marks the field holding the server-assigned identifier.
///   If omitted, defaults to a field named `id`.
#[proc_macro_derive(Resource, attributes(resource))]
pub fn derive_resource(input: TokenStream) -> TokenStream {
    resource::derive_resource(input)
}

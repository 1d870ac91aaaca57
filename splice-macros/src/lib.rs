use proc_macro::TokenStream;
use quote::quote;
use syn::{LitStr, parse_macro_input};

/// Builds a `HandlerName` from a string literal, checked at compile time.
///
/// # Example
///
/// ```rust,ignore
/// let save = splice::handler!("onSave");
/// let publish = splice::handler!("blog::onPublish");
/// // splice::handler!("save"); // error: invalid handler name `save`
/// ```
#[proc_macro]
pub fn handler(input: TokenStream) -> TokenStream {
    let literal = parse_macro_input!(input as LitStr);
    expand(&literal)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(literal: &LitStr) -> syn::Result<proc_macro2::TokenStream> {
    splice_core::HandlerName::parse(&literal.value())
        .map_err(|err| syn::Error::new_spanned(literal, err.to_string()))?;
    Ok(quote! {
        ::splice::HandlerName::from_static(#literal)
    })
}

use proc_macro::TokenStream;

extern crate proc_macro;

mod component;

#[proc_macro_derive(Component, attributes(component))]
pub fn component(input: TokenStream) -> TokenStream {
    component::derive(input.into()).unwrap_or_else(|err| err.to_compile_error()).into()
}

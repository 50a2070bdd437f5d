use proc_macro2::TokenStream;
use quote::quote;
use syn::{Error, Result};

pub(crate) fn derive(input: TokenStream) -> Result<TokenStream> {
    let input: syn::DeriveInput = syn::parse2(input)?;

    let mut uuid: Option<(proc_macro2::Span, u128)> = None;
    let mut name: Option<String> = None;
    let mut krate: syn::Path = syn::parse_quote!(::archec);

    for attr in &input.attrs {
        if !attr.path().is_ident("component") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("uuid") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                let value = parse_uuid(&lit.value()).ok_or_else(|| {
                    Error::new(
                        lit.span(),
                        "expected 32 hex digits or the 8-4-4-4-12 hyphenated form",
                    )
                })?;
                if uuid.replace((lit.span(), value)).is_some() {
                    return Err(Error::new(lit.span(), "only one `uuid` option is allowed"));
                }
                Ok(())
            } else if meta.path.is_ident("name") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("archec_as") {
                let content;
                syn::parenthesized!(content in meta.input);
                krate = content.call(syn::Path::parse_mod_style)?;
                Ok(())
            } else {
                Err(meta
                    .error("unknown `component` option; expected `uuid`, `name` or `archec_as`"))
            }
        })?;
    }

    let Some((uuid_span, uuid)) = uuid else {
        return Err(Error::new_spanned(
            &input.ident,
            "a component requires a stable identifier: #[component(uuid = \"...\")]",
        ));
    };

    let ident = &input.ident;
    let name = name.unwrap_or_else(|| ident.to_string());
    let uuid_lit = syn::LitInt::new(&format!("{uuid:#034x}u128"), uuid_span);
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        unsafe impl #impl_generics #krate::comp::Component for #ident #ty_generics #where_clause {
            const UUID: #krate::uuid::Uuid = #krate::uuid::Uuid::from_u128(#uuid_lit);
            const NAME: &'static str = #name;
        }
    })
}

/// Parses the textual UUID forms accepted by `archec::uuid::Uuid::parse_str`.
///
/// The logic is duplicated here because the codegen crate cannot depend on the
/// main crate.
fn parse_uuid(text: &str) -> Option<u128> {
    let bytes = text.as_bytes();

    let mut digits = [0u8; 32];
    match bytes.len() {
        32 => digits.copy_from_slice(bytes),
        36 => {
            if bytes[8] != b'-' || bytes[13] != b'-' || bytes[18] != b'-' || bytes[23] != b'-' {
                return None;
            }
            let mut cursor = 0;
            for (index, &byte) in bytes.iter().enumerate() {
                if matches!(index, 8 | 13 | 18 | 23) {
                    continue;
                }
                digits[cursor] = byte;
                cursor += 1;
            }
        }
        _ => return None,
    }

    let mut value: u128 = 0;
    for &digit in &digits {
        let nibble = match digit {
            b'0'..=b'9' => digit - b'0',
            b'a'..=b'f' => digit - b'a' + 10,
            b'A'..=b'F' => digit - b'A' + 10,
            _ => return None,
        };
        value = (value << 4) | u128::from(nibble);
    }
    Some(value)
}

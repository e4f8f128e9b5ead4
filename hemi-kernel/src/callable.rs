use proc_macro::TokenStream;
use proc_macro_error2::{abort, abort_call_site, emit_error};
use quote::quote;
use syn::spanned::Spanned;

#[derive(Default)]
struct CallableConfig {
    inline: bool,
}

impl syn::parse::Parse for CallableConfig {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(Self::default());
        }

        let ident: syn::Ident = input.parse()?;

        if ident != "inline" {
            return Err(syn::Error::new(
                ident.span(),
                "expected #[callable] or #[callable(inline)]",
            ));
        }

        Ok(Self { inline: true })
    }
}

pub fn callable(attr: TokenStream, func: TokenStream) -> TokenStream {
    let config: CallableConfig = match syn::parse(attr) {
        Ok(config) => config,
        Err(err) => abort!(err.span(), "{}", err),
    };

    // methods parse as functions too, a `self` receiver is accepted
    let func: syn::ItemFn = syn::parse(func).unwrap_or_else(|err| {
        abort_call_site!(
            "#[callable] must be wrapped around a function or method: {:?}",
            err
        )
    });

    if func.sig.asyncness.is_some() {
        abort!(
            func.sig.asyncness.span(),
            "Device-callable function must not be async."
        );
    }

    if func.sig.abi.is_some() {
        abort!(
            func.sig.abi.span(),
            "Device-callable function must not have an explicit ABI."
        );
    }

    if func.sig.variadic.is_some() {
        abort!(
            func.sig.variadic.span(),
            "Device-callable function must not be variadic."
        );
    }

    if config.inline {
        for attr in &func.attrs {
            if attr.path().is_ident("inline") {
                emit_error!(
                    attr.span(),
                    "#[callable(inline)] already decides the inlining, remove #[inline]."
                );
            }
        }
    }

    let inline_attrs = match (config.inline, cfg!(feature = "accelerator")) {
        (false, _) => quote! {},
        (true, true) => quote! {
            #[allow(clippy::inline_always)]
            #[inline(always)]
        },
        (true, false) => quote! { #[inline] },
    };

    quote! {
        #inline_attrs
        #func
    }
    .into()
}

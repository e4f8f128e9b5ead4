use proc_macro::TokenStream;
use proc_macro_error2::abort_call_site;
use quote::quote;

use super::entry_point_ident;

pub fn kernel_name(tokens: TokenStream) -> TokenStream {
    let mut path: syn::Path = syn::parse(tokens).unwrap_or_else(|err| {
        abort_call_site!(
            "kernel_name!(<kernel>) expects the path of a #[kernel] function: {:?}",
            err
        )
    });

    let Some(last) = path.segments.last_mut() else {
        abort_call_site!("kernel_name!(<kernel>) expects a non-empty path");
    };

    last.ident = entry_point_ident(&last.ident);

    quote!(#path).into()
}

use proc_macro::TokenStream;
use proc_macro_error2::abort;
use quote::quote;

use super::{entry_point_ident, parse::parse_kernel_fn};

pub fn kernel(attr: TokenStream, func: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        abort!(
            proc_macro2::TokenStream::from(attr),
            "#[kernel] does not take any arguments."
        );
    }

    let mut func = parse_kernel_fn(func);

    func.sig.ident = entry_point_ident(&func.sig.ident);

    // grid entry points are dispatched by the device and never inlined into
    //  the launching code
    let entry_point_attrs = if cfg!(feature = "accelerator") {
        quote! { #[inline(never)] }
    } else {
        quote! {}
    };

    quote! {
        #entry_point_attrs
        #func
    }
    .into()
}

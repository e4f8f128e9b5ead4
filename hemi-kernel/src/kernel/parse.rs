use proc_macro::TokenStream;
use proc_macro_error2::{abort, abort_call_site};
use syn::spanned::Spanned;

pub(super) fn parse_kernel_fn(tokens: TokenStream) -> syn::ItemFn {
    let func: syn::ItemFn = syn::parse(tokens).unwrap_or_else(|err| {
        abort_call_site!("#[kernel] must be wrapped around a function: {:?}", err)
    });

    if func.sig.constness.is_some() {
        abort!(
            func.sig.constness.span(),
            "Kernel function must not be const."
        );
    }

    if func.sig.asyncness.is_some() {
        abort!(
            func.sig.asyncness.span(),
            "Kernel function must not be async."
        );
    }

    if func.sig.abi.is_some() {
        abort!(
            func.sig.abi.span(),
            "Kernel function must not have an explicit ABI."
        );
    }

    if func.sig.variadic.is_some() {
        abort!(
            func.sig.variadic.span(),
            "Kernel function must not be variadic."
        );
    }

    if let syn::ReturnType::Type(_, ty) = &func.sig.output {
        if !matches!(&**ty, syn::Type::Tuple(tuple) if tuple.elems.is_empty()) {
            abort!(ty.span(), "Kernel function must return the unit type.");
        }
    }

    match func.sig.inputs.first() {
        None => abort!(
            func.sig.span(),
            "Kernel function must take the `&Thread` execution context as its first parameter."
        ),
        Some(syn::FnArg::Receiver(receiver)) => abort!(
            receiver.span(),
            "Kernel function must be a free function without a `self` parameter."
        ),
        Some(syn::FnArg::Typed(syn::PatType { ty, .. })) => {
            if !matches!(&**ty, syn::Type::Reference(syn::TypeReference { mutability: None, .. }))
            {
                abort!(
                    ty.span(),
                    "Kernel function must take the execution context by shared reference, \
                     i.e. `thread: &Thread`."
                );
            }
        },
    }

    if func.sig.inputs.len() > 13 {
        abort!(
            func.sig.inputs.span(),
            "Kernel function must not take more than 12 arguments besides the execution context."
        );
    }

    func
}

pub mod name;
pub mod wrapper;

mod parse;

const KERNEL_ENTRY_POINT_SUFFIX: &str = "_kernel";

fn entry_point_ident(name: &syn::Ident) -> syn::Ident {
    syn::Ident::new(&format!("{name}{KERNEL_ENTRY_POINT_SUFFIX}"), name.span())
}

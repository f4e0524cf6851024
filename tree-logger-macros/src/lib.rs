//! `tree-logger` macros.

use proc_macro::TokenStream;
#[cfg(feature = "attributes")]
pub(crate) type AttributeArgs = syn::punctuated::Punctuated<syn::NestedMeta, syn::Token![,]>;

#[cfg(feature = "attributes")]
mod attribute;
#[cfg(feature = "derive")]
mod derive;

/// Derives `tree_logger::Severity` for a fieldless enum.
///
/// Variants are declared from least to most detailed: each variant's parent
/// is the one declared before it, and the last variant is `ALL`.
///
/// * `#[severity(default)]` marks the variant used when a node's max detail
/// is reset. Without it, `ALL` is used.
/// * `#[severity(attention)]` marks variants that should stand out.
/// * `#[severity(label = "...")]` overrides the label, which is otherwise the
/// variant name in uppercase.
#[cfg(feature = "derive")]
#[proc_macro_derive(Severity, attributes(severity))]
pub fn severity(input: TokenStream) -> TokenStream {
    derive::severity(input)
}

/// Marks a test to run with a pretty-printing root as the current node,
/// writing through the test writer.
#[cfg(feature = "attributes")]
#[proc_macro_attribute]
pub fn test(args: TokenStream, item: TokenStream) -> TokenStream {
    attribute::test(args, item)
}

/// Marks a function to run with a pretty-printing root as the current node.
#[cfg(feature = "attributes")]
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    attribute::main(args, item)
}

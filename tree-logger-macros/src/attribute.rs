use crate::AttributeArgs;
use proc_macro::TokenStream;
use proc_macro2::{Ident, TokenStream as TokenStream2};
use quote::quote;
use syn::parse::Parser;

/// Accepted by `level = ".."`, least to most detailed.
const LEVELS: [&str; 7] = ["error", "warn", "info", "trace", "debug", "spam", "all"];

#[derive(Clone, Copy)]
enum Entry {
    Main,
    Test,
}

impl Entry {
    #[cfg(feature = "sync")]
    fn tokio_attribute(self) -> &'static str {
        match self {
            Entry::Main => "main",
            Entry::Test => "test",
        }
    }
}

pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    expand(Entry::Main, args, item)
}

pub fn test(args: TokenStream, item: TokenStream) -> TokenStream {
    expand(Entry::Test, args, item)
}

fn expand(entry: Entry, args: TokenStream, item: TokenStream) -> TokenStream {
    let rewritten = syn::parse::<syn::ItemFn>(item.clone())
        .and_then(|function| rewrite(entry, args, function));

    match rewritten {
        Ok(tokens) => tokens.into(),
        Err(err) => {
            // Keep the original item so the error is the only one reported.
            let mut tokens = item;
            tokens.extend(TokenStream::from(err.into_compile_error()));
            tokens
        }
    }
}

fn rewrite(entry: Entry, args: TokenStream, mut function: syn::ItemFn) -> syn::Result<TokenStream2> {
    if let Some(input) = function.sig.inputs.first() {
        return Err(syn::Error::new_spanned(
            input,
            "functions run under a root node can't take arguments",
        ));
    }

    if let Entry::Test = entry {
        if let Some(attr) = function.attrs.iter().find(|attr| attr.path.is_ident("test")) {
            return Err(syn::Error::new_spanned(
                attr,
                "#[tree_logger::test] already marks the function as a test",
            ));
        }
    }

    let root = RootArgs::parse(args)?.builder(entry);
    let block = &function.block;

    let body = match &function.sig.asyncness {
        Some(asyncness) => {
            require_tokio(entry, &function.attrs, asyncness)?;
            quote! { #root.in_future(async #block).await }
        }
        None => quote! { #root.in_scope(|| #block) },
    };

    let header = match (entry, &function.sig.asyncness) {
        (Entry::Test, None) => quote! { #[::core::prelude::v1::test] },
        _ => TokenStream2::new(),
    };

    let brace_token = function.block.brace_token;
    function.block = syn::parse2(quote! { { #body } })?;
    function.block.brace_token = brace_token;

    Ok(quote! {
        #header
        #function
    })
}

/// Async functions are driven by tokio, whose attribute must come after ours.
#[cfg(feature = "sync")]
fn require_tokio(
    entry: Entry,
    attrs: &[syn::Attribute],
    asyncness: &syn::Token![async],
) -> syn::Result<()> {
    let expected = ["tokio", entry.tokio_attribute()];
    let found = attrs.iter().any(|attr| {
        attr.path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .eq(expected.iter().copied())
    });

    if found {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            asyncness,
            format!(
                "async functions also need #[tokio::{}] below this attribute",
                entry.tokio_attribute()
            ),
        ))
    }
}

#[cfg(not(feature = "sync"))]
fn require_tokio(
    _entry: Entry,
    _attrs: &[syn::Attribute],
    asyncness: &syn::Token![async],
) -> syn::Result<()> {
    Err(syn::Error::new_spanned(
        asyncness,
        "async functions need the `sync` feature of tree-logger",
    ))
}

/// Arguments of `#[tree_logger::main]` and `#[tree_logger::test]`.
struct RootArgs {
    /// Builder method picking the formatter, `pretty` or `json`.
    format: Option<Ident>,
    /// Variant of `tree_logger::Level` to use as the max detail.
    level: Option<Ident>,
}

impl RootArgs {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let mut root = RootArgs {
            format: None,
            level: None,
        };

        for arg in AttributeArgs::parse_terminated.parse(args)? {
            let pair = match arg {
                syn::NestedMeta::Meta(syn::Meta::NameValue(pair)) => pair,
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        r#"expected `fmt = ".."` or `level = ".."`"#,
                    ))
                }
            };
            let value = match &pair.lit {
                syn::Lit::Str(value) => value,
                other => return Err(syn::Error::new_spanned(other, "expected a string literal")),
            };

            if pair.path.is_ident("fmt") {
                let method = match value.value().as_str() {
                    "pretty" => "pretty",
                    "json" => "json",
                    other => {
                        return Err(syn::Error::new_spanned(
                            value,
                            format!("unknown format `{}`, expected `pretty` or `json`", other),
                        ))
                    }
                };
                set_once(&mut root.format, Ident::new(method, value.span()), &pair)?;
            } else if pair.path.is_ident("level") {
                let name = value.value().to_lowercase();
                if !LEVELS.contains(&name.as_str()) {
                    return Err(syn::Error::new_spanned(
                        value,
                        format!(
                            "unknown level `{}`, expected one of: {}",
                            value.value(),
                            LEVELS.join(", ")
                        ),
                    ));
                }
                let variant = Ident::new(&name.to_uppercase(), value.span());
                set_once(&mut root.level, variant, &pair)?;
            } else {
                return Err(syn::Error::new_spanned(
                    &pair.path,
                    "unknown argument, expected `fmt` or `level`",
                ));
            }
        }

        Ok(root)
    }

    fn builder(self, entry: Entry) -> TokenStream2 {
        let format = self.format.map(|method| quote! { .#method() });
        let writer = match entry {
            Entry::Test => Some(quote! { .with_test_writer() }),
            Entry::Main => None,
        };
        let level = self
            .level
            .map(|level| quote! { .max_detail(::tree_logger::Level::#level) });

        quote! { ::tree_logger::builder() #format #writer #level }
    }
}

fn set_once(slot: &mut Option<Ident>, value: Ident, pair: &syn::MetaNameValue) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new_spanned(pair, "argument given more than once"));
    }
    *slot = Some(value);
    Ok(())
}

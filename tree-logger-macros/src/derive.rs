use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

pub fn severity(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let res = match &input.data {
        syn::Data::Enum(data) => impl_enum(data, &input),
        syn::Data::Struct(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "struct severities are not supported, use a fieldless enum",
        )),
        syn::Data::Union(_) => Err(syn::Error::new_spanned(
            &input.ident,
            "union severities are not supported, use a fieldless enum",
        )),
    };

    res.unwrap_or_else(|err| err.to_compile_error()).into()
}

struct SeverityRepr {
    ident: syn::Ident,
    label: String,
    default: bool,
    attention: bool,
}

fn parse_severity_attr(variant: &syn::Variant) -> syn::Result<SeverityRepr> {
    if !matches!(variant.fields, syn::Fields::Unit) {
        return Err(syn::Error::new_spanned(&variant.fields, "expected unit variant"));
    }

    let mut repr = SeverityRepr {
        ident: variant.ident.clone(),
        label: variant.ident.to_string().to_uppercase(),
        default: false,
        attention: false,
    };
    let mut label = None;

    for attr in variant.attrs.iter() {
        if !attr.path.is_ident("severity") {
            continue;
        }

        let list = match attr.parse_meta()? {
            syn::Meta::List(list) => list,
            _ => {
                return Err(syn::Error::new_spanned(
                    attr,
                    r#"#[severity(..)] attribute expects a list of arguments, try #[severity(label = "..")]"#,
                ))
            }
        };

        for field in list.nested.iter() {
            match field {
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("default") => {
                    if repr.default {
                        return Err(syn::Error::new_spanned(path, "defined `default` multiple times"));
                    }
                    repr.default = true;
                }
                syn::NestedMeta::Meta(syn::Meta::Path(path)) if path.is_ident("attention") => {
                    if repr.attention {
                        return Err(syn::Error::new_spanned(
                            path,
                            "defined `attention` multiple times",
                        ));
                    }
                    repr.attention = true;
                }
                syn::NestedMeta::Meta(syn::Meta::NameValue(namevalue))
                    if namevalue.path.is_ident("label") =>
                {
                    if label.is_some() {
                        return Err(syn::Error::new_spanned(
                            namevalue,
                            "defined `label` multiple times",
                        ));
                    } else if let syn::Lit::Str(litstr) = &namevalue.lit {
                        label = Some(litstr.value());
                    } else {
                        return Err(syn::Error::new_spanned(
                            namevalue.lit.clone(),
                            "`label` accepts a string literal argument",
                        ));
                    }
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "Unknown argument; expected one of: `default`, `attention`, or `label`",
                    ))
                }
            }
        }
    }

    if let Some(label) = label {
        repr.label = label;
    }

    Ok(repr)
}

fn impl_enum(data: &syn::DataEnum, input: &syn::DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "generic severities are not supported",
        ));
    }

    let severities = data
        .variants
        .iter()
        .map(parse_severity_attr)
        .collect::<syn::Result<Vec<SeverityRepr>>>()?;

    let all = match severities.last() {
        Some(last) => &last.ident,
        None => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "a severity needs at least one variant",
            ))
        }
    };

    let mut defaults = severities.iter().filter(|severity| severity.default);
    let default = match (defaults.next(), defaults.next()) {
        (None, _) => all,
        (Some(default), None) => &default.ident,
        (Some(_), Some(second)) => {
            return Err(syn::Error::new_spanned(
                &second.ident,
                "only one variant can be marked #[severity(default)]",
            ))
        }
    };

    let name = &input.ident;
    let variants: Vec<&syn::Ident> = severities.iter().map(|severity| &severity.ident).collect();

    // The least detailed variant tops the chain.
    let first = variants[0];
    let parent_arms = std::iter::once(quote! { #name::#first => ::core::option::Option::None })
        .chain(variants.windows(2).map(|pair| {
            let (parent, child) = (pair[0], pair[1]);
            quote! { #name::#child => ::core::option::Option::Some(#name::#parent) }
        }));

    let label_arms = severities.iter().map(|severity| {
        let ident = &severity.ident;
        let label = &severity.label;
        quote! { #name::#ident => #label }
    });

    let attention: Vec<&syn::Ident> = severities
        .iter()
        .filter(|severity| severity.attention)
        .map(|severity| &severity.ident)
        .collect();
    let needs_attention = if attention.is_empty() {
        quote! { false }
    } else {
        quote! { ::core::matches!(self, #( #name::#attention )|*) }
    };

    Ok(quote! {
        impl ::tree_logger::Severity for #name {
            const ALL: Self = #name::#all;
            const DEFAULT: Self = #name::#default;

            fn parent(self) -> ::core::option::Option<Self> {
                match self {
                    #( #parent_arms, )*
                }
            }

            fn label(self) -> &'static str {
                match self {
                    #( #label_arms, )*
                }
            }

            fn needs_attention(self) -> bool {
                #needs_attention
            }
        }
    })
}

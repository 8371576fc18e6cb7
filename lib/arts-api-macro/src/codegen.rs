//! Code generation for `#[api_module]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Ident, Type, Visibility};

use crate::attrs::{MethodParam, ParamKind, ResponseKind};
use crate::expand::TraitMethodInfo;

/// Generate the module struct with its constructor and endpoint table.
pub fn generate_module_struct(
    vis: &Visibility,
    struct_name: &Ident,
    module: &str,
    endpoints: &[TokenStream],
) -> TokenStream {
    let doc = format!("Calls of the `{module}` module, sharing the client's request engine.");

    quote! {
        #[doc = #doc]
        #[derive(Clone)]
        #vis struct #struct_name {
            engine: ::arts_api::Engine,
        }

        impl #struct_name {
            /// Every endpoint of this module, in declaration order.
            pub const ENDPOINTS: &'static [::arts_api::Endpoint] = &[#(#endpoints),*];

            /// Create the module over a shared engine.
            #[must_use]
            pub fn new(engine: ::arts_api::Engine) -> Self {
                Self { engine }
            }
        }

        impl ::std::fmt::Debug for #struct_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.debug_struct(stringify!(#struct_name))
                    .field("module", &#module)
                    .finish_non_exhaustive()
            }
        }
    }
}

/// Generate the `Endpoint` constant expression of a method.
pub fn generate_endpoint(module: &str, method: &TraitMethodInfo) -> TokenStream {
    let name = method.sig.ident.to_string();
    let verb = format_ident!("{}", method.http_method.as_str());
    let path = &method.path;
    let auth = format_ident!("{}", method.options.auth.as_str());
    let response = format_ident!("{}", method.options.response.as_str());

    quote! {
        ::arts_api::Endpoint::new(#module, #name, ::arts_api::Method::#verb, #path)
            .auth(::arts_api::AuthMode::#auth)
            .response(::arts_api::ResponseMode::#response)
    }
}

/// Generate the path rendering statement.
///
/// Each value is converted with `ToString` and percent-encoded on its own.
pub fn generate_path_code(params: &[MethodParam]) -> TokenStream {
    let substitutions: Vec<_> = params
        .iter()
        .filter_map(|p| match &p.kind {
            ParamKind::Path(alias) => {
                let name = &p.name;
                let key = alias.clone().unwrap_or_else(|| name.to_string());
                Some(quote! { (#key, ::std::string::ToString::to_string(&#name)) })
            }
            _ => None,
        })
        .collect();

    quote! {
        let path = ENDPOINT.render_path(&[#(#substitutions),*]);
    }
}

/// Generate the `RequestOptions` chain for query, header, body and form parameters.
pub fn generate_options_code(params: &[MethodParam]) -> TokenStream {
    let calls: Vec<_> = params
        .iter()
        .filter_map(|p| {
            let name = &p.name;
            match &p.kind {
                ParamKind::Path(_) => None,
                ParamKind::Query(options) if options.flatten => Some(quote! { .query(&#name) }),
                ParamKind::Query(options) => {
                    let key = options.alias.clone().unwrap_or_else(|| name.to_string());
                    Some(quote! { .query_param(#key, &#name) })
                }
                ParamKind::Header(header) => Some(quote! {
                    .header(#header, ::std::string::ToString::to_string(&#name))
                }),
                ParamKind::Body => Some(quote! { .json(&#name) }),
                ParamKind::Multipart => Some(quote! { .multipart(#name) }),
            }
        })
        .collect();

    quote! {
        let options = ::arts_api::RequestOptions::new() #(#calls)*;
    }
}

/// Generate the engine invocation matching the response mode.
pub fn generate_invoke_code(response: ResponseKind, returns_unit: bool) -> TokenStream {
    match response {
        ResponseKind::Json if returns_unit => quote! {
            self.engine
                .invoke_json::<::arts_api::serde_json::Value>(&ENDPOINT, path, options)
                .await
                .map(|_| ())
        },
        ResponseKind::Json => quote! {
            self.engine.invoke_json(&ENDPOINT, path, options).await
        },
        ResponseKind::Binary => quote! {
            self.engine.invoke_bytes(&ENDPOINT, path, options).await
        },
        ResponseKind::Raw => quote! {
            self.engine.invoke_raw(&ENDPOINT, path, options).await
        },
    }
}

/// Returns true for `Result<()>` (any `Result` path).
pub fn returns_unit(output: &syn::ReturnType) -> bool {
    let syn::ReturnType::Type(_, ty) = output else {
        return true;
    };
    unwrap_result_type(ty).is_some_and(is_unit_type)
}

fn is_unit_type(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn unwrap_result_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Result"
        && let syn::PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(syn::GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

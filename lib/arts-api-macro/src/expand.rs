//! Expansion of `#[api_module]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ItemTrait, Pat, TraitItem, TraitItemFn, parse2};

use crate::attrs::{
    HttpMethod, MethodOptions, MethodParam, ParamKind, extract_path_placeholders,
    parse_method_options, parse_param_attr,
};
use crate::codegen::{
    generate_endpoint, generate_invoke_code, generate_module_struct, generate_options_code,
    generate_path_code, returns_unit,
};

/// Parameter attributes stripped from generated signatures.
const PARAM_ATTRS: &[&str] = &["path", "query", "header", "body", "multipart"];

/// Arguments of `#[api_module(..)]`.
#[derive(Debug, Default)]
pub struct ModuleArgs {
    /// Generated struct name.
    pub name: Option<String>,
    /// Module name used in endpoint descriptors and logs.
    pub module: Option<String>,
}

fn parse_module_args(attr: TokenStream) -> syn::Result<ModuleArgs> {
    let mut args = ModuleArgs::default();

    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("name") {
            let value: syn::LitStr = meta.value()?.parse()?;
            args.name = Some(value.value());
            Ok(())
        } else if meta.path.is_ident("module") {
            let value: syn::LitStr = meta.value()?.parse()?;
            args.module = Some(value.value());
            Ok(())
        } else {
            Err(meta.error("unsupported api_module attribute, expected `name` or `module`"))
        }
    });

    syn::parse::Parser::parse2(parser, attr)?;
    Ok(args)
}

/// Trait name without its `Api` suffix: `UserApi` -> `User`.
fn base_name(trait_name: &Ident) -> String {
    let name = trait_name.to_string();
    match name.strip_suffix("Api") {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => name,
    }
}

/// Information about a parsed trait method.
pub struct TraitMethodInfo {
    /// The method signature, as declared.
    pub sig: syn::Signature,
    /// The HTTP method.
    pub http_method: HttpMethod,
    /// The path template.
    pub path: String,
    /// Parsed parameters.
    pub params: Vec<MethodParam>,
    /// Documentation attributes.
    pub docs: Vec<syn::Attribute>,
    /// Auth and response options.
    pub options: MethodOptions,
}

/// Expand `#[api_module]` on a trait.
pub fn expand_api_module(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream> {
    let trait_def: ItemTrait = parse2(item)?;
    let args = parse_module_args(attr)?;

    let trait_name = &trait_def.ident;
    let vis = &trait_def.vis;

    let base = base_name(trait_name);
    let struct_name = args
        .name
        .as_deref()
        .map_or_else(|| format_ident!("{}Module", base), |name| format_ident!("{}", name));
    let module = args.module.unwrap_or_else(|| base.to_lowercase());

    let methods = extract_trait_methods(&trait_def)?;
    let clean_trait = generate_clean_trait(vis, trait_name, &methods, &trait_def);

    let endpoints: Vec<_> = methods
        .iter()
        .map(|m| generate_endpoint(&module, m))
        .collect();
    let module_struct = generate_module_struct(vis, &struct_name, &module, &endpoints);
    let trait_impl = generate_trait_impl(trait_name, &struct_name, &module, &methods);

    Ok(quote! {
        #clean_trait
        #module_struct
        #trait_impl
    })
}

fn extract_trait_methods(trait_def: &ItemTrait) -> syn::Result<Vec<TraitMethodInfo>> {
    let mut methods = Vec::new();

    for item in &trait_def.items {
        let TraitItem::Fn(method) = item else {
            return Err(syn::Error::new_spanned(
                item,
                "api_module traits may only contain endpoint methods",
            ));
        };

        let Some((http_method, path)) = find_http_attribute(&method.attrs)? else {
            return Err(syn::Error::new_spanned(
                &method.sig,
                "missing HTTP method attribute: #[get], #[post], #[put], #[delete] or #[patch]",
            ));
        };

        if method.sig.asyncness.is_none() {
            return Err(syn::Error::new_spanned(
                &method.sig,
                "endpoint methods must be `async fn`",
            ));
        }

        let params = parse_trait_method_params(method, &path, http_method)?;
        let docs = method
            .attrs
            .iter()
            .filter(|a| a.path().is_ident("doc"))
            .cloned()
            .collect();
        let options = parse_method_options(&method.attrs)?;

        methods.push(TraitMethodInfo {
            sig: method.sig.clone(),
            http_method,
            path,
            params,
            docs,
            options,
        });
    }

    Ok(methods)
}

fn find_http_attribute(attrs: &[syn::Attribute]) -> syn::Result<Option<(HttpMethod, String)>> {
    for attr in attrs {
        let Some(ident) = attr.path().get_ident() else {
            continue;
        };

        if let Some(method) = HttpMethod::from_attr(&ident.to_string()) {
            let path: syn::LitStr = attr.parse_args()?;
            let path = path.value();
            if !path.starts_with('/') {
                return Err(syn::Error::new_spanned(attr, "path must start with `/`"));
            }
            return Ok(Some((method, path)));
        }
    }

    Ok(None)
}

/// Classify method parameters.
///
/// 1. Explicit attributes (`#[path]`, `#[query]`, `#[body]`, ...) take precedence
/// 2. Parameters named after a path placeholder are path parameters
/// 3. On POST, PUT and PATCH a single remaining parameter is the JSON body
/// 4. Anything else is an error
fn parse_trait_method_params(
    method: &TraitItemFn,
    path_template: &str,
    http_method: HttpMethod,
) -> syn::Result<Vec<MethodParam>> {
    let placeholders = extract_path_placeholders(path_template);
    let mut params = Vec::new();
    let mut unclassified: Vec<(Ident, &syn::PatType)> = Vec::new();

    for input in &method.sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let Pat::Ident(pat_ident) = pat_type.pat.as_ref() else {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "endpoint parameters must be plain identifiers",
            ));
        };
        let name = pat_ident.ident.clone();

        let mut kind = None;
        for attr in &pat_type.attrs {
            if let Some(found) = parse_param_attr(attr)? {
                kind = Some(found);
                break;
            }
        }

        if let Some(kind) = kind {
            params.push(MethodParam { name, kind });
        } else if placeholders.contains(&name.to_string()) {
            params.push(MethodParam {
                name,
                kind: ParamKind::Path(None),
            });
        } else {
            unclassified.push((name, pat_type));
        }
    }

    match unclassified.len() {
        0 => {}
        1 if http_method.supports_body() => {
            if let Some((name, _)) = unclassified.into_iter().next() {
                params.push(MethodParam {
                    name,
                    kind: ParamKind::Body,
                });
            }
        }
        _ => {
            if let Some((name, pat_type)) = unclassified.first() {
                return Err(syn::Error::new_spanned(
                    pat_type,
                    format!(
                        "parameter '{name}' does not match any path placeholder \
                         (available: {placeholders:?}). Add #[query], #[body] or another \
                         explicit attribute."
                    ),
                ));
            }
        }
    }

    check_payload(method, &params)?;
    check_placeholders(method, &placeholders, &params)?;

    Ok(params)
}

/// A call carries at most one JSON body or one form, never both.
fn check_payload(method: &TraitItemFn, params: &[MethodParam]) -> syn::Result<()> {
    let payloads = params
        .iter()
        .filter(|p| matches!(p.kind, ParamKind::Body | ParamKind::Multipart))
        .count();

    if payloads > 1 {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "an endpoint takes at most one #[body] or #[multipart] parameter",
        ));
    }
    Ok(())
}

/// Every placeholder needs exactly one path parameter.
fn check_placeholders(
    method: &TraitItemFn,
    placeholders: &[String],
    params: &[MethodParam],
) -> syn::Result<()> {
    let path_keys: Vec<String> = params
        .iter()
        .filter_map(|p| match &p.kind {
            ParamKind::Path(alias) => Some(alias.clone().unwrap_or_else(|| p.name.to_string())),
            _ => None,
        })
        .collect();

    if let Some(missing) = placeholders.iter().find(|ph| !path_keys.contains(ph)) {
        return Err(syn::Error::new_spanned(
            &method.sig,
            format!("no parameter provides path placeholder `{{{missing}}}`"),
        ));
    }
    if let Some(extra) = path_keys.iter().find(|key| !placeholders.contains(key)) {
        return Err(syn::Error::new_spanned(
            &method.sig,
            format!("path parameter `{extra}` has no matching placeholder"),
        ));
    }
    Ok(())
}

fn generate_clean_trait(
    vis: &syn::Visibility,
    name: &Ident,
    methods: &[TraitMethodInfo],
    original: &ItemTrait,
) -> TokenStream {
    let trait_attrs: Vec<_> = original
        .attrs
        .iter()
        .filter(|a| {
            let path = a.path();
            path.is_ident("doc") || path.is_ident("allow") || path.is_ident("cfg")
        })
        .collect();

    let method_signatures: Vec<_> = methods
        .iter()
        .map(|m| {
            let docs = &m.docs;
            let sig = strip_param_attrs(&m.sig);
            quote! {
                #(#docs)*
                #sig;
            }
        })
        .collect();

    quote! {
        #(#trait_attrs)*
        #[allow(async_fn_in_trait)]
        #vis trait #name {
            #(#method_signatures)*
        }
    }
}

fn is_param_attr(attr: &syn::Attribute) -> bool {
    let path = attr.path();
    PARAM_ATTRS.iter().any(|name| path.is_ident(name))
}

fn strip_param_attrs(sig: &syn::Signature) -> syn::Signature {
    let mut clean_sig = sig.clone();
    for arg in &mut clean_sig.inputs {
        if let FnArg::Typed(pat_type) = arg {
            pat_type.attrs.retain(|attr| !is_param_attr(attr));
        }
    }
    clean_sig
}

fn generate_trait_impl(
    trait_name: &Ident,
    struct_name: &Ident,
    module: &str,
    methods: &[TraitMethodInfo],
) -> TokenStream {
    let method_impls: Vec<_> = methods
        .iter()
        .map(|m| {
            let sig = strip_param_attrs(&m.sig);
            let endpoint = generate_endpoint(module, m);
            let path_code = generate_path_code(&m.params);
            let options_code = generate_options_code(&m.params);
            let invoke_code = generate_invoke_code(m.options.response, returns_unit(&m.sig.output));

            quote! {
                #sig {
                    const ENDPOINT: ::arts_api::Endpoint = #endpoint;
                    #path_code
                    #options_code
                    #invoke_code
                }
            }
        })
        .collect();

    quote! {
        impl #trait_name for #struct_name {
            #(#method_impls)*
        }
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn expand(attr: TokenStream, item: TokenStream) -> Result<String, String> {
        expand_api_module(attr, item)
            .map(|tokens| tokens.to_string())
            .map_err(|e| e.to_string())
    }

    #[test]
    fn parse_module_args_defaults() {
        let args = parse_module_args(quote! {}).expect("parse");
        assert!(args.name.is_none());
        assert!(args.module.is_none());

        let args = parse_module_args(quote! { name = "StaticModule", module = "static" })
            .expect("parse");
        assert_eq!(args.name.as_deref(), Some("StaticModule"));
        assert_eq!(args.module.as_deref(), Some("static"));

        assert!(parse_module_args(quote! { url = "x" }).is_err());
    }

    #[test]
    fn base_name_strips_api_suffix() {
        assert_eq!(base_name(&format_ident!("UserApi")), "User");
        assert_eq!(base_name(&format_ident!("Api")), "Api");
        assert_eq!(base_name(&format_ident!("Health")), "Health");
    }

    #[test]
    fn expands_struct_and_endpoint_table() {
        let code = expand(
            quote! {},
            quote! {
                pub trait WorkApi {
                    /// Like a work.
                    #[post("/arts/work/{id}/like")]
                    #[auth(required)]
                    async fn like(&self, id: &str) -> arts_api::Result<()>;
                }
            },
        )
        .expect("expand");

        assert!(code.contains("pub struct WorkModule"), "{code}");
        assert!(code.contains("\"work\" , \"like\""), "{code}");
        assert!(code.contains("AuthMode :: Required"), "{code}");
        assert!(code.contains("impl WorkApi for WorkModule"), "{code}");
        assert!(!code.contains("# [post"), "{code}");
        assert!(!code.contains("# [auth"), "{code}");
    }

    #[test]
    fn unattributed_param_becomes_body_on_post() {
        let code = expand(
            quote! {},
            quote! {
                pub trait NodeApi {
                    #[post("/arts/node/purchase")]
                    async fn purchase(&self, order: &PurchaseNode) -> arts_api::Result<Receipt>;
                }
            },
        )
        .expect("expand");

        assert!(code.contains(". json (& order)"), "{code}");
    }

    #[test]
    fn unattributed_param_on_get_is_an_error() {
        let err = expand(
            quote! {},
            quote! {
                pub trait WorkApi {
                    #[get("/arts/work/list")]
                    async fn list(&self, page: u32) -> arts_api::Result<Page>;
                }
            },
        )
        .expect_err("should fail");

        assert!(err.contains("does not match any path placeholder"));
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let err = expand(
            quote! {},
            quote! {
                pub trait WorkApi {
                    #[get("/arts/work/{id}")]
                    async fn detail(&self) -> arts_api::Result<Work>;
                }
            },
        )
        .expect_err("should fail");

        assert!(err.contains("`{id}`"), "{err}");
    }

    #[test]
    fn body_and_multipart_together_is_an_error() {
        let err = expand(
            quote! {},
            quote! {
                pub trait FileApi {
                    #[post("/arts/file/upload")]
                    async fn upload(&self, #[body] meta: &Meta, #[multipart] form: Form) -> arts_api::Result<()>;
                }
            },
        )
        .expect_err("should fail");

        assert!(err.contains("at most one"), "{err}");
    }

    #[test]
    fn methods_must_be_async_and_annotated() {
        let err = expand(
            quote! {},
            quote! {
                pub trait HealthApi {
                    #[get("/arts/health")]
                    fn ping(&self) -> arts_api::Result<()>;
                }
            },
        )
        .expect_err("should fail");
        assert!(err.contains("async fn"));

        let err = expand(
            quote! {},
            quote! {
                pub trait HealthApi {
                    async fn ping(&self) -> arts_api::Result<()>;
                }
            },
        )
        .expect_err("should fail");
        assert!(err.contains("missing HTTP method attribute"));
    }
}

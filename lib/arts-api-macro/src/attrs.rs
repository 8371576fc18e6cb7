//! Attribute parsing for `#[api_module]` traits.

use syn::Ident;

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    /// Variant name of `arts_api::Method`.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Post => "Post",
            Self::Put => "Put",
            Self::Delete => "Delete",
            Self::Patch => "Patch",
        }
    }

    /// Method attribute name (`get`, `post`, ...) to method.
    #[must_use]
    pub(crate) fn from_attr(ident: &str) -> Option<Self> {
        match ident {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            _ => None,
        }
    }

    /// Returns true if an unattributed parameter may become the JSON body.
    #[must_use]
    pub(crate) const fn supports_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

/// Auth requirement of an endpoint, mirrors `arts_api::AuthMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum AuthKind {
    Required,
    #[default]
    Optional,
    None,
}

impl AuthKind {
    /// Variant name of `arts_api::AuthMode`.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::Optional => "Optional",
            Self::None => "None",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// How the response is consumed, mirrors `arts_api::ResponseMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ResponseKind {
    #[default]
    Json,
    Binary,
    Raw,
}

impl ResponseKind {
    /// Variant name of `arts_api::ResponseMode`.
    #[must_use]
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "Json",
            Self::Binary => "Binary",
            Self::Raw => "Raw",
        }
    }
}

/// Method-level options.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MethodOptions {
    pub(crate) auth: AuthKind,
    pub(crate) response: ResponseKind,
}

/// Parse `#[auth(..)]`, `#[binary]` and `#[raw]`.
pub(crate) fn parse_method_options(attrs: &[syn::Attribute]) -> syn::Result<MethodOptions> {
    let mut options = MethodOptions::default();

    for attr in attrs {
        let path = attr.path();

        if path.is_ident("auth") {
            let mode: Ident = attr.parse_args()?;
            options.auth = AuthKind::parse(&mode.to_string()).ok_or_else(|| {
                syn::Error::new_spanned(
                    &mode,
                    "unknown auth mode. Expected: required, optional or none",
                )
            })?;
        } else if path.is_ident("binary") {
            options.response = ResponseKind::Binary;
        } else if path.is_ident("raw") {
            options.response = ResponseKind::Raw;
        }
    }

    Ok(options)
}

/// Parameter kind for method arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParamKind {
    /// `#[path]` or `#[path("id")]`.
    Path(Option<String>),
    /// `#[query]`, `#[query("pageSize")]` or `#[query(flatten)]`.
    Query(QueryOptions),
    /// `#[header("X-Device")]`.
    Header(String),
    /// `#[body]`.
    Body,
    /// `#[multipart]`, expects an `arts_api::Form`.
    Multipart,
}

/// Query parameter options.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct QueryOptions {
    /// Parameter name override.
    pub(crate) alias: Option<String>,
    /// Merge the fields of a struct instead of adding one parameter.
    pub(crate) flatten: bool,
}

/// A parsed method parameter.
#[derive(Debug)]
pub(crate) struct MethodParam {
    pub(crate) name: Ident,
    pub(crate) kind: ParamKind,
}

/// Parse a parameter attribute.
pub(crate) fn parse_param_attr(attr: &syn::Attribute) -> syn::Result<Option<ParamKind>> {
    let path = attr.path();

    if path.is_ident("path") {
        return Ok(Some(ParamKind::Path(parse_optional_string_arg(attr)?)));
    }

    if path.is_ident("query") {
        return parse_query_options(attr).map(|options| Some(ParamKind::Query(options)));
    }

    if path.is_ident("header") {
        let name = parse_optional_string_arg(attr)?
            .ok_or_else(|| syn::Error::new_spanned(attr, "expected #[header(\"Name\")]"))?;
        return Ok(Some(ParamKind::Header(name)));
    }

    if path.is_ident("body") {
        return Ok(Some(ParamKind::Body));
    }

    if path.is_ident("multipart") {
        return Ok(Some(ParamKind::Multipart));
    }

    Ok(None)
}

fn parse_query_options(attr: &syn::Attribute) -> syn::Result<QueryOptions> {
    let mut options = QueryOptions::default();

    if let syn::Meta::List(meta_list) = &attr.meta {
        if let Ok(str_lit) = syn::parse2::<syn::LitStr>(meta_list.tokens.clone()) {
            options.alias = Some(str_lit.value());
            return Ok(options);
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("flatten") {
                options.flatten = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.alias = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `flatten` or `rename = \"..\"`"))
            }
        })?;
    }

    Ok(options)
}

fn parse_optional_string_arg(attr: &syn::Attribute) -> syn::Result<Option<String>> {
    match &attr.meta {
        syn::Meta::List(meta_list) => {
            let str_lit: syn::LitStr = syn::parse2(meta_list.tokens.clone())?;
            Ok(Some(str_lit.value()))
        }
        _ => Ok(None),
    }
}

/// Extract placeholder names from a path template.
///
/// E.g., `/arts/admin/work/{id}/review` returns `["id"]`
#[must_use]
pub(crate) fn extract_path_placeholders(path: &str) -> Vec<String> {
    let mut placeholders = Vec::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        if c == '{' {
            let name: String = chars.by_ref().take_while(|&next| next != '}').collect();
            if !name.is_empty() {
                placeholders.push(name);
            }
        }
    }
    placeholders
}

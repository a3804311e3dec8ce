use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Expr, Fields, LitStr};

/// Derive macro that describes a struct as a configuration class
///
/// Every named field becomes a configuration field. Its declared type is
/// taken from the Rust type: `String`, `bool`, the integer and float
/// primitives, `Option` of those, and any other `#[derive(Config)]` struct
/// (a nested configuration, built from its own fields).
///
/// Usage:
/// ```ignore
/// #[derive(Config)]
/// #[config(name = "Server")]
/// struct ServerConfig {
///     // Read SERVER_HOST, else fall back to "localhost"
///     #[config(env = "SERVER_HOST", default = "localhost")]
///     host: String,
///
///     // Read PORT (derived from the field name)
///     #[config(env, default = "8080")]
///     port: u16,
///
///     // Any value source, tried in attribute order
///     #[config(source = vault(), env)]
///     token: Option<String>,
///
///     // A custom parser takes over coercion for any type
///     #[config(env, parser = parse_tags)]
///     tags: Vec<String>,
///
///     // Nested configuration: no default or source allowed
///     database: DatabaseConfig,
///
///     // Not a configuration field, filled with Default::default()
///     #[config(skip)]
///     started_at: Option<std::time::Instant>,
/// }
/// ```
///
/// Attribute misuse that only the builder can judge (a default on a nested
/// field, an unsupported type) is reported when the config is built.
#[proc_macro_derive(Config, attributes(config))]
pub fn derive_config(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    input.span(),
                    "Config can only be derived for structs with named fields",
                ));
            }
        },
        _ => return Err(syn::Error::new(input.span(), "Config can only be derived for structs")),
    };

    let class_name = extract_class_name(&input.attrs)?.unwrap_or_else(|| ident.to_string());

    let mut descriptors = Vec::new();
    let mut initializers = Vec::new();

    for field in fields {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let name = field_ident.unraw().to_string();
        let options = FieldOptions::from_attrs(&field.attrs)?;

        if options.skip {
            initializers.push(quote! {
                #field_ident: ::core::default::Default::default()
            });
            continue;
        }

        let declared_type = if options.parser.is_some() {
            let type_name = quote!(#ty).to_string().replace(' ', "");
            quote! { ::cfgbind_core::DeclaredType::unsupported(#type_name) }
        } else {
            quote! { <#ty as ::cfgbind_core::typed::FieldType>::declared_type() }
        };

        let sources = options.sources.iter().map(|source| match source {
            SourceOption::DerivedEnv => quote! { .source(::cfgbind_core::EnvSource::derived()) },
            SourceOption::NamedEnv(variable) => quote! { .source(::cfgbind_core::EnvSource::named(#variable)) },
            SourceOption::Expr(expr) => quote! { .source(#expr) },
        });

        let default = options.default.as_ref().map(|raw| quote! { .default_value(#raw) });

        let parser = options.parser.as_ref().map(|parser| {
            quote! { .parser(::cfgbind_core::FieldParser::new::<#ty, _, _>(#parser)) }
        });

        descriptors.push(quote! {
            .field(
                ::cfgbind_core::FieldDescriptor::new(#name, #declared_type)
                    #(#sources)*
                    #default
                    #parser
            )
        });

        let convert = if options.parser.is_some() {
            quote! { ::cfgbind_core::typed::custom_from_value::<#ty>(#name, instance.take(#name))? }
        } else {
            quote! { <#ty as ::cfgbind_core::typed::FromConfigValue>::from_config_value(#name, instance.take(#name))? }
        };
        initializers.push(quote! { #field_ident: #convert });
    }

    Ok(quote! {
        impl #impl_generics ::cfgbind_core::typed::Config for #ident #ty_generics #where_clause {
            fn config_class() -> ::cfgbind_core::ConfigClass {
                ::cfgbind_core::ConfigClass::new(#class_name)
                    #(#descriptors)*
            }

            fn from_instance(
                mut instance: ::cfgbind_core::ConfigInstance,
            ) -> ::cfgbind_core::ConfigResult<Self> {
                ::core::result::Result::Ok(Self {
                    #(#initializers),*
                })
            }
        }

        impl #impl_generics ::cfgbind_core::typed::FieldType for #ident #ty_generics #where_clause {
            fn declared_type() -> ::cfgbind_core::DeclaredType {
                ::cfgbind_core::DeclaredType::Nested(
                    <Self as ::cfgbind_core::typed::Config>::config_class,
                )
            }
        }

        impl #impl_generics ::cfgbind_core::typed::FromConfigValue for #ident #ty_generics #where_clause {
            fn from_config_value(
                field: &str,
                value: ::cfgbind_core::ConfigValue,
            ) -> ::cfgbind_core::ConfigResult<Self> {
                ::cfgbind_core::typed::nested_from_value::<Self>(field, value)
            }
        }
    })
}

/// Read `#[config(name = "...")]` from the container attributes
fn extract_class_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("config")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unknown container attribute, expected `name`"))
            }
        })?;
    }
    Ok(name)
}

enum SourceOption {
    DerivedEnv,
    NamedEnv(LitStr),
    Expr(Expr),
}

/// Parsed `#[config(...)]` field attributes
///
/// Sources keep the order they were written in, across repeated attributes.
#[derive(Default)]
struct FieldOptions {
    sources: Vec<SourceOption>,
    default: Option<LitStr>,
    parser: Option<Expr>,
    skip: bool,
}

impl FieldOptions {
    fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = FieldOptions::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("config")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("env") {
                    if meta.input.peek(syn::Token![=]) {
                        options.sources.push(SourceOption::NamedEnv(meta.value()?.parse()?));
                    } else {
                        options.sources.push(SourceOption::DerivedEnv);
                    }
                } else if meta.path.is_ident("source") {
                    options.sources.push(SourceOption::Expr(meta.value()?.parse()?));
                } else if meta.path.is_ident("default") {
                    if options.default.is_some() {
                        return Err(meta.error("duplicate `default`"));
                    }
                    options.default = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("parser") {
                    if options.parser.is_some() {
                        return Err(meta.error("duplicate `parser`"));
                    }
                    options.parser = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("skip") {
                    options.skip = true;
                } else {
                    return Err(meta.error(
                        "unknown field attribute, expected one of `env`, `source`, `default`, `parser`, `skip`",
                    ));
                }
                Ok(())
            })?;
        }

        if options.skip && (options.default.is_some() || options.parser.is_some() || !options.sources.is_empty()) {
            return Err(syn::Error::new(
                attrs.first().map_or_else(proc_macro2::Span::call_site, |attr| attr.span()),
                "`skip` can't be combined with other field attributes",
            ));
        }

        Ok(options)
    }
}

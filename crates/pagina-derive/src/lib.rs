//! Pagina derive macros: page-object declarations as field attributes.
//!
//! `#[derive(PageModel)]` turns an annotated struct into a typed page-object
//! schema, replacing runtime reflection with compile-time code generation.
//! Instead of stringly-typed wiring checked at test time:
//!
//! ```ignore
//! // BAD: hand-written schema, field names repeated at every use site
//! let schema = PageSchema::builder("DocsHomePage")
//!     .field(FieldSpec::new("get_started", FindBy::selector(".getStarted_Sjon")))
//!     .build();
//! ```
//!
//! declare the fields once and let the derive keep schema and struct in sync:
//!
//! ```ignore
//! #[derive(PageModel)]
//! struct DocsHomePage {
//!     #[find_by(selector = ".getStarted_Sjon")]
//!     get_started: Locator,
//!
//!     #[find_by(selector = ".gh-btn")]
//!     #[under("get_started")]
//!     github_link: Locator,
//! }
//! ```
//!
//! # Attribute vocabulary
//!
//! - `#[find_by(<attr> = "…")]` on a field: exactly one of `test_id`,
//!   `alt_text`, `label`, `placeholder`, `text`, `title`, `selector`.
//! - `#[under("field_name")]` on a field: scoped-under relation: the field's
//!   locator resolves relative to the named field's locator.
//! - `#[frame("css")]` on the struct: inside-frame relation for every field
//!   of this level that does not override it.
//! - `#[page(base)]` on a field: embeds a base page object; its schema
//!   levels are resolved before this struct's own fields.
//!
//! A field of type `ElementHandles` holds every match; any other annotated
//! field holds a single `Locator`. Fields without attributes are filled with
//! `Default::default()`.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Ident, LitStr, Type};

const LOOKUP_ATTRS: [&str; 7] = [
    "test_id",
    "alt_text",
    "label",
    "placeholder",
    "text",
    "title",
    "selector",
];

/// Derive macro generating a `pagina::PageModel` implementation.
///
/// See the crate docs for the attribute vocabulary.
#[proc_macro_derive(PageModel, attributes(find_by, under, frame, page))]
pub fn derive_page_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// One annotated locator field.
struct LocatorField {
    ident: Ident,
    name: String,
    lookup: (Ident, LitStr),
    parent: Option<LitStr>,
    handles: bool,
}

/// Classification of every struct field.
struct PageFields {
    base: Option<(Ident, Type)>,
    locators: Vec<LocatorField>,
    plain: Vec<Ident>,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let name_str = name.to_string();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "PageModel can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            input,
            "PageModel requires named fields",
        ));
    };

    let frame = struct_frame(input)?;
    let page_fields = classify_fields(fields)?;

    let mut schema_stmts = Vec::new();
    if let Some((_, base_ty)) = &page_fields.base {
        schema_stmts.push(quote! {
            builder = builder.extends(<#base_ty as ::pagina::PageModel>::schema());
        });
    }
    if let Some(frame) = &frame {
        schema_stmts.push(quote! {
            builder = builder.frame(#frame);
        });
    }
    for field in &page_fields.locators {
        let field_name = &field.name;
        let (ctor, value) = &field.lookup;
        let mut spec = quote! {
            ::pagina::FieldSpec::new(#field_name, ::pagina::FindBy::#ctor(#value))
        };
        if let Some(parent) = &field.parent {
            spec = quote! { #spec.under(#parent) };
        }
        if field.handles {
            spec = quote! { #spec.as_handles() };
        }
        schema_stmts.push(quote! {
            builder = builder.field(#spec);
        });
    }

    let mut init_fields = Vec::new();
    if let Some((base_ident, base_ty)) = &page_fields.base {
        init_fields.push(quote! {
            #base_ident: <#base_ty as ::pagina::PageModel>::from_fields(fields)?
        });
    }
    for field in &page_fields.locators {
        let ident = &field.ident;
        let field_name = &field.name;
        let accessor = if field.handles {
            format_ident!("take_handles")
        } else {
            format_ident!("take_locator")
        };
        init_fields.push(quote! {
            #ident: fields.#accessor(#field_name)?
        });
    }
    for ident in &page_fields.plain {
        init_fields.push(quote! {
            #ident: ::core::default::Default::default()
        });
    }

    Ok(quote! {
        impl ::pagina::PageModel for #name {
            fn schema() -> ::pagina::PageSchema {
                let mut builder = ::pagina::PageSchema::builder(#name_str);
                #(#schema_stmts)*
                builder.build()
            }

            #[allow(unused_variables)]
            fn from_fields(
                fields: &mut ::pagina::ResolvedFields,
            ) -> ::pagina::PaginaResult<Self> {
                Ok(Self {
                    #(#init_fields,)*
                })
            }
        }
    })
}

/// Extract the struct-level `#[frame("css")]` attribute, if present.
fn struct_frame(input: &DeriveInput) -> syn::Result<Option<LitStr>> {
    let mut frame = None;
    for attr in &input.attrs {
        if attr.path().is_ident("frame") {
            if frame.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate #[frame] attribute"));
            }
            frame = Some(attr.parse_args::<LitStr>()?);
        }
    }
    Ok(frame)
}

fn classify_fields(fields: &syn::FieldsNamed) -> syn::Result<PageFields> {
    let mut base = None;
    let mut locators = Vec::new();
    let mut plain = Vec::new();

    for field in &fields.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

        if is_base_field(field)? {
            if base.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "at most one #[page(base)] field is allowed",
                ));
            }
            base = Some((ident, field.ty.clone()));
            continue;
        }

        match lookup_attribute(field)? {
            Some(lookup) => {
                let parent = under_attribute(field)?;
                let handles = is_handles_type(&field.ty);
                let name = ident.to_string();
                locators.push(LocatorField {
                    ident,
                    name,
                    lookup,
                    parent,
                    handles,
                });
            }
            None => {
                if under_attribute(field)?.is_some() {
                    return Err(syn::Error::new_spanned(
                        field,
                        "#[under] requires a #[find_by] attribute on the same field",
                    ));
                }
                plain.push(ident);
            }
        }
    }

    Ok(PageFields {
        base,
        locators,
        plain,
    })
}

/// Parse `#[find_by(<attr> = "…")]`, enforcing exactly one lookup attribute.
fn lookup_attribute(field: &Field) -> syn::Result<Option<(Ident, LitStr)>> {
    let mut lookup: Option<(Ident, LitStr)> = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("find_by") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let Some(key) = LOOKUP_ATTRS
                .iter()
                .find(|key| meta.path.is_ident(key))
            else {
                return Err(meta.error(
                    "unknown lookup attribute; expected one of \
                     test_id, alt_text, label, placeholder, text, title, selector",
                ));
            };
            if lookup.is_some() {
                return Err(meta.error("expected exactly one lookup attribute"));
            }
            let value: LitStr = meta.value()?.parse()?;
            lookup = Some((format_ident!("{}", key), value));
            Ok(())
        })?;
    }
    Ok(lookup)
}

/// Parse `#[under("field_name")]`.
fn under_attribute(field: &Field) -> syn::Result<Option<LitStr>> {
    let mut parent = None;
    for attr in &field.attrs {
        if attr.path().is_ident("under") {
            if parent.is_some() {
                return Err(syn::Error::new_spanned(attr, "duplicate #[under] attribute"));
            }
            parent = Some(attr.parse_args::<LitStr>()?);
        }
    }
    Ok(parent)
}

/// Check for the `#[page(base)]` marker.
fn is_base_field(field: &Field) -> syn::Result<bool> {
    for attr in &field.attrs {
        if attr.path().is_ident("page") {
            let mut is_base = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("base") {
                    is_base = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown page attribute; expected `base`"))
                }
            })?;
            if is_base {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// A field whose type path ends in `ElementHandles` holds every match.
fn is_handles_type(ty: &Type) -> bool {
    if let Type::Path(path) = ty {
        path.path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "ElementHandles")
    } else {
        false
    }
}

//! Pagina: typed page-object framework for end-to-end browser testing.
//!
//! Pagina (Spanish: "page") layers the Page Object Model over a CDP browser
//! backend. Page objects declare their locator fields as typed
//! configuration (a lookup strategy, an optional scoped-under parent, an
//! optional frame) and [`PageFactory`] populates them in dependency order
//! before a test runs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PAGINA Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐    ┌─────────────┐    ┌────────────┐          │
//! │  │ PageSchema│    │ PageFactory │    │  Session   │          │
//! │  │ (FieldSpec│───►│ (dependency │───►│ (browser + │          │
//! │  │  + FindBy)│    │  ordering)  │    │  page/CDP) │          │
//! │  └───────────┘    └─────────────┘    └────────────┘          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagina::{FieldSpec, FindBy, PageFactory, PageModel, PageSchema};
//! use pagina::{Locator, PaginaResult, ResolvedFields};
//!
//! struct DocsHomePage {
//!     get_started: Locator,
//!     github_link: Locator,
//! }
//!
//! impl PageModel for DocsHomePage {
//!     fn schema() -> PageSchema {
//!         PageSchema::builder("DocsHomePage")
//!             .field(FieldSpec::new("get_started", FindBy::selector(".getStarted_Sjon")))
//!             .field(FieldSpec::new("github_link", FindBy::selector(".gh-btn")))
//!             .build()
//!     }
//!
//!     fn from_fields(fields: &mut ResolvedFields) -> PaginaResult<Self> {
//!         Ok(Self {
//!             get_started: fields.take_locator("get_started")?,
//!             github_link: fields.take_locator("github_link")?,
//!         })
//!     }
//! }
//!
//! let page = PageFactory::create::<DocsHomePage>().unwrap();
//! assert!(page.get_started.to_query().contains(".getStarted_Sjon"));
//! # let _ = page.github_link;
//! ```

#![warn(missing_docs)]

// Lets derive-generated `::pagina::…` paths resolve inside this crate's own
// tests.
extern crate self as pagina;

mod browser;
mod decorator;
mod factory;
mod find_by;
mod locator;
mod result;
mod schema;
mod session;
mod url_pattern;

/// Logging setup for test binaries and examples.
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

pub use browser::{Browser, BrowserConfig, Page};
pub use decorator::{
    ElementFieldDecorator, FieldDecorator, LocatorFactory, LocatorFieldDecorator,
};
pub use factory::{FieldValue, PageFactory, ResolvedFields};
pub use find_by::{FindBy, Strategy};
pub use locator::{expect, ElementHandles, Expect, ExpectAssertion, Locator, Scope};
pub use result::{PaginaError, PaginaResult};
pub use schema::{FieldKind, FieldSpec, PageModel, PageSchema, PageSchemaBuilder, SchemaLevel};
pub use session::{App, Session, DEFAULT_LAUNCH_ATTEMPTS, LAUNCH_RETRY_DELAY_MS};
pub use url_pattern::UrlPattern;

/// Derive macro for declaring page objects with field attributes.
///
/// See the `pagina-derive` crate for the attribute vocabulary.
#[cfg(feature = "derive")]
pub use pagina_derive::PageModel;

#[cfg(all(test, feature = "derive"))]
mod derive_tests {
    use crate as pagina;
    use pagina::{PageFactory, PageModel, PaginaError};

    #[derive(Debug, PageModel)]
    struct BasePage {
        #[find_by(selector = "#shell")]
        shell: pagina::Locator,
    }

    #[derive(Debug, PageModel)]
    struct DocsHomePage {
        #[page(base)]
        base: BasePage,

        #[find_by(selector = ".getStarted_Sjon")]
        get_started: pagina::Locator,

        #[find_by(selector = ".gh-btn")]
        #[under("get_started")]
        github_link: pagina::Locator,

        #[find_by(selector = ".navbar__item")]
        nav_items: pagina::ElementHandles,

        visits: usize,
    }

    #[test]
    fn test_derived_schema_levels() {
        let schema = DocsHomePage::schema();
        assert_eq!(schema.levels().len(), 2);
        assert_eq!(schema.levels()[0].type_name, "BasePage");
        assert_eq!(schema.type_name(), "DocsHomePage");
        assert_eq!(schema.field_count(), 4);
    }

    #[test]
    fn test_derived_page_populates() {
        let page = PageFactory::create_elements::<DocsHomePage>().unwrap();
        assert!(page.base.shell.to_query().contains("#shell"));
        assert!(page.get_started.to_query().contains(".getStarted_Sjon"));
        // scoped under get_started
        assert!(page.github_link.to_query().contains(".getStarted_Sjon"));
        assert!(page.nav_items.to_query().contains("querySelectorAll"));
        assert_eq!(page.visits, 0);
    }

    #[test]
    fn test_derived_handles_field_rejected_by_strict_factory() {
        let err = PageFactory::create::<DocsHomePage>().unwrap_err();
        assert!(matches!(err, PaginaError::UnsupportedFieldKind { .. }));
    }

    #[derive(Debug, PageModel)]
    #[frame("#checkout")]
    struct CheckoutFrame {
        #[find_by(text = "Pay now")]
        pay: pagina::Locator,
    }

    #[test]
    fn test_derived_frame_scopes_fields() {
        let page = PageFactory::create::<CheckoutFrame>().unwrap();
        assert!(page.pay.to_query().contains("#checkout"));
        assert!(page.pay.to_query().contains("contentDocument"));
    }

    #[derive(Debug, PageModel)]
    struct TypoPage {
        #[find_by(selector = "a")]
        #[under("no_such_field")]
        orphan: pagina::Locator,
    }

    #[test]
    fn test_derived_unknown_dependency_fails_listing_field() {
        let err = PageFactory::create::<TypoPage>().unwrap_err();
        assert!(matches!(
            err,
            PaginaError::UnresolvedDependencies { page, fields }
                if page == "TypoPage" && fields == "orphan"
        ));
    }
}

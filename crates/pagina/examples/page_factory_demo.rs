//! Page Factory Demo - Dependency-Ordered Field Initialization
//!
//! Demonstrates deriving `PageModel` on annotated structs and letting
//! `PageFactory` resolve the fields in dependency order, regardless of
//! declaration order.
//!
//! # Running
//!
//! ```bash
//! cargo run --example page_factory_demo -p pagina
//! ```
//!
//! # Features
//!
//! - `#[find_by(...)]` lookup attributes
//! - `#[under("...")]` scoped-under relations declared out of order
//! - Page-object inheritance via `#[page(base)]`
//! - Frame-scoped pages with `#[frame("...")]`

#![allow(clippy::uninlined_format_args, clippy::unwrap_used)]

use pagina::{expect, ElementHandles, Locator, PageFactory, PageModel};

#[derive(PageModel)]
struct BasePage {
    #[find_by(selector = "#app-shell")]
    shell: Locator,
}

#[derive(PageModel)]
struct DocsHomePage {
    #[page(base)]
    base: BasePage,

    // Declared before its parent on purpose: the factory defers it to the
    // worklist and resolves it once `get_started` is available.
    #[find_by(selector = ".gh-btn")]
    #[under("get_started")]
    github_link: Locator,

    #[find_by(text = "Get started")]
    get_started: Locator,

    #[find_by(selector = ".navbar__item")]
    nav_items: ElementHandles,
}

#[derive(PageModel)]
#[frame("#checkout-frame")]
struct CheckoutPage {
    #[find_by(label = "Card number")]
    card_number: Locator,

    #[find_by(text = "Pay now")]
    pay_button: Locator,
}

fn main() {
    println!("=== Page Factory Demo ===\n");

    demo_schema();
    demo_factory();
    demo_frame_page();
    demo_unsatisfiable();

    println!("\n=== Page Factory Demo Complete ===");
}

fn demo_schema() {
    println!("--- Demo 1: Derived Schema ---\n");

    let schema = DocsHomePage::schema();
    println!("Page: {}", schema.type_name());
    println!("Hierarchy levels: {}", schema.levels().len());
    println!("Annotated fields: {}", schema.field_count());
    for level in schema.levels() {
        for field in &level.fields {
            match &field.parent {
                Some(parent) => println!("  {} (under {})", field.name, parent),
                None => println!("  {}", field.name),
            }
        }
    }
    println!();
}

fn demo_factory() {
    println!("--- Demo 2: Dependency-Ordered Initialization ---\n");

    let page: DocsHomePage = PageFactory::create_elements().unwrap();

    println!("shell query:       {}", page.base.shell.to_query());
    println!("get_started query: {}", page.get_started.to_query());
    println!("github_link query: {}", page.github_link.to_query());
    println!("nav_items count:   {}", page.nav_items.to_count_query());

    // The resolved locators plug straight into the assertion API.
    let assertion = expect(page.get_started.clone()).to_be_visible();
    println!("assertion: {:?}", assertion.validate_visible(true));
    println!();
}

fn demo_frame_page() {
    println!("--- Demo 3: Frame-Scoped Page ---\n");

    let page: CheckoutPage = PageFactory::create().unwrap();
    println!("card_number query: {}", page.card_number.to_query());
    println!("pay_button query:  {}", page.pay_button.to_query());
    println!();
}

fn demo_unsatisfiable() {
    println!("--- Demo 4: Unsatisfiable Dependency ---\n");

    #[derive(PageModel)]
    struct TypoPage {
        #[find_by(selector = ".child")]
        #[under("no_such_field")]
        orphan: Locator,
    }

    match PageFactory::create::<TypoPage>() {
        Ok(_) => println!("unexpected success"),
        Err(err) => println!("factory error:\n{err}"),
    }
}

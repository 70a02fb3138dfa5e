//! Docs Site - End-to-End Page Object Walkthrough
//!
//! Drives a real Chromium instance against the Playwright documentation site:
//! launches a session with retries, builds page objects through the factory,
//! asserts visibility of scoped elements, clicks through, and waits for a
//! glob-matched URL.
//!
//! # Running
//!
//! ```bash
//! cargo run --example docs_site -p pagina --features browser
//! ```
//!
//! Requires a local Chromium installation and network access.

#![allow(clippy::uninlined_format_args)]

use pagina::{App, BrowserConfig, ElementHandles, Locator, PageModel, PaginaResult, Session};

#[derive(PageModel)]
struct DocsHomePage {
    #[find_by(selector = ".getStarted_Sjon")]
    get_started: Locator,

    #[find_by(selector = ".gh-btn")]
    #[under("get_started")]
    github_link: Locator,

    #[find_by(selector = ".navbar__item")]
    nav_items: ElementHandles,
}

#[derive(PageModel)]
struct IntroPage {
    #[find_by(selector = ".navbar__logo")]
    navigation_logo: Locator,
}

#[tokio::main]
async fn main() -> PaginaResult<()> {
    pagina::logging::init();

    let mut session = Session::launch_with_retries(BrowserConfig::new(), 2).await?;
    session.open("https://playwright.dev/java/").await?;

    let mut app = App::new(session);
    let home: DocsHomePage = app.page_object()?;

    let page = app.session().page();
    println!(
        "get_started visible: {}",
        page.is_visible(&home.get_started).await?
    );
    println!(
        "github_link visible: {}",
        page.is_visible(&home.github_link).await?
    );
    println!("navbar items: {}", page.count(home.nav_items.locator()).await?);

    page.click(&home.get_started).await?;
    app.session_mut()
        .wait_for_url("**/java/docs/intro")
        .await?;

    let intro: IntroPage = app.page_object()?;
    let page = app.session().page();
    println!(
        "navigation_logo visible: {}",
        page.is_visible(&intro.navigation_logo).await?
    );
    println!("landed on: {}", page.current_url());

    app.into_session().close().await
}

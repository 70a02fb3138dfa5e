//! Explicit session contexts.
//!
//! A [`Session`] owns one browser and one page for the duration of a test.
//! Tests isolate from each other by each owning their own `Session` value
//! instead of sharing global thread-local handles; parallel runners get
//! isolation for free. [`App`] layers page-object production on top of a
//! session.

use tracing::{info, warn};

use crate::browser::{Browser, BrowserConfig, Page};
use crate::decorator::FieldDecorator;
use crate::factory::PageFactory;
use crate::result::{PaginaError, PaginaResult};
use crate::schema::PageModel;
use crate::url_pattern::UrlPattern;

/// Default number of browser launch attempts
pub const DEFAULT_LAUNCH_ATTEMPTS: u32 = 2;

/// Delay between launch attempts, in milliseconds
pub const LAUNCH_RETRY_DELAY_MS: u64 = 500;

/// One browser plus one page, owned by a single test execution.
#[derive(Debug)]
pub struct Session {
    browser: Browser,
    page: Page,
}

#[cfg(feature = "browser")]
impl Session {
    /// Launch a browser and open a fresh page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::SessionNotCreated`] when every launch attempt
    /// fails.
    pub async fn launch(config: BrowserConfig) -> PaginaResult<Self> {
        Self::launch_with_retries(config, DEFAULT_LAUNCH_ATTEMPTS).await
    }

    /// Launch with a bounded number of attempts, sleeping between failures.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::SessionNotCreated`] when every attempt fails.
    pub async fn launch_with_retries(config: BrowserConfig, attempts: u32) -> PaginaResult<Self> {
        for attempt in 1..=attempts {
            match Browser::launch(config.clone()).await {
                Ok(browser) => {
                    let page = browser.new_page().await?;
                    info!(attempt, "browser session created");
                    return Ok(Self { browser, page });
                }
                Err(error) => {
                    warn!(attempt, %error, "browser launch failed");
                    if attempt < attempts {
                        tokio::time::sleep(tokio::time::Duration::from_millis(
                            LAUNCH_RETRY_DELAY_MS,
                        ))
                        .await;
                    }
                }
            }
        }
        Err(PaginaError::SessionNotCreated { attempts })
    }

    /// Navigate the session page to a URL.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::NavigationError`] if navigation fails.
    pub async fn open(&mut self, url: &str) -> PaginaResult<()> {
        self.page.goto(url).await
    }

    /// Wait until the page URL matches a glob pattern.
    ///
    /// # Errors
    ///
    /// Propagates navigation failures.
    pub async fn wait_for_url(&mut self, pattern: &str) -> PaginaResult<()> {
        self.page.wait_for_url(&UrlPattern::new(pattern)).await
    }

    /// Close the browser, consuming the session.
    pub async fn close(self) -> PaginaResult<()> {
        self.browser.close().await
    }
}

#[cfg(not(feature = "browser"))]
impl Session {
    /// Launch a browser and open a fresh page (mock).
    pub fn launch(config: BrowserConfig) -> PaginaResult<Self> {
        Self::launch_with_retries(config, DEFAULT_LAUNCH_ATTEMPTS)
    }

    /// Launch with a bounded number of attempts (mock launch cannot fail,
    /// but the contract matches the live implementation).
    pub fn launch_with_retries(config: BrowserConfig, attempts: u32) -> PaginaResult<Self> {
        for attempt in 1..=attempts {
            match Browser::launch(config.clone()) {
                Ok(browser) => {
                    let page = browser.new_page()?;
                    info!(attempt, "browser session created");
                    return Ok(Self { browser, page });
                }
                Err(error) => {
                    warn!(attempt, %error, "browser launch failed");
                }
            }
        }
        Err(PaginaError::SessionNotCreated { attempts })
    }

    /// Navigate the session page to a URL (mock records it).
    pub fn open(&mut self, url: &str) -> PaginaResult<()> {
        self.page.goto(url)
    }

    /// Check the page URL against a glob pattern.
    pub fn wait_for_url(&mut self, pattern: &str) -> PaginaResult<()> {
        self.page.wait_for_url(&UrlPattern::new(pattern))
    }

    /// Close the browser, consuming the session.
    pub fn close(self) -> PaginaResult<()> {
        self.browser.close()
    }
}

impl Session {
    /// The session's browser
    #[must_use]
    pub const fn browser(&self) -> &Browser {
        &self.browser
    }

    /// The session's page
    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    /// The session's page, mutably
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }
}

/// Application context: produces populated page objects against a session.
#[derive(Debug)]
pub struct App {
    session: Session,
}

impl App {
    /// Wrap a session
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Instantiate and populate a typed page object.
    ///
    /// Handle-list fields are supported; dependency resolution failures are
    /// fatal.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::PageFactory`] errors.
    pub fn page_object<P: PageModel>(&self) -> PaginaResult<P> {
        PageFactory::create_elements::<P>()
    }

    /// Instantiate a page object with a custom field decorator.
    ///
    /// # Errors
    ///
    /// Propagates decorator and resolution errors.
    pub fn page_object_with<P: PageModel>(
        &self,
        decorator: &dyn FieldDecorator,
    ) -> PaginaResult<P> {
        PageFactory::create_with::<P>(decorator)
    }

    /// The underlying session
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying session, mutably
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Unwrap back into the session
    #[must_use]
    pub fn into_session(self) -> Session {
        self.session
    }
}

#[cfg(all(test, feature = "browser"))]
mod retry_tests {
    use super::*;

    #[tokio::test]
    async fn test_exhausted_single_attempt_returns_without_delay() {
        // A bad executable path fails the launch; with one attempt there is
        // nothing to retry, so no inter-attempt sleep may run.
        let config = BrowserConfig::default().with_chromium_path("/nonexistent/chromium");
        let started = std::time::Instant::now();

        let err = Session::launch_with_retries(config, 1).await.unwrap_err();

        assert!(matches!(err, PaginaError::SessionNotCreated { attempts: 1 }));
        assert!(started.elapsed() < std::time::Duration::from_millis(LAUNCH_RETRY_DELAY_MS));
    }
}

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::factory::ResolvedFields;
    use crate::find_by::FindBy;
    use crate::locator::Locator;
    use crate::schema::{FieldSpec, PageSchema};

    #[derive(Debug)]
    struct IntroPage {
        logo: Locator,
    }

    impl PageModel for IntroPage {
        fn schema() -> PageSchema {
            PageSchema::builder("IntroPage")
                .field(FieldSpec::new("logo", FindBy::selector(".navbar__brand")))
                .build()
        }

        fn from_fields(fields: &mut ResolvedFields) -> PaginaResult<Self> {
            Ok(Self {
                logo: fields.take_locator("logo")?,
            })
        }
    }

    #[test]
    fn test_session_launch_and_open() {
        let mut session = Session::launch(BrowserConfig::default()).unwrap();
        session.open("https://playwright.dev/java/").unwrap();
        assert_eq!(session.page().current_url(), "https://playwright.dev/java/");
    }

    #[test]
    fn test_wait_for_url_pattern() {
        let mut session = Session::launch(BrowserConfig::default()).unwrap();
        session
            .open("https://playwright.dev/java/docs/intro")
            .unwrap();
        assert!(session.wait_for_url("**/java/docs/intro").is_ok());
        assert!(session.wait_for_url("**/java/docs/api").is_err());
    }

    #[test]
    fn test_app_produces_page_objects() {
        let session = Session::launch(BrowserConfig::default()).unwrap();
        let app = App::new(session);
        let page: IntroPage = app.page_object().unwrap();
        assert!(page.logo.to_query().contains(".navbar__brand"));
    }
}

//! Browser control for headless end-to-end testing.
//!
//! Everything here is pass-through to the automation backend. With the
//! `browser` feature enabled, control goes over the Chrome DevTools Protocol
//! via chromiumoxide; without it, a mock implementation stands in so the
//! page-object layer can be unit tested without a browser.

use serde::{Deserialize, Serialize};

use crate::locator::Locator;
use crate::result::{PaginaError, PaginaResult};
use crate::url_pattern::UrlPattern;

/// Browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Ignore HTTPS certificate errors
    pub ignore_https_errors: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            ignore_https_errors: true,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Create a configuration with the default headless setup
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set whether HTTPS certificate errors are ignored
    #[must_use]
    pub const fn with_ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, Locator, PaginaError, PaginaResult, UrlPattern};
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tracing::debug;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::BrowserLaunchError`] if the browser cannot
        /// be launched.
        pub async fn launch(config: BrowserConfig) -> PaginaResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if config.ignore_https_errors {
                builder = builder.arg("--ignore-certificate-errors");
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| PaginaError::BrowserLaunchError { message: e })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                PaginaError::BrowserLaunchError {
                    message: e.to_string(),
                }
            })?;

            // Drive CDP events until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::PageError`] if page creation fails.
        pub async fn new_page(&self) -> PaginaResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| PaginaError::PageError {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: Some(Arc::new(Mutex::new(cdp_page))),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser.
        pub async fn close(self) -> PaginaResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| PaginaError::BrowserLaunchError {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with a live CDP connection
    #[derive(Debug)]
    pub struct Page {
        /// Current URL
        url: String,
        inner: Option<Arc<Mutex<CdpPage>>>,
    }

    impl Page {
        /// Create a detached page for testing without a browser
        #[must_use]
        pub fn detached() -> Self {
            Self {
                url: String::from("about:blank"),
                inner: None,
            }
        }

        /// Navigate to a URL and wait for the navigation to finish.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::NavigationError`] if navigation fails.
        pub async fn goto(&mut self, url: &str) -> PaginaResult<()> {
            if let Some(ref inner) = self.inner {
                let page = inner.lock().await;
                page.goto(url)
                    .await
                    .map_err(|e| PaginaError::NavigationError {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| PaginaError::NavigationError {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
            }
            self.url = url.to_string();
            Ok(())
        }

        /// Block until the page URL matches the pattern, waiting through
        /// navigations as they complete.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::NavigationError`] if a navigation wait
        /// fails.
        pub async fn wait_for_url(&mut self, pattern: &UrlPattern) -> PaginaResult<()> {
            let Some(inner) = self.inner.clone() else {
                return Ok(());
            };
            loop {
                let current = {
                    let page = inner.lock().await;
                    page.url()
                        .await
                        .map_err(|e| PaginaError::PageError {
                            message: e.to_string(),
                        })?
                        .unwrap_or_default()
                };
                if pattern.matches(&current) {
                    self.url = current;
                    return Ok(());
                }
                debug!(current = %current, pattern = %pattern.pattern(), "waiting for navigation");
                let page = inner.lock().await;
                page.wait_for_navigation().await.map_err(|e| {
                    PaginaError::NavigationError {
                        url: pattern.pattern().to_string(),
                        message: e.to_string(),
                    }
                })?;
            }
        }

        /// Evaluate a JavaScript expression.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::PageError`] if evaluation fails.
        pub async fn evaluate<T: serde::de::DeserializeOwned>(
            &self,
            expr: &str,
        ) -> PaginaResult<T> {
            let Some(ref inner) = self.inner else {
                return Err(PaginaError::PageError {
                    message: "No browser connection".to_string(),
                });
            };
            let page = inner.lock().await;
            let result = page
                .evaluate(expr)
                .await
                .map_err(|e| PaginaError::PageError {
                    message: e.to_string(),
                })?;
            result.into_value().map_err(|e| PaginaError::PageError {
                message: e.to_string(),
            })
        }

        /// Click the element a locator resolves to.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::PageError`] if no element matches.
        pub async fn click(&self, locator: &Locator) -> PaginaResult<()> {
            let query = locator.to_query();
            let clicked: bool = self
                .evaluate(&format!(
                    "(() => {{ const el = {query}; if (!el) return false; el.click(); return true; }})()"
                ))
                .await?;
            if clicked {
                Ok(())
            } else {
                Err(PaginaError::PageError {
                    message: format!("No element matches {:?}", locator.strategy()),
                })
            }
        }

        /// Fill the element a locator resolves to with text.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::PageError`] if no element matches.
        pub async fn fill(&self, locator: &Locator, text: &str) -> PaginaResult<()> {
            let query = locator.to_query();
            let filled: bool = self
                .evaluate(&format!(
                    "(() => {{ const el = {query}; if (!el) return false; \
                     el.value = {text:?}; \
                     el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                     return true; }})()"
                ))
                .await?;
            if filled {
                Ok(())
            } else {
                Err(PaginaError::PageError {
                    message: format!("No element matches {:?}", locator.strategy()),
                })
            }
        }

        /// Check whether the element a locator resolves to is visible.
        pub async fn is_visible(&self, locator: &Locator) -> PaginaResult<bool> {
            let query = locator.to_query();
            self.evaluate(&format!(
                "(() => {{ const el = {query}; \
                 return !!el && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length); }})()"
            ))
            .await
        }

        /// Get the text content of the element a locator resolves to.
        pub async fn text_content(&self, locator: &Locator) -> PaginaResult<String> {
            let query = locator.to_query();
            let text: Option<String> = self
                .evaluate(&format!(
                    "(() => {{ const el = {query}; return el ? el.textContent : null; }})()"
                ))
                .await?;
            Ok(text.unwrap_or_default())
        }

        /// Count the elements a locator matches.
        pub async fn count(&self, locator: &Locator) -> PaginaResult<usize> {
            self.evaluate(&locator.to_count_query()).await
        }

        /// Take a PNG screenshot.
        ///
        /// # Errors
        ///
        /// Returns [`PaginaError::PageError`] if the capture fails.
        pub async fn screenshot(&self) -> PaginaResult<Vec<u8>> {
            use chromiumoxide::cdp::browser_protocol::page::{
                CaptureScreenshotFormat, CaptureScreenshotParams,
            };

            let Some(ref inner) = self.inner else {
                return Ok(vec![]);
            };
            let page = inner.lock().await;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();
            let shot = page
                .execute(params)
                .await
                .map_err(|e| PaginaError::PageError {
                    message: e.to_string(),
                })?;

            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(&shot.data)
                .map_err(|e| PaginaError::PageError {
                    message: e.to_string(),
                })
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// ============================================================================
// Mock implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{BrowserConfig, Locator, PaginaError, PaginaResult, UrlPattern};

    /// Browser instance (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a new browser instance (mock).
        pub fn launch(config: BrowserConfig) -> PaginaResult<Self> {
            Ok(Self { config })
        }

        /// Create a new page.
        pub fn new_page(&self) -> PaginaResult<Page> {
            Ok(Page::detached())
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser.
        pub fn close(self) -> PaginaResult<()> {
            Ok(())
        }
    }

    /// A browser page (mock when `browser` feature disabled)
    #[derive(Debug)]
    pub struct Page {
        url: String,
    }

    impl Page {
        /// Create a detached page for testing without a browser
        #[must_use]
        pub fn detached() -> Self {
            Self {
                url: String::from("about:blank"),
            }
        }

        /// Navigate to a URL (records it without driving a browser).
        pub fn goto(&mut self, url: &str) -> PaginaResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        /// Check the current URL against the pattern.
        ///
        /// # Errors
        ///
        /// With no browser to wait on, a non-matching URL fails immediately.
        pub fn wait_for_url(&mut self, pattern: &UrlPattern) -> PaginaResult<()> {
            if pattern.matches(&self.url) {
                Ok(())
            } else {
                Err(PaginaError::NavigationError {
                    url: pattern.pattern().to_string(),
                    message: format!("current URL is {}", self.url),
                })
            }
        }

        /// Evaluate JavaScript (always fails in mock mode).
        pub fn evaluate<T: serde::de::DeserializeOwned>(&self, _expr: &str) -> PaginaResult<T> {
            Err(PaginaError::PageError {
                message: "Browser feature not enabled. Enable 'browser' for real CDP support."
                    .to_string(),
            })
        }

        /// Click the element a locator resolves to (mock does nothing).
        pub fn click(&self, _locator: &Locator) -> PaginaResult<()> {
            Ok(())
        }

        /// Fill the element a locator resolves to (mock does nothing).
        pub fn fill(&self, _locator: &Locator, _text: &str) -> PaginaResult<()> {
            Ok(())
        }

        /// Check visibility (mock reports hidden).
        pub fn is_visible(&self, _locator: &Locator) -> PaginaResult<bool> {
            Ok(false)
        }

        /// Get text content (mock returns empty).
        pub fn text_content(&self, _locator: &Locator) -> PaginaResult<String> {
            Ok(String::new())
        }

        /// Count matches (mock reports zero).
        pub fn count(&self, _locator: &Locator) -> PaginaResult<usize> {
            Ok(0)
        }

        /// Take a screenshot (mock returns empty bytes).
        pub fn screenshot(&self) -> PaginaResult<Vec<u8>> {
            Ok(vec![])
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use mock::{Browser, Page};

#[cfg(test)]
mod tests {
    use super::*;

    mod config_tests {
        use super::*;

        #[test]
        fn test_defaults_match_session_bootstrap() {
            let config = BrowserConfig::default();
            assert!(config.headless);
            assert_eq!(config.viewport_width, 1920);
            assert_eq!(config.viewport_height, 1080);
            assert!(config.ignore_https_errors);
            assert!(config.sandbox);
        }

        #[test]
        fn test_builder_methods() {
            let config = BrowserConfig::default()
                .with_viewport(800, 600)
                .with_headless(false)
                .with_ignore_https_errors(false)
                .with_chromium_path("/usr/bin/chromium")
                .with_no_sandbox();

            assert_eq!(config.viewport_width, 800);
            assert!(!config.headless);
            assert!(!config.ignore_https_errors);
            assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
            assert!(!config.sandbox);
        }

        #[test]
        fn test_partial_json_fills_defaults() {
            let config: BrowserConfig =
                serde_json::from_str(r#"{ "headless": false }"#).unwrap();
            assert!(!config.headless);
            assert_eq!(config.viewport_width, 1920);
            assert!(config.ignore_https_errors);
        }
    }

    #[cfg(not(feature = "browser"))]
    mod mock_tests {
        use super::*;
        use crate::find_by::FindBy;
        use crate::url_pattern::UrlPattern;

        #[test]
        fn test_mock_navigation_tracks_url() {
            let browser = Browser::launch(BrowserConfig::default()).unwrap();
            let mut page = browser.new_page().unwrap();
            page.goto("https://playwright.dev/java/").unwrap();
            assert_eq!(page.current_url(), "https://playwright.dev/java/");
        }

        #[test]
        fn test_mock_wait_for_url_checks_current() {
            let mut page = Page::detached();
            page.goto("https://playwright.dev/java/docs/intro").unwrap();
            assert!(page.wait_for_url(&UrlPattern::new("**/docs/intro")).is_ok());
            assert!(page.wait_for_url(&UrlPattern::new("**/docs/api")).is_err());
        }

        #[test]
        fn test_mock_locator_ops_are_inert() {
            let page = Page::detached();
            let locator = crate::Locator::new(FindBy::selector("button").strategy().unwrap());
            assert!(page.click(&locator).is_ok());
            assert!(!page.is_visible(&locator).unwrap());
            assert_eq!(page.count(&locator).unwrap(), 0);
        }
    }
}

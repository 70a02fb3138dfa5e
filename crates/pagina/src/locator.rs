//! Locator handles and fluent assertions.
//!
//! A [`Locator`] identifies one or more elements on a page. It is pure data:
//! a lookup [`Strategy`] plus the [`Scope`] it resolves in (page root, a
//! frame, or another locator). Locators are resolved lazily; a
//! [`crate::Page`] renders them to DOM queries and executes them through the
//! automation backend at interaction time.
//!
//! [`expect`] builds fluent assertions over a locator in the
//! `expect(locator).to_be_visible()` style.

use serde::{Deserialize, Serialize};

use crate::find_by::Strategy;
use crate::result::{PaginaError, PaginaResult};

/// Where a locator is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Resolve from the page root
    Root,
    /// Resolve inside the frame matching the given selector
    Frame(String),
    /// Resolve relative to an already-resolved parent locator
    Parent(Box<Locator>),
}

/// A handle identifying one or more elements on a page, resolved lazily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    scope: Scope,
}

impl Locator {
    /// Create a locator resolving from the page root
    #[must_use]
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            scope: Scope::Root,
        }
    }

    /// Create a locator with an explicit scope
    #[must_use]
    pub fn scoped(strategy: Strategy, scope: Scope) -> Self {
        Self { strategy, scope }
    }

    /// The lookup strategy
    #[must_use]
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// The scope this locator resolves in
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Rebind this locator under a parent locator
    #[must_use]
    pub fn under(self, parent: Locator) -> Self {
        Self {
            strategy: self.strategy,
            scope: Scope::Parent(Box::new(parent)),
        }
    }

    /// Rebind this locator inside a frame
    #[must_use]
    pub fn in_frame(self, frame_selector: impl Into<String>) -> Self {
        Self {
            strategy: self.strategy,
            scope: Scope::Frame(frame_selector.into()),
        }
    }

    /// JavaScript expression for the scope's query root.
    fn scope_expr(&self) -> String {
        match &self.scope {
            Scope::Root => "document".to_string(),
            Scope::Frame(frame) => {
                format!("document.querySelector({frame:?}).contentDocument")
            }
            Scope::Parent(parent) => format!("({})", parent.to_query()),
        }
    }

    /// Render the single-element DOM query for this locator.
    #[must_use]
    pub fn to_query(&self) -> String {
        let scope = self.scope_expr();
        match self.strategy.as_css() {
            Some(css) => format!("{scope}.querySelector({css:?})"),
            None => {
                let text = self.strategy.value();
                format!(
                    "Array.from({scope}.querySelectorAll('*')).find(el => el.textContent.includes({text:?}))"
                )
            }
        }
    }

    /// Render the all-elements DOM query for this locator.
    #[must_use]
    pub fn to_all_query(&self) -> String {
        let scope = self.scope_expr();
        match self.strategy.as_css() {
            Some(css) => format!("Array.from({scope}.querySelectorAll({css:?}))"),
            None => {
                let text = self.strategy.value();
                format!(
                    "Array.from({scope}.querySelectorAll('*')).filter(el => el.textContent.includes({text:?}))"
                )
            }
        }
    }

    /// Render the match-count DOM query for this locator.
    #[must_use]
    pub fn to_count_query(&self) -> String {
        format!("{}.length", self.to_all_query())
    }
}

/// The list-of-element-handles form of a locator.
///
/// Where a [`Locator`] addresses a single element strictly, `ElementHandles`
/// addresses every match at once; `nth` renders a query for one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementHandles {
    locator: Locator,
}

impl ElementHandles {
    /// Wrap a locator as an all-matches handle list
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    /// The underlying locator
    #[must_use]
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// Render the all-elements DOM query
    #[must_use]
    pub fn to_query(&self) -> String {
        self.locator.to_all_query()
    }

    /// Render the match-count DOM query
    #[must_use]
    pub fn to_count_query(&self) -> String {
        self.locator.to_count_query()
    }

    /// Render a query addressing the n-th match (zero-based)
    #[must_use]
    pub fn nth(&self, index: usize) -> String {
        format!("{}[{index}]", self.locator.to_all_query())
    }
}

/// Fluent assertion builder for locators.
#[derive(Debug, Clone)]
pub struct Expect {
    locator: Locator,
}

impl Expect {
    /// Create a new expectation for a locator
    #[must_use]
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    /// Assert the element has exactly the given text
    #[must_use]
    pub fn to_have_text(&self, expected: impl Into<String>) -> ExpectAssertion {
        ExpectAssertion::HasText {
            locator: self.locator.clone(),
            expected: expected.into(),
        }
    }

    /// Assert the element contains the given text
    #[must_use]
    pub fn to_contain_text(&self, expected: impl Into<String>) -> ExpectAssertion {
        ExpectAssertion::ContainsText {
            locator: self.locator.clone(),
            expected: expected.into(),
        }
    }

    /// Assert the element is visible
    #[must_use]
    pub fn to_be_visible(&self) -> ExpectAssertion {
        ExpectAssertion::IsVisible {
            locator: self.locator.clone(),
        }
    }

    /// Assert the match count
    #[must_use]
    pub fn to_have_count(&self, expected: usize) -> ExpectAssertion {
        ExpectAssertion::HasCount {
            locator: self.locator.clone(),
            expected,
        }
    }
}

/// Assertion kinds produced by [`Expect`].
#[derive(Debug, Clone)]
pub enum ExpectAssertion {
    /// Element has exact text
    HasText {
        /// The locator
        locator: Locator,
        /// Expected text
        expected: String,
    },
    /// Element contains text
    ContainsText {
        /// The locator
        locator: Locator,
        /// Text to find
        expected: String,
    },
    /// Element is visible
    IsVisible {
        /// The locator
        locator: Locator,
    },
    /// Match count equals the expected value
    HasCount {
        /// The locator
        locator: Locator,
        /// Expected count
        expected: usize,
    },
}

impl ExpectAssertion {
    /// The locator this assertion is about
    #[must_use]
    pub fn locator(&self) -> &Locator {
        match self {
            Self::HasText { locator, .. }
            | Self::ContainsText { locator, .. }
            | Self::IsVisible { locator }
            | Self::HasCount { locator, .. } => locator,
        }
    }

    /// Validate a text assertion against the fetched text content.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::AssertionError`] if the assertion fails.
    pub fn validate(&self, actual: &str) -> PaginaResult<()> {
        match self {
            Self::HasText { expected, .. } => {
                if actual == expected {
                    Ok(())
                } else {
                    Err(PaginaError::AssertionError {
                        message: format!("Expected text '{expected}' but got '{actual}'"),
                    })
                }
            }
            Self::ContainsText { expected, .. } => {
                if actual.contains(expected) {
                    Ok(())
                } else {
                    Err(PaginaError::AssertionError {
                        message: format!("Expected text to contain '{expected}' but got '{actual}'"),
                    })
                }
            }
            Self::IsVisible { .. } | Self::HasCount { .. } => Ok(()),
        }
    }

    /// Validate a visibility assertion against the fetched visibility.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::AssertionError`] if the element is hidden.
    pub fn validate_visible(&self, actual: bool) -> PaginaResult<()> {
        match self {
            Self::IsVisible { locator } => {
                if actual {
                    Ok(())
                } else {
                    Err(PaginaError::AssertionError {
                        message: format!("Expected {:?} to be visible", locator.strategy()),
                    })
                }
            }
            _ => Ok(()),
        }
    }

    /// Validate a count assertion against the fetched count.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::AssertionError`] if the count differs.
    pub fn validate_count(&self, actual: usize) -> PaginaResult<()> {
        match self {
            Self::HasCount { expected, .. } => {
                if actual == *expected {
                    Ok(())
                } else {
                    Err(PaginaError::AssertionError {
                        message: format!("Expected count {expected} but got {actual}"),
                    })
                }
            }
            _ => Ok(()),
        }
    }
}

/// Create an expectation for a locator
#[must_use]
pub fn expect(locator: Locator) -> Expect {
    Expect::new(locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::find_by::FindBy;

    fn root(by: FindBy) -> Locator {
        Locator::new(by.strategy().unwrap())
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_root_css_query() {
            let locator = root(FindBy::selector(".gh-btn"));
            assert_eq!(locator.to_query(), "document.querySelector(\".gh-btn\")");
        }

        #[test]
        fn test_test_id_query() {
            let locator = root(FindBy::test_id("score"));
            let query = locator.to_query();
            assert!(query.contains("data-testid"));
            assert!(query.contains("score"));
        }

        #[test]
        fn test_text_query_filters_content() {
            let locator = root(FindBy::text("Get started"));
            let query = locator.to_query();
            assert!(query.contains("textContent"));
            assert!(query.contains("Get started"));
        }

        #[test]
        fn test_count_query() {
            let locator = root(FindBy::selector("li"));
            let query = locator.to_count_query();
            assert!(query.contains("querySelectorAll"));
            assert!(query.ends_with(".length"));
        }

        #[test]
        fn test_frame_scope_query() {
            let locator = root(FindBy::selector("button")).in_frame("#login-frame");
            let query = locator.to_query();
            assert!(query.contains("contentDocument"));
            assert!(query.contains("#login-frame"));
        }

        #[test]
        fn test_parent_scope_query_nests_parent_query() {
            let parent = root(FindBy::selector(".sidebar"));
            let child = root(FindBy::selector("a")).under(parent);
            let query = child.to_query();
            assert!(query.starts_with("(document.querySelector(\".sidebar\"))"));
            assert!(query.ends_with(".querySelector(\"a\")"));
        }
    }

    mod handles_tests {
        use super::*;

        #[test]
        fn test_handles_query_selects_all() {
            let handles = ElementHandles::new(root(FindBy::selector(".getStarted_Sjon")));
            assert!(handles.to_query().contains("querySelectorAll"));
        }

        #[test]
        fn test_nth_indexes_the_match_list() {
            let handles = ElementHandles::new(root(FindBy::selector("button")));
            assert!(handles.nth(0).ends_with("[0]"));
        }
    }

    mod expect_tests {
        use super::*;

        #[test]
        fn test_validate_has_text() {
            let assertion = expect(root(FindBy::test_id("score"))).to_have_text("10");
            assert!(assertion.validate("10").is_ok());
            assert!(assertion.validate("20").is_err());
        }

        #[test]
        fn test_validate_contains_text() {
            let assertion = expect(root(FindBy::selector("span"))).to_contain_text("Score");
            assert!(assertion.validate("Score: 100").is_ok());
            assert!(assertion.validate("Lives: 3").is_err());
        }

        #[test]
        fn test_validate_visible() {
            let assertion = expect(root(FindBy::selector("button"))).to_be_visible();
            assert!(assertion.validate_visible(true).is_ok());
            assert!(assertion.validate_visible(false).is_err());
        }

        #[test]
        fn test_validate_count() {
            let assertion = expect(root(FindBy::selector("li"))).to_have_count(3);
            assert!(assertion.validate_count(3).is_ok());
            assert!(assertion.validate_count(5).is_err());
        }
    }
}

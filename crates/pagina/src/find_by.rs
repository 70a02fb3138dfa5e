//! Lookup descriptors for page-object fields.
//!
//! A [`FindBy`] carries the seven named lookup attributes a field may declare:
//! test id, alt text, label, placeholder, text, title, and a raw selector.
//! At most one attribute is expected to be non-empty per field; this
//! precondition is not checked, and [`FindBy::strategy`] simply picks the
//! first non-empty attribute in declaration order.
//!
//! The typed constructors (`FindBy::test_id(..)` and friends) each set exactly
//! one attribute, so code built through them cannot hit the ambiguous case.

use serde::{Deserialize, Serialize};

/// Lookup attributes for a single page-object field.
///
/// # Example
///
/// ```
/// use pagina::FindBy;
///
/// let by = FindBy::test_id("submit");
/// assert_eq!(by.strategy().unwrap().value(), "submit");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindBy {
    /// Locate by `data-testid` attribute
    pub test_id: String,
    /// Locate an element, usually an image, by its text alternative
    pub alt_text: String,
    /// Locate a form control by its associated label text
    pub label: String,
    /// Locate an input by its placeholder
    pub placeholder: String,
    /// Locate by text content
    pub text: String,
    /// Locate by `title` attribute
    pub title: String,
    /// Raw CSS selector
    pub selector: String,
}

impl FindBy {
    /// Create an empty descriptor with no attribute set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Locate by `data-testid` attribute
    #[must_use]
    pub fn test_id(value: impl Into<String>) -> Self {
        Self {
            test_id: value.into(),
            ..Self::default()
        }
    }

    /// Locate by text alternative (`alt` attribute)
    #[must_use]
    pub fn alt_text(value: impl Into<String>) -> Self {
        Self {
            alt_text: value.into(),
            ..Self::default()
        }
    }

    /// Locate a form control by its label text
    #[must_use]
    pub fn label(value: impl Into<String>) -> Self {
        Self {
            label: value.into(),
            ..Self::default()
        }
    }

    /// Locate an input by placeholder
    #[must_use]
    pub fn placeholder(value: impl Into<String>) -> Self {
        Self {
            placeholder: value.into(),
            ..Self::default()
        }
    }

    /// Locate by text content
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            text: value.into(),
            ..Self::default()
        }
    }

    /// Locate by `title` attribute
    #[must_use]
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: value.into(),
            ..Self::default()
        }
    }

    /// Locate by raw CSS selector
    #[must_use]
    pub fn selector(value: impl Into<String>) -> Self {
        Self {
            selector: value.into(),
            ..Self::default()
        }
    }

    /// Select the lookup strategy for this descriptor.
    ///
    /// Returns the strategy for the first non-empty attribute, in declaration
    /// order: test id, alt text, label, placeholder, text, title, selector.
    /// Returns `None` when every attribute is empty.
    #[must_use]
    pub fn strategy(&self) -> Option<Strategy> {
        if !self.test_id.is_empty() {
            return Some(Strategy::TestId(self.test_id.clone()));
        }
        if !self.alt_text.is_empty() {
            return Some(Strategy::AltText(self.alt_text.clone()));
        }
        if !self.label.is_empty() {
            return Some(Strategy::Label(self.label.clone()));
        }
        if !self.placeholder.is_empty() {
            return Some(Strategy::Placeholder(self.placeholder.clone()));
        }
        if !self.text.is_empty() {
            return Some(Strategy::Text(self.text.clone()));
        }
        if !self.title.is_empty() {
            return Some(Strategy::Title(self.title.clone()));
        }
        if !self.selector.is_empty() {
            return Some(Strategy::Selector(self.selector.clone()));
        }
        None
    }

    /// Check whether any attribute is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategy().is_none()
    }
}

/// A selected lookup strategy carrying exactly one attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// `data-testid` attribute lookup
    TestId(String),
    /// `alt` attribute lookup
    AltText(String),
    /// Label text lookup (`aria-label`)
    Label(String),
    /// `placeholder` attribute lookup
    Placeholder(String),
    /// Text content lookup
    Text(String),
    /// `title` attribute lookup
    Title(String),
    /// Raw CSS selector
    Selector(String),
}

impl Strategy {
    /// The attribute value this strategy was built from
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::TestId(v)
            | Self::AltText(v)
            | Self::Label(v)
            | Self::Placeholder(v)
            | Self::Text(v)
            | Self::Title(v)
            | Self::Selector(v) => v,
        }
    }

    /// CSS rendering for attribute-based strategies.
    ///
    /// Text lookup has no CSS form; it is rendered as a content filter by
    /// [`crate::Locator::to_query`].
    #[must_use]
    pub fn as_css(&self) -> Option<String> {
        match self {
            Self::TestId(v) => Some(format!("[data-testid=\"{v}\"]")),
            Self::AltText(v) => Some(format!("[alt=\"{v}\"]")),
            Self::Label(v) => Some(format!("[aria-label=\"{v}\"]")),
            Self::Placeholder(v) => Some(format!("[placeholder=\"{v}\"]")),
            Self::Title(v) => Some(format!("[title=\"{v}\"]")),
            Self::Selector(v) => Some(v.clone()),
            Self::Text(_) => None,
        }
    }
}

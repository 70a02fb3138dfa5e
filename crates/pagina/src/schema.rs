//! Typed page-object schemas.
//!
//! A [`PageSchema`] is the compile-time replacement for an annotated class
//! hierarchy: each [`SchemaLevel`] corresponds to one class in the hierarchy
//! (base levels first), and each [`FieldSpec`] declares how one locator field
//! is found, its optional scoped-under dependency, and its optional frame.
//!
//! Schemas are plain data with no invariants beyond "a declared dependency
//! field must exist and resolve before use", which [`crate::PageFactory`]
//! enforces at construction time.

use serde::{Deserialize, Serialize};

use crate::factory::ResolvedFields;
use crate::find_by::FindBy;
use crate::result::PaginaResult;

/// Kind of value a page-object field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// A single strict [`crate::Locator`]
    Locator,
    /// An all-matches [`crate::ElementHandles`] list
    Handles,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locator => write!(f, "Locator"),
            Self::Handles => write!(f, "ElementHandles"),
        }
    }
}

/// Declaration of a single locator field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, unique within the page-object hierarchy
    pub name: String,
    /// Lookup attributes
    pub find_by: FindBy,
    /// Name of the field this locator is scoped under, if any
    pub parent: Option<String>,
    /// Frame selector this locator resolves inside, if any
    pub frame: Option<String>,
    /// Kind of value the field holds
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declare a locator field
    #[must_use]
    pub fn new(name: impl Into<String>, find_by: FindBy) -> Self {
        Self {
            name: name.into(),
            find_by,
            parent: None,
            frame: None,
            kind: FieldKind::Locator,
        }
    }

    /// Scope this field under another field's locator
    #[must_use]
    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Resolve this field inside a frame
    #[must_use]
    pub fn in_frame(mut self, frame_selector: impl Into<String>) -> Self {
        self.frame = Some(frame_selector.into());
        self
    }

    /// Hold every match as a handle list instead of a single locator
    #[must_use]
    pub fn as_handles(mut self) -> Self {
        self.kind = FieldKind::Handles;
        self
    }

    /// Whether this field declares a scoped-under dependency
    #[must_use]
    pub fn has_dependency(&self) -> bool {
        self.parent.is_some()
    }
}

/// One class-hierarchy level of a page schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaLevel {
    /// Type name of the level, used in diagnostics
    pub type_name: String,
    /// Fields declared at this level, in declaration order
    pub fields: Vec<FieldSpec>,
}

/// Declared-and-inherited locator fields of a page object.
///
/// Levels are ordered base-first, so base-class fields are resolved before
/// derived-class fields by construction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSchema {
    levels: Vec<SchemaLevel>,
}

impl PageSchema {
    /// Start building a schema for the named page-object type
    #[must_use]
    pub fn builder(type_name: impl Into<String>) -> PageSchemaBuilder {
        PageSchemaBuilder {
            type_name: type_name.into(),
            base: None,
            frame: None,
            fields: Vec::new(),
        }
    }

    /// The hierarchy levels, base-first
    #[must_use]
    pub fn levels(&self) -> &[SchemaLevel] {
        &self.levels
    }

    /// The page-object type name (the most-derived level)
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.levels
            .last()
            .map_or("<anonymous>", |level| level.type_name.as_str())
    }

    /// Total number of declared fields across all levels
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.levels.iter().map(|level| level.fields.len()).sum()
    }
}

/// Builder for [`PageSchema`].
#[derive(Debug, Clone)]
pub struct PageSchemaBuilder {
    type_name: String,
    base: Option<PageSchema>,
    frame: Option<String>,
    fields: Vec<FieldSpec>,
}

impl PageSchemaBuilder {
    /// Inherit the levels of a base page schema (resolved first)
    #[must_use]
    pub fn extends(mut self, base: PageSchema) -> Self {
        self.base = Some(base);
        self
    }

    /// Resolve every field of this level inside a frame, unless the field
    /// declares its own frame
    #[must_use]
    pub fn frame(mut self, frame_selector: impl Into<String>) -> Self {
        self.frame = Some(frame_selector.into());
        self
    }

    /// Declare a field at this level
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Build the schema
    #[must_use]
    pub fn build(self) -> PageSchema {
        let mut levels = self.base.map(|base| base.levels).unwrap_or_default();
        let fields = self
            .fields
            .into_iter()
            .map(|mut spec| {
                if spec.frame.is_none() {
                    spec.frame.clone_from(&self.frame);
                }
                spec
            })
            .collect();
        levels.push(SchemaLevel {
            type_name: self.type_name,
            fields,
        });
        PageSchema { levels }
    }
}

/// A typed page object that can be instantiated and populated by
/// [`crate::PageFactory`].
pub trait PageModel: Sized {
    /// The declared-and-inherited locator fields of this page object
    fn schema() -> PageSchema;

    /// Build the page object from resolved fields.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared field is missing from `fields` or holds
    /// the wrong kind of value.
    fn from_fields(fields: &mut ResolvedFields) -> PaginaResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod field_spec_tests {
        use super::*;

        #[test]
        fn test_field_defaults() {
            let spec = FieldSpec::new("submit", FindBy::selector("button"));
            assert_eq!(spec.kind, FieldKind::Locator);
            assert!(spec.parent.is_none());
            assert!(spec.frame.is_none());
            assert!(!spec.has_dependency());
        }

        #[test]
        fn test_under_declares_dependency() {
            let spec = FieldSpec::new("link", FindBy::selector("a")).under("sidebar");
            assert_eq!(spec.parent.as_deref(), Some("sidebar"));
            assert!(spec.has_dependency());
        }

        #[test]
        fn test_as_handles() {
            let spec = FieldSpec::new("rows", FindBy::selector("tr")).as_handles();
            assert_eq!(spec.kind, FieldKind::Handles);
        }
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn test_single_level_schema() {
            let schema = PageSchema::builder("LoginPage")
                .field(FieldSpec::new("username", FindBy::label("Username")))
                .field(FieldSpec::new("password", FindBy::label("Password")))
                .build();

            assert_eq!(schema.levels().len(), 1);
            assert_eq!(schema.type_name(), "LoginPage");
            assert_eq!(schema.field_count(), 2);
        }

        #[test]
        fn test_extends_puts_base_levels_first() {
            let base = PageSchema::builder("BasePage")
                .field(FieldSpec::new("header", FindBy::selector("header")))
                .build();
            let schema = PageSchema::builder("DocsPage")
                .extends(base)
                .field(FieldSpec::new("logo", FindBy::selector(".navbar__brand")))
                .build();

            assert_eq!(schema.levels().len(), 2);
            assert_eq!(schema.levels()[0].type_name, "BasePage");
            assert_eq!(schema.type_name(), "DocsPage");
        }

        #[test]
        fn test_level_frame_applies_to_unset_fields() {
            let schema = PageSchema::builder("CheckoutFrame")
                .frame("#checkout")
                .field(FieldSpec::new("pay", FindBy::text("Pay now")))
                .field(FieldSpec::new("banner", FindBy::selector(".ad")).in_frame("#ads"))
                .build();

            let fields = &schema.levels()[0].fields;
            assert_eq!(fields[0].frame.as_deref(), Some("#checkout"));
            assert_eq!(fields[1].frame.as_deref(), Some("#ads"));
        }
    }
}

//! Field decoration: turning a [`FieldSpec`] into a live field value.
//!
//! [`FieldDecorator`] is the seam [`crate::PageFactory`] drives. The stock
//! decorators build locator handles through [`LocatorFactory`]:
//! [`LocatorFieldDecorator`] supports single-locator fields only, while
//! [`ElementFieldDecorator`] additionally supports handle-list fields.

use crate::factory::{FieldValue, ResolvedFields};
use crate::locator::{ElementHandles, Locator, Scope};
use crate::result::{PaginaError, PaginaResult};
use crate::schema::{FieldKind, FieldSpec};

/// Creates the value for one declared field.
pub trait FieldDecorator {
    /// Decorate a field, given the fields already resolved for this page.
    ///
    /// # Errors
    ///
    /// Returns an error if the field's kind is unsupported or its descriptor
    /// cannot produce a locator.
    fn decorate(&self, field: &FieldSpec, resolved: &ResolvedFields) -> PaginaResult<FieldValue>;
}

/// Builds [`Locator`] handles from field declarations.
///
/// Scope selection: a declared parent wins over a declared frame; a frame
/// applies only when no parent is declared; otherwise the page root.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocatorFactory;

impl LocatorFactory {
    /// Create a locator factory
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the locator for a field.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::MissingLookup`] when no lookup attribute is set,
    /// or an error when the declared parent is absent or not a single locator.
    pub fn create_locator(
        &self,
        field: &FieldSpec,
        resolved: &ResolvedFields,
    ) -> PaginaResult<Locator> {
        let strategy = field
            .find_by
            .strategy()
            .ok_or_else(|| PaginaError::MissingLookup {
                field: field.name.clone(),
            })?;

        let scope = match (&field.parent, &field.frame) {
            (Some(parent), _) => Scope::Parent(Box::new(resolved.locator(parent)?.clone())),
            (None, Some(frame)) => Scope::Frame(frame.clone()),
            (None, None) => Scope::Root,
        };

        Ok(Locator::scoped(strategy, scope))
    }
}

/// Decorator producing single [`Locator`] values only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocatorFieldDecorator {
    factory: LocatorFactory,
}

impl LocatorFieldDecorator {
    /// Create the decorator
    #[must_use]
    pub fn new() -> Self {
        Self {
            factory: LocatorFactory::new(),
        }
    }
}

impl FieldDecorator for LocatorFieldDecorator {
    fn decorate(&self, field: &FieldSpec, resolved: &ResolvedFields) -> PaginaResult<FieldValue> {
        match field.kind {
            FieldKind::Locator => Ok(FieldValue::Locator(
                self.factory.create_locator(field, resolved)?,
            )),
            FieldKind::Handles => Err(PaginaError::UnsupportedFieldKind {
                field: field.name.clone(),
                kind: field.kind.to_string(),
            }),
        }
    }
}

/// Decorator producing both single locators and handle lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFieldDecorator {
    factory: LocatorFactory,
}

impl ElementFieldDecorator {
    /// Create the decorator
    #[must_use]
    pub fn new() -> Self {
        Self {
            factory: LocatorFactory::new(),
        }
    }
}

impl FieldDecorator for ElementFieldDecorator {
    fn decorate(&self, field: &FieldSpec, resolved: &ResolvedFields) -> PaginaResult<FieldValue> {
        let locator = self.factory.create_locator(field, resolved)?;
        match field.kind {
            FieldKind::Locator => Ok(FieldValue::Locator(locator)),
            FieldKind::Handles => Ok(FieldValue::Handles(ElementHandles::new(locator))),
        }
    }
}

//! Dependency-ordered page-object construction.
//!
//! [`PageFactory`] populates a page object from its [`crate::PageSchema`]:
//! for each hierarchy level (base levels first, by construction order), fields
//! without a declared dependency are resolved immediately in declaration
//! order; fields scoped under another field go onto a worklist that is drained
//! by fixed-point passes: a pass moves every field whose dependency name is
//! already resolved, and a pass that makes no progress while the worklist is
//! non-empty is a fatal configuration error (missing or cyclic dependency)
//! reporting exactly the stuck field names.
//!
//! Resolved names accumulate across levels, so a derived-class field may be
//! scoped under a base-class field, but never the other way around.

use std::collections::HashMap;

use tracing::debug;

use crate::decorator::{ElementFieldDecorator, FieldDecorator, LocatorFieldDecorator};
use crate::locator::{ElementHandles, Locator};
use crate::result::{PaginaError, PaginaResult};
use crate::schema::{PageModel, PageSchema};

/// A resolved page-object field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single locator
    Locator(Locator),
    /// A list of element handles
    Handles(ElementHandles),
}

impl FieldValue {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Locator(_) => "Locator",
            Self::Handles(_) => "ElementHandles",
        }
    }
}

/// Fully resolved fields of a page object, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct ResolvedFields {
    page: String,
    values: HashMap<String, FieldValue>,
}

impl ResolvedFields {
    /// Create an empty set for the named page-object type
    #[must_use]
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            values: HashMap::new(),
        }
    }

    /// The page-object type name these fields belong to
    #[must_use]
    pub fn page_name(&self) -> &str {
        &self.page
    }

    /// Whether a field name has been resolved
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of resolved fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no fields have been resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Insert a resolved value
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let _ = self.values.insert(name.into(), value);
    }

    /// Borrow a resolved value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Borrow a resolved single locator.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::MissingField`] when the name is unresolved, or
    /// [`PaginaError::UnsupportedFieldKind`] when it holds a handle list.
    pub fn locator(&self, name: &str) -> PaginaResult<&Locator> {
        match self.values.get(name) {
            Some(FieldValue::Locator(locator)) => Ok(locator),
            Some(other) => Err(PaginaError::UnsupportedFieldKind {
                field: name.to_string(),
                kind: other.kind_name().to_string(),
            }),
            None => Err(PaginaError::MissingField {
                field: name.to_string(),
            }),
        }
    }

    /// Take ownership of a resolved single locator.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ResolvedFields::locator`].
    pub fn take_locator(&mut self, name: &str) -> PaginaResult<Locator> {
        match self.values.remove(name) {
            Some(FieldValue::Locator(locator)) => Ok(locator),
            Some(other) => {
                // Put it back; a kind mismatch must not lose the value.
                let kind = other.kind_name().to_string();
                self.values.insert(name.to_string(), other);
                Err(PaginaError::UnsupportedFieldKind {
                    field: name.to_string(),
                    kind,
                })
            }
            None => Err(PaginaError::MissingField {
                field: name.to_string(),
            }),
        }
    }

    /// Take ownership of a resolved handle list.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::MissingField`] when the name is unresolved, or
    /// [`PaginaError::UnsupportedFieldKind`] when it holds a single locator.
    pub fn take_handles(&mut self, name: &str) -> PaginaResult<ElementHandles> {
        match self.values.remove(name) {
            Some(FieldValue::Handles(handles)) => Ok(handles),
            Some(other) => {
                let kind = other.kind_name().to_string();
                self.values.insert(name.to_string(), other);
                Err(PaginaError::UnsupportedFieldKind {
                    field: name.to_string(),
                    kind,
                })
            }
            None => Err(PaginaError::MissingField {
                field: name.to_string(),
            }),
        }
    }
}

/// Instantiates page objects and populates their declared fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageFactory;

impl PageFactory {
    /// Create and populate a typed page object with the default
    /// single-locator decorator.
    ///
    /// # Errors
    ///
    /// Returns an error when a field kind is unsupported or a declared
    /// dependency cannot be satisfied.
    pub fn create<P: PageModel>() -> PaginaResult<P> {
        Self::create_with::<P>(&LocatorFieldDecorator::new())
    }

    /// Create and populate a typed page object supporting handle-list fields.
    ///
    /// # Errors
    ///
    /// Returns an error when a declared dependency cannot be satisfied.
    pub fn create_elements<P: PageModel>() -> PaginaResult<P> {
        Self::create_with::<P>(&ElementFieldDecorator::new())
    }

    /// Create and populate a typed page object with a custom decorator.
    ///
    /// # Errors
    ///
    /// Propagates decorator errors and dependency-resolution failures.
    pub fn create_with<P: PageModel>(decorator: &dyn FieldDecorator) -> PaginaResult<P> {
        let mut fields = Self::init_fields(&P::schema(), decorator)?;
        P::from_fields(&mut fields)
    }

    /// Resolve every declared field of a schema in dependency order.
    ///
    /// # Errors
    ///
    /// Returns [`PaginaError::UnresolvedDependencies`] listing the stuck
    /// fields when a fixed-point pass makes no progress, or any decorator
    /// error.
    pub fn init_fields(
        schema: &PageSchema,
        decorator: &dyn FieldDecorator,
    ) -> PaginaResult<ResolvedFields> {
        let mut resolved = ResolvedFields::new(schema.type_name());

        for level in schema.levels() {
            let mut worklist = Vec::new();

            for field in &level.fields {
                if field.has_dependency() {
                    worklist.push(field);
                    continue;
                }
                let value = decorator.decorate(field, &resolved)?;
                debug!(page = %level.type_name, field = %field.name, "resolved field");
                resolved.insert(field.name.clone(), value);
            }

            while !worklist.is_empty() {
                let size_before = worklist.len();
                let mut still_pending = Vec::new();

                for field in worklist {
                    let satisfied = field
                        .parent
                        .as_deref()
                        .is_some_and(|dep| resolved.contains(dep));
                    if satisfied {
                        let value = decorator.decorate(field, &resolved)?;
                        debug!(
                            page = %level.type_name,
                            field = %field.name,
                            parent = field.parent.as_deref(),
                            "resolved scoped field"
                        );
                        resolved.insert(field.name.clone(), value);
                    } else {
                        still_pending.push(field);
                    }
                }

                if still_pending.len() == size_before {
                    let fields = still_pending
                        .iter()
                        .map(|field| field.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(PaginaError::UnresolvedDependencies {
                        page: level.type_name.clone(),
                        fields,
                    });
                }
                worklist = still_pending;
            }
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decorator::ElementFieldDecorator;
    use crate::find_by::FindBy;
    use crate::locator::Scope;
    use crate::schema::FieldSpec;

    fn init(schema: &PageSchema) -> PaginaResult<ResolvedFields> {
        PageFactory::init_fields(schema, &ElementFieldDecorator::new())
    }

    mod ordering_tests {
        use super::*;

        #[test]
        fn test_independent_fields_resolve_before_dependents() {
            // Dependent declared BEFORE its parent; worklist must defer it.
            let schema = PageSchema::builder("Page")
                .field(FieldSpec::new("link", FindBy::selector("a")).under("sidebar"))
                .field(FieldSpec::new("sidebar", FindBy::selector(".sidebar")))
                .build();

            let resolved = init(&schema).unwrap();
            assert_eq!(resolved.len(), 2);

            let link = resolved.locator("link").unwrap();
            assert!(matches!(link.scope(), Scope::Parent(_)));
        }

        #[test]
        fn test_dependency_chain_resolves_transitively() {
            let schema = PageSchema::builder("Page")
                .field(FieldSpec::new("leaf", FindBy::selector("span")).under("branch"))
                .field(FieldSpec::new("branch", FindBy::selector("div")).under("trunk"))
                .field(FieldSpec::new("trunk", FindBy::selector("main")))
                .build();

            let resolved = init(&schema).unwrap();
            assert_eq!(resolved.len(), 3);

            // leaf's scope chain nests branch, which nests trunk
            let query = resolved.locator("leaf").unwrap().to_query();
            assert!(query.contains("main"));
            assert!(query.contains("div"));
            assert!(query.contains("span"));
        }

        #[test]
        fn test_base_level_resolves_before_derived_level() {
            let base = PageSchema::builder("BasePage")
                .field(FieldSpec::new("shell", FindBy::selector("#shell")))
                .build();
            let schema = PageSchema::builder("DocsPage")
                .extends(base)
                .field(FieldSpec::new("nav", FindBy::selector("nav")).under("shell"))
                .build();

            let resolved = init(&schema).unwrap();
            assert_eq!(resolved.page_name(), "DocsPage");
            assert!(matches!(
                resolved.locator("nav").unwrap().scope(),
                Scope::Parent(_)
            ));
        }

        #[test]
        fn test_base_field_cannot_depend_on_derived_field() {
            // Base levels resolve first regardless of dependency status, so a
            // base field scoped under a derived field is unsatisfiable.
            let base = PageSchema::builder("BasePage")
                .field(FieldSpec::new("early", FindBy::selector("div")).under("late"))
                .build();
            let schema = PageSchema::builder("DerivedPage")
                .extends(base)
                .field(FieldSpec::new("late", FindBy::selector("main")))
                .build();

            let err = init(&schema).unwrap_err();
            assert!(matches!(
                err,
                PaginaError::UnresolvedDependencies { page, fields }
                    if page == "BasePage" && fields == "early"
            ));
        }
    }

    mod failure_tests {
        use super::*;

        #[test]
        fn test_unknown_dependency_lists_the_field() {
            let schema = PageSchema::builder("Page")
                .field(FieldSpec::new("orphan", FindBy::selector("a")).under("no_such_field"))
                .build();

            let err = init(&schema).unwrap_err();
            assert!(matches!(
                err,
                PaginaError::UnresolvedDependencies { page, fields }
                    if page == "Page" && fields == "orphan"
            ));
        }

        #[test]
        fn test_cyclic_pair_lists_both_fields() {
            let schema = PageSchema::builder("Page")
                .field(FieldSpec::new("a", FindBy::selector(".a")).under("b"))
                .field(FieldSpec::new("b", FindBy::selector(".b")).under("a"))
                .build();

            let err = init(&schema).unwrap_err();
            assert!(matches!(
                err,
                PaginaError::UnresolvedDependencies { page, fields }
                    if page == "Page" && fields == "a, b"
            ));
        }

        #[test]
        fn test_cycle_detected_after_one_no_progress_pass() {
            // Counting decorator: a cyclic pair must decorate zero fields, so
            // the single no-progress pass does no element work at all.
            use std::cell::Cell;

            #[derive(Default)]
            struct Counting {
                calls: Cell<usize>,
            }
            impl FieldDecorator for Counting {
                fn decorate(
                    &self,
                    field: &FieldSpec,
                    resolved: &ResolvedFields,
                ) -> PaginaResult<FieldValue> {
                    self.calls.set(self.calls.get() + 1);
                    ElementFieldDecorator::new().decorate(field, resolved)
                }
            }

            let schema = PageSchema::builder("Page")
                .field(FieldSpec::new("a", FindBy::selector(".a")).under("b"))
                .field(FieldSpec::new("b", FindBy::selector(".b")).under("a"))
                .build();

            let decorator = Counting::default();
            assert!(PageFactory::init_fields(&schema, &decorator).is_err());
            assert_eq!(decorator.calls.get(), 0);
        }

        #[test]
        fn test_decorator_error_propagates() {
            // Default decorator rejects handle-list fields.
            let schema = PageSchema::builder("Page")
                .field(FieldSpec::new("rows", FindBy::selector("tr")).as_handles())
                .build();

            let err = PageFactory::init_fields(&schema, &LocatorFieldDecorator::new()).unwrap_err();
            assert!(matches!(err, PaginaError::UnsupportedFieldKind { .. }));
        }
    }

    mod resolved_fields_tests {
        use super::*;

        #[test]
        fn test_take_locator_wrong_kind_keeps_value() {
            let schema = PageSchema::builder("Page")
                .field(FieldSpec::new("rows", FindBy::selector("tr")).as_handles())
                .build();
            let mut resolved = init(&schema).unwrap();

            assert!(resolved.take_locator("rows").is_err());
            // Value must survive the failed access
            assert!(resolved.take_handles("rows").is_ok());
        }

        #[test]
        fn test_missing_field_error() {
            let mut resolved = ResolvedFields::new("Page");
            assert!(matches!(
                resolved.take_locator("ghost").unwrap_err(),
                PaginaError::MissingField { field } if field == "ghost"
            ));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        /// Build a schema of `n` fields where field i depends on some field
        /// j < i (or nothing), i.e. an arbitrary forest, always resolvable.
        fn forest_schema(parents: &[Option<usize>]) -> PageSchema {
            let mut builder = PageSchema::builder("Forest");
            for (i, parent) in parents.iter().enumerate() {
                let mut spec = FieldSpec::new(format!("f{i}"), FindBy::selector(format!(".f{i}")));
                if let Some(j) = parent {
                    spec = spec.under(format!("f{j}"));
                }
                builder = builder.field(spec);
            }
            builder.build()
        }

        proptest! {
            #[test]
            fn prop_any_dependency_forest_resolves(
                parents in prop::collection::vec(prop::option::of(0usize..16), 1..16)
            ) {
                // Clamp each parent below its own index to guarantee a DAG.
                let parents: Vec<Option<usize>> = parents
                    .iter()
                    .enumerate()
                    .map(|(i, p)| p.filter(|_| i > 0).map(|j| j % i))
                    .collect();
                let schema = forest_schema(&parents);
                let resolved = init(&schema).unwrap();
                prop_assert_eq!(resolved.len(), parents.len());
            }

            #[test]
            fn prop_self_dependency_always_fails(idx in 0usize..8) {
                let mut builder = PageSchema::builder("SelfLoop");
                for i in 0..8usize {
                    let mut spec =
                        FieldSpec::new(format!("f{i}"), FindBy::selector(format!(".f{i}")));
                    if i == idx {
                        spec = spec.under(format!("f{i}"));
                    }
                    builder = builder.field(spec);
                }
                let err = init(&builder.build()).unwrap_err();
                // Bound to a local: prop_assert! treats its stringified
                // condition as a format string, and pattern braces break it.
                let reported = matches!(
                    &err,
                    PaginaError::UnresolvedDependencies { fields, .. }
                        if *fields == format!("f{idx}")
                );
                prop_assert!(reported, "self-dependency not reported for f{}: {}", idx, err);
            }
        }
    }
}

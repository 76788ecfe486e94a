//! Per-model schema cache.
//!
//! Models are registered up front with a declaration function. The schema is built
//! the first time anyone asks for it and then shared for the registry's lifetime.
//! Each entry sits behind a `OnceCell`, so concurrent first access builds exactly
//! once; a failed build is cached the same way and keeps failing until the
//! declaration is fixed.

use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use super::error::SchemaError;
use super::model::ModelSchema;
use crate::error::{AdminError, Result};

/// A type that declares an admin model.
///
/// Implementors are usually zero-sized markers; the schema is the interesting
/// part.
///
/// ```
/// use adminkit::schema::{AdminModel, ModelSchema, SchemaError, FieldDescriptor, ValueKind};
/// use adminkit::models::base_settings;
///
/// struct ForumSettings;
///
/// impl AdminModel for ForumSettings {
///     const NAME: &'static str = "ForumSettings";
///
///     fn schema() -> Result<ModelSchema, SchemaError> {
///         base_settings()?
///             .extend(Self::NAME)
///             .field(FieldDescriptor::new("IsSiteLocked", ValueKind::Bool).list_visible())
///             .build()
///     }
/// }
/// ```
pub trait AdminModel: 'static {
    const NAME: &'static str;

    fn schema() -> std::result::Result<ModelSchema, SchemaError>;
}

type Declare = Box<dyn Fn() -> std::result::Result<ModelSchema, SchemaError> + Send + Sync>;

struct Entry {
    name: String,
    declare: Declare,
    cell: OnceCell<std::result::Result<Arc<ModelSchema>, SchemaError>>,
}

impl Entry {
    fn get(&self) -> std::result::Result<Arc<ModelSchema>, SchemaError> {
        self.cell
            .get_or_init(|| {
                let built = (self.declare)().and_then(|schema| {
                    if schema.name() != self.name {
                        return Err(SchemaError::NameMismatch {
                            registered: self.name.clone(),
                            built: schema.name().to_string(),
                        });
                    }
                    Ok(Arc::new(schema))
                });
                match &built {
                    Ok(schema) => debug!(model = %self.name, fields = schema.len(), "cached schema"),
                    Err(e) => warn!(model = %self.name, error = %e, "schema build failed"),
                }
                built
            })
            .clone()
    }
}

/// Registry of the models a deployment exposes.
#[derive(Default)]
pub struct SchemaRegistry {
    entries: Vec<Entry>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model under `name`. A later registration with the same name
    /// replaces the earlier one but keeps its position.
    pub fn register<F>(mut self, name: impl Into<String>, declare: F) -> Self
    where
        F: Fn() -> std::result::Result<ModelSchema, SchemaError> + Send + Sync + 'static,
    {
        let entry = Entry {
            name: name.into(),
            declare: Box::new(declare),
            cell: OnceCell::new(),
        };
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Registers an [`AdminModel`] under its declared name.
    pub fn register_model<M: AdminModel>(self) -> Self {
        self.register(M::NAME, M::schema)
    }

    /// Returns the cached schema for `name`, building it on first access.
    pub fn schema(&self, name: &str) -> Result<Arc<ModelSchema>> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| AdminError::ModelNotFound(name.to_string()))?;
        Ok(entry.get()?)
    }

    /// Returns the schema for a typed model.
    pub fn schema_of<M: AdminModel>(&self) -> Result<Arc<ModelSchema>> {
        self.schema(M::NAME)
    }

    /// Registered model names in registration order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds every schema now, returning the first failure.
    ///
    /// Deployments call this at startup so a broken declaration blocks the
    /// process instead of surfacing on first use.
    pub fn build_all(&self) -> Result<()> {
        for entry in &self.entries {
            entry.get()?;
        }
        Ok(())
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("models", &self.models().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldDescriptor, SchemaBuilder, ValueKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn simple(name: &'static str) -> impl Fn() -> std::result::Result<ModelSchema, SchemaError> {
        move || {
            SchemaBuilder::new(name)
                .field(FieldDescriptor::new("Title", ValueKind::Text))
                .build()
        }
    }

    #[test]
    fn schema_is_built_once_and_shared() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);
        let registry = SchemaRegistry::new().register("Page", || {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            SchemaBuilder::new("Page").build()
        });

        let first = registry.schema("Page").unwrap();
        let second = registry.schema("Page").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_first_access_builds_once() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);
        let registry = SchemaRegistry::new().register("Page", || {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            SchemaBuilder::new("Page").build()
        });

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| registry.schema("Page").unwrap());
            }
        });
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn build_errors_are_cached() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);
        let registry = SchemaRegistry::new().register("Broken", || {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            SchemaBuilder::new("Broken")
                .field(FieldDescriptor::new("A", ValueKind::Text))
                .field(FieldDescriptor::new("A", ValueKind::Text))
                .build()
        });

        assert!(matches!(
            registry.schema("Broken"),
            Err(AdminError::Schema(SchemaError::DuplicateName { .. }))
        ));
        assert!(registry.schema("Broken").is_err());
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert!(registry.build_all().is_err());
    }

    #[test]
    fn unknown_model_is_not_found() {
        let registry = SchemaRegistry::new();
        assert!(matches!(
            registry.schema("Nope"),
            Err(AdminError::ModelNotFound(name)) if name == "Nope"
        ));
    }

    #[test]
    fn registered_name_must_match_schema_name() {
        let registry = SchemaRegistry::new().register("Alias", simple("Real"));
        assert!(matches!(
            registry.schema("Alias"),
            Err(AdminError::Schema(SchemaError::NameMismatch { .. }))
        ));
    }

    #[test]
    fn typed_models_register_under_their_name() {
        struct Page;
        impl AdminModel for Page {
            const NAME: &'static str = "Page";

            fn schema() -> std::result::Result<ModelSchema, SchemaError> {
                simple("Page")()
            }
        }

        let registry = SchemaRegistry::new().register_model::<Page>();
        assert!(registry.contains("Page"));
        assert_eq!(registry.schema_of::<Page>().unwrap().name(), "Page");
    }

    #[test]
    fn models_keep_registration_order_and_replace_in_place() {
        let registry = SchemaRegistry::new()
            .register("B", simple("B"))
            .register("A", simple("A"))
            .register("B", simple("B"));
        assert_eq!(registry.models().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.build_all().is_ok());
    }
}

//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every admin operation, whichever UI drives it.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Owns** the runtime pieces built at startup: schema registry, record
//!   store, mapper, path resolver, configuration and layouts
//! - **Dispatches** to the matching command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! Business logic belongs in `commands/*.rs`; presentation belongs to the UI.
//!
//! ## Generic Over StorageBackend
//!
//! `AdminApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `AdminApi<FsBackend>`
//! - Testing: `AdminApi<MemBackend>`
//!
//! ## Testing Strategy
//!
//! API tests verify dispatch and wiring, not command logic (tested in the
//! command modules).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::commands::{self, CmdResult, FieldUpdate};
use crate::config::AdminConfig;
use crate::error::{AdminError, Result};
use crate::mapper::Mapper;
use crate::paths::PathResolver;
use crate::schema::SchemaRegistry;
use crate::store::{RecordStore, StorageBackend};

/// The main API facade for admin operations.
pub struct AdminApi<B: StorageBackend> {
    registry: SchemaRegistry,
    store: RecordStore<B>,
    settings_model: String,
    mapper: Mapper,
    resolver: PathResolver,
    config: AdminConfig,
    config_sources: Vec<PathBuf>,
    layouts: HashMap<String, String>,
}

impl<B: StorageBackend> AdminApi<B> {
    /// Creates a facade over `registry` and `store`.
    ///
    /// `settings_model` names the registered model edited by the settings page.
    pub fn new(
        registry: SchemaRegistry,
        store: RecordStore<B>,
        settings_model: impl Into<String>,
    ) -> Result<Self> {
        let settings_model = settings_model.into();
        if !registry.contains(&settings_model) {
            return Err(AdminError::ModelNotFound(settings_model));
        }
        Ok(Self {
            registry,
            store,
            settings_model,
            mapper: Mapper::default(),
            resolver: PathResolver::new(None, "."),
            config: AdminConfig::default(),
            config_sources: Vec::new(),
            layouts: HashMap::new(),
        })
    }

    pub fn with_mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn with_resolver(mut self, resolver: PathResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_config(mut self, config: AdminConfig, sources: Vec<PathBuf>) -> Self {
        self.config = config;
        self.config_sources = sources;
        self
    }

    pub fn with_layout(mut self, model: impl Into<String>, markup: impl Into<String>) -> Self {
        self.layouts.insert(model.into(), markup.into());
        self
    }

    /// Builds every registered schema, failing on the first broken model.
    pub fn check(&self) -> Result<()> {
        self.registry.build_all()
    }

    pub fn models(&self) -> Result<CmdResult> {
        commands::schema::list_models(&self.registry)
    }

    pub fn schema(&self, model: &str) -> Result<CmdResult> {
        commands::schema::show(&self.registry, model)
    }

    pub fn settings(&self) -> Result<CmdResult> {
        commands::settings::show(&self.registry, &self.store, &self.settings_model)
    }

    pub fn save_settings(&self, updates: &[FieldUpdate]) -> Result<CmdResult> {
        commands::settings::save(&self.registry, &self.store, &self.settings_model, updates)
    }

    pub fn list(&self, model: &str) -> Result<CmdResult> {
        commands::records::list(&self.registry, &self.store, model)
    }

    pub fn get(&self, model: &str, id: &str) -> Result<CmdResult> {
        commands::records::get(&self.registry, &self.store, model, id)
    }

    pub fn create(&self, model: &str, updates: &[FieldUpdate]) -> Result<CmdResult> {
        self.reject_settings_model(model, "create")?;
        commands::records::create(&self.registry, &self.store, model, updates)
    }

    pub fn update(&self, model: &str, id: &str, updates: &[FieldUpdate]) -> Result<CmdResult> {
        commands::records::update(&self.registry, &self.store, model, id, updates)
    }

    pub fn delete(&self, model: &str, id: &str) -> Result<CmdResult> {
        self.reject_settings_model(model, "delete")?;
        commands::records::delete(&self.registry, &self.store, model, id)
    }

    /// Projects `model`'s records into a mapped shape. The settings model
    /// projects its single record, defaults included.
    pub fn project(&self, model: &str, destination: &str) -> Result<CmdResult> {
        if model == self.settings_model {
            commands::settings::project(&self.registry, &self.store, &self.mapper, model, destination)
        } else {
            commands::records::project(&self.registry, &self.store, &self.mapper, model, destination)
        }
    }

    /// The settings model has exactly one record, edited in place.
    fn reject_settings_model(&self, model: &str, action: &str) -> Result<()> {
        if model == self.settings_model {
            return Err(AdminError::Api(format!(
                "cannot {} {} records: there is one settings record, edit it with `settings`",
                action, model
            )));
        }
        Ok(())
    }

    pub fn layout(&self, model: &str) -> Result<CmdResult> {
        commands::layout::show(&self.registry, &self.layouts, model)
    }

    pub fn resolve_paths(&self, inputs: &[String]) -> Result<CmdResult> {
        commands::paths::resolve(&self.resolver, &self.config.api, inputs)
    }

    pub fn config(&self) -> Result<CmdResult> {
        commands::config::show(&self.config, self.config_sources.clone())
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn admin_config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn settings_model(&self) -> &str {
        &self.settings_model
    }

    pub fn has_layout(&self, model: &str) -> bool {
        self.layouts.contains_key(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forum;
    use crate::schema::FieldValue;
    use crate::store::MemoryStore;

    fn api() -> AdminApi<crate::store::mem_backend::MemBackend> {
        forum::api(MemoryStore::in_memory()).unwrap()
    }

    #[test]
    fn new_requires_registered_settings_model() {
        let err = AdminApi::new(forum::registry(), MemoryStore::in_memory(), "SiteSettings")
            .err()
            .unwrap();
        assert!(matches!(err, AdminError::ModelNotFound(_)));
    }

    #[test]
    fn settings_round_trip() {
        let api = api();
        api.save_settings(&[FieldUpdate::new("IsSiteLocked", "on")])
            .unwrap();
        let res = api.settings().unwrap();
        assert_eq!(res.records[0].get("IsSiteLocked"), &FieldValue::Bool(true));
    }

    #[test]
    fn dispatches_record_commands() {
        let api = api();
        let created = api
            .create(
                "Role",
                &[
                    FieldUpdate::new("Name", "Moderators"),
                    FieldUpdate::new("Permissions", "content.moderate"),
                ],
            )
            .unwrap();
        let id = created.records[0].id.clone();
        assert_eq!(api.list("Role").unwrap().records.len(), 1);
        assert_eq!(api.get("Role", &id).unwrap().records[0].id, id);
        api.update("Role", &id, &[FieldUpdate::new("Description", "Keep it civil")])
            .unwrap();
        api.delete("Role", &id).unwrap();
        assert!(api.list("Role").unwrap().records.is_empty());
    }

    #[test]
    fn settings_model_keeps_a_single_record() {
        let api = api();
        api.save_settings(&[FieldUpdate::new("SiteName", "Lounge")])
            .unwrap();

        let err = api
            .create("ForumSettings", &[FieldUpdate::new("SiteName", "Dup")])
            .unwrap_err();
        assert!(matches!(err, AdminError::Api(ref msg) if msg.contains("settings")));
        assert!(matches!(
            api.delete("ForumSettings", "default"),
            Err(AdminError::Api(_))
        ));

        let stored = api.list("ForumSettings").unwrap().records;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].get("SiteName"), &FieldValue::Text("Lounge".into()));
    }

    #[test]
    fn project_settings_model_uses_settings_record() {
        let api = api();
        api.save_settings(&[FieldUpdate::new("IsSiteLocked", "true")])
            .unwrap();
        let res = api.project("ForumSettings", forum::PUBLIC_SITE_INFO).unwrap();
        assert_eq!(res.projections[0]["Status"], "locked");
    }

    #[test]
    fn layouts_and_paths() {
        let api = api().with_resolver(PathResolver::new(Some("/srv/www".into()), "/srv/app"));
        assert!(api.has_layout("ForumSettings"));
        assert!(api.layout("ForumSettings").unwrap().layout.is_some());
        let res = api.resolve_paths(&[]).unwrap();
        assert_eq!(res.paths, vec![PathBuf::from("/srv/www/uploads")]);
    }

    #[test]
    fn file_store_persists_between_facades() {
        let env = crate::test_utils::TestEnv::new();
        env.api
            .save_settings(&[FieldUpdate::new("SiteName", "Lounge")])
            .unwrap();
        assert!(env.root.join("data").join("ForumSettings.json").exists());

        let reopened = forum::api(crate::store::FileStore::at(env.root.join("data"))).unwrap();
        assert_eq!(
            reopened.settings().unwrap().records[0].get("SiteName"),
            &FieldValue::Text("Lounge".into())
        );
    }

    #[test]
    fn check_builds_everything() {
        assert!(api().check().is_ok());
        assert_eq!(api().models().unwrap().models.len(), 3);
    }
}

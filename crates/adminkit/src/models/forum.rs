//! The forum administration deployment.
//!
//! Extends the framework bases with the handful of fields a forum needs, registers
//! its models and projections, and ships form layouts for the detail pages.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::base::{base_admin_user, base_settings, Role};
use crate::api::AdminApi;
use crate::error::Result as AdminResult;
use crate::mapper::{MapperConfiguration, MapperProfile, Shape};
use crate::schema::{
    AdminModel, FieldDescriptor, ModelSchema, SchemaError, SchemaRegistry, ValueKind, WidgetKind,
};
use crate::store::{RecordStore, StorageBackend};

pub struct ForumSettings;

impl AdminModel for ForumSettings {
    const NAME: &'static str = "ForumSettings";

    fn schema() -> Result<ModelSchema, SchemaError> {
        settings()
    }
}

pub struct ForumAdminUser;

impl AdminModel for ForumAdminUser {
    const NAME: &'static str = "ForumAdminUser";

    fn schema() -> Result<ModelSchema, SchemaError> {
        admin_user()
    }
}

/// Forum settings: the empty settings base plus the forum's own switches.
pub fn settings() -> Result<ModelSchema, SchemaError> {
    base_settings()?
        .extend(ForumSettings::NAME)
        .title("Forum Settings")
        .field(
            FieldDescriptor::new("IsSiteLocked", ValueKind::Bool)
                .widget(WidgetKind::Checkbox)
                .tooltip("Only administrators can sign in while the site is locked")
                .group("Site")
                .list_visible()
                .default_value(false),
        )
        .field(
            FieldDescriptor::new("SiteName", ValueKind::Text)
                .group("Site")
                .list_visible()
                .required()
                .max_length(80)
                .default_value("Forum"),
        )
        .field(
            FieldDescriptor::new("PostsPerPage", ValueKind::Integer)
                .group("Content")
                .range(5.0, 100.0)
                .default_value(20i64),
        )
        .field(
            FieldDescriptor::new("AllowRegistration", ValueKind::Bool)
                .tooltip("Let visitors create their own accounts")
                .group("Content")
                .default_value(true),
        )
        .build()
}

/// Forum admin users: the base admin user plus moderation details.
pub fn admin_user() -> Result<ModelSchema, SchemaError> {
    base_admin_user()?
        .extend(ForumAdminUser::NAME)
        .title("Forum Admin User")
        .field(
            FieldDescriptor::new("IsModerator", ValueKind::Bool)
                .label("Moderator")
                .group("Access")
                .list_visible()
                .default_value(false),
        )
        .field(
            FieldDescriptor::new("Signature", ValueKind::Text)
                .widget(WidgetKind::TextArea)
                .group("Profile")
                .max_length(200),
        )
        .build()
}

/// The models the forum deployment exposes, in menu order.
pub fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .register_model::<ForumSettings>()
        .register_model::<ForumAdminUser>()
        .register_model::<Role>()
}

/// The forum deployment wired over `store`: models, projections and layouts.
///
/// Every schema and mapping is checked here, so a broken declaration stops
/// startup.
pub fn api<B: StorageBackend>(store: RecordStore<B>) -> AdminResult<AdminApi<B>> {
    let profile = ForumProfile::new()?;
    let mapper = MapperConfiguration::from_profiles(&[&profile])?.create_mapper()?;
    let mut api = AdminApi::new(registry(), store, ForumSettings::NAME)?.with_mapper(mapper);
    for model in [ForumSettings::NAME, ForumAdminUser::NAME] {
        if let Some(markup) = layout(model) {
            api = api.with_layout(model, markup);
        }
    }
    api.check()?;
    Ok(api)
}

/// Form layout markup for a model's detail page.
pub fn layout(model: &str) -> Option<&'static str> {
    match model {
        ForumSettings::NAME => Some(SETTINGS_LAYOUT),
        ForumAdminUser::NAME => Some(ADMIN_USER_LAYOUT),
        _ => None,
    }
}

const SETTINGS_LAYOUT: &str = "\
[tab General]
  [container Site]
    SiteName
    IsSiteLocked
  [/container]
[/tab]
[tab Content]
  PostsPerPage
  AllowRegistration
[/tab]
";

const ADMIN_USER_LAYOUT: &str = "\
[tab Account]
  [container Identity]
    UserName
    Email
    IsActive
  [/container]
  [container Access]
    Roles
    IsModerator
  [/container]
[/tab]
[tab Profile]
  Signature
[/tab]
";

/// The settings entity as the forum application stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsEntity {
    pub site_name: String,
    pub is_site_locked: bool,
    pub posts_per_page: i64,
    pub allow_registration: bool,
}

impl Default for SettingsEntity {
    fn default() -> Self {
        Self {
            site_name: "Forum".to_string(),
            is_site_locked: false,
            posts_per_page: 20,
            allow_registration: true,
        }
    }
}

/// Shape name of [`SettingsEntity`] in the mapper.
pub const SETTINGS_ENTITY: &str = "SettingsEntity";
/// Public, unauthenticated view of the site settings.
pub const PUBLIC_SITE_INFO: &str = "PublicSiteInfo";
/// Compact admin user row for API listings.
pub const ADMIN_USER_SUMMARY: &str = "AdminUserSummary";

/// Projections between the forum's entities and its admin/API shapes.
///
/// The admin-side shapes are read off the model schemas, so a field added to
/// a model must be mapped before the profile validates.
pub struct ForumProfile {
    settings: Shape,
    admin_user: Shape,
}

impl ForumProfile {
    pub fn new() -> Result<Self, SchemaError> {
        Ok(Self {
            settings: Shape::from_schema(&settings()?),
            admin_user: Shape::from_schema(&admin_user()?),
        })
    }
}

impl MapperProfile for ForumProfile {
    fn name(&self) -> &str {
        "forum"
    }

    fn register_mappings(&self, cfg: &mut MapperConfiguration) {
        let entity = Shape::new(
            SETTINGS_ENTITY,
            [
                "site_name",
                "is_site_locked",
                "posts_per_page",
                "allow_registration",
            ],
        );
        let settings = self.settings.clone();

        cfg.create_map(entity.clone(), settings.clone())
            .map_from("IsSiteLocked", "is_site_locked")
            .map_from("SiteName", "site_name")
            .map_from("PostsPerPage", "posts_per_page")
            .map_from("AllowRegistration", "allow_registration");

        cfg.create_map(settings.clone(), entity)
            .map_from("site_name", "SiteName")
            .map_from("is_site_locked", "IsSiteLocked")
            .map_from("posts_per_page", "PostsPerPage")
            .map_from("allow_registration", "AllowRegistration");

        cfg.create_map(
            settings,
            Shape::new(PUBLIC_SITE_INFO, ["SiteName", "Status", "Registration"]),
        )
        .convert("Status", "IsSiteLocked", |v| {
            json!(if v.as_bool() == Some(true) { "locked" } else { "open" })
        })
        .convert("Registration", "AllowRegistration", |v| {
            json!(if v.as_bool() == Some(false) { "closed" } else { "open" })
        });

        cfg.create_map(
            self.admin_user.clone(),
            Shape::new(
                ADMIN_USER_SUMMARY,
                ["UserName", "Email", "Active", "Moderator", "RoleCount"],
            ),
        )
        .map_from("Active", "IsActive")
        .map_from("Moderator", "IsModerator")
        .convert("RoleCount", "Roles", |v| {
            json!(v.as_array().map(Vec::len).unwrap_or(0))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::MapperConfiguration;
    use crate::schema::FieldValue;

    #[test]
    fn settings_extend_empty_base() {
        let schema = settings().unwrap();
        assert_eq!(schema.base(), Some("Settings"));
        assert!(schema.inherited_fields().is_empty());
        assert_eq!(schema.len(), 4);

        let locked = schema.field("IsSiteLocked").unwrap();
        assert_eq!(locked.widget, WidgetKind::Checkbox);
        assert!(locked.list_visible);
        assert_eq!(locked.label, "Is Site Locked");
        assert_eq!(
            schema.field("PostsPerPage").unwrap().default,
            FieldValue::Integer(20)
        );
    }

    #[test]
    fn admin_user_keeps_base_fields_first() {
        let base = base_admin_user().unwrap();
        let schema = admin_user().unwrap();
        assert_eq!(schema.len(), base.len() + 2);
        assert_eq!(schema.inherited_fields(), base.fields());
        let own: Vec<_> = schema.own_fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(own, vec!["IsModerator", "Signature"]);
    }

    #[test]
    fn registry_builds_every_model() {
        let registry = registry();
        registry.build_all().unwrap();
        assert_eq!(
            registry.models().collect::<Vec<_>>(),
            vec!["ForumSettings", "ForumAdminUser", "Role"]
        );
    }

    #[test]
    fn forum_profile_validates() {
        let cfg = MapperConfiguration::from_profiles(&[&ForumProfile::new().unwrap()]).unwrap();
        assert_eq!(cfg.type_maps().count(), 4);
    }

    #[test]
    fn entity_maps_to_settings_and_back() {
        let mapper = MapperConfiguration::from_profiles(&[&ForumProfile::new().unwrap()])
            .unwrap()
            .create_mapper()
            .unwrap();
        let entity = SettingsEntity {
            is_site_locked: true,
            ..SettingsEntity::default()
        };
        let settings = mapper
            .map(SETTINGS_ENTITY, ForumSettings::NAME, &serde_json::to_value(&entity).unwrap())
            .unwrap();
        assert_eq!(settings["IsSiteLocked"], json!(true));
        assert_eq!(settings["SiteName"], json!("Forum"));

        let back: SettingsEntity = mapper
            .map_into(ForumSettings::NAME, SETTINGS_ENTITY, &settings)
            .unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn public_info_hides_internal_fields() {
        let mapper = MapperConfiguration::from_profiles(&[&ForumProfile::new().unwrap()])
            .unwrap()
            .create_mapper()
            .unwrap();
        let info = mapper
            .map(
                ForumSettings::NAME,
                PUBLIC_SITE_INFO,
                &json!({"SiteName": "Forum", "IsSiteLocked": true, "PostsPerPage": 20, "AllowRegistration": false}),
            )
            .unwrap();
        assert_eq!(
            info,
            json!({"SiteName": "Forum", "Status": "locked", "Registration": "closed"})
        );
    }

    #[test]
    fn layouts_exist_for_forum_models() {
        assert!(layout(ForumSettings::NAME).is_some());
        assert!(layout(ForumAdminUser::NAME).is_some());
        assert!(layout("Role").is_none());
    }
}

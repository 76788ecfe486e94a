//! Framework base models.
//!
//! Deployments extend these rather than declaring settings and admin users from
//! scratch.

use crate::schema::{
    AdminModel, FieldDescriptor, ModelSchema, SchemaBuilder, SchemaError, ValueKind, WidgetKind,
};

/// Roles every deployment understands.
pub const ROLE_CHOICES: &[&str] = &["Administrator", "Editor", "Viewer"];

/// Permissions a role can grant.
pub const PERMISSION_CHOICES: &[&str] = &[
    "settings.edit",
    "users.manage",
    "content.moderate",
    "content.delete",
];

/// The empty settings base. Deployments add every settings field themselves.
pub fn base_settings() -> Result<ModelSchema, SchemaError> {
    SchemaBuilder::new(BaseSettings::NAME).build()
}

/// The admin user base: identity, activation and role membership.
pub fn base_admin_user() -> Result<ModelSchema, SchemaError> {
    SchemaBuilder::new(AdminUser::NAME)
        .title("Admin User")
        .field(
            FieldDescriptor::new("UserName", ValueKind::Text)
                .tooltip("Name used to sign in")
                .group("Account")
                .list_visible()
                .required()
                .min_length(3)
                .max_length(64),
        )
        .field(
            FieldDescriptor::new("Email", ValueKind::Text)
                .widget(WidgetKind::Email)
                .group("Account")
                .list_visible()
                .required()
                .pattern(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"),
        )
        .field(
            FieldDescriptor::new("IsActive", ValueKind::Bool)
                .label("Active")
                .tooltip("Inactive users cannot sign in")
                .group("Account")
                .list_visible()
                .default_value(true),
        )
        .field(
            FieldDescriptor::new("Roles", ValueKind::List)
                .group("Access")
                .choices(ROLE_CHOICES.iter().copied())
                .default_value(vec!["Viewer".to_string()]),
        )
        .field(
            FieldDescriptor::new("LastLogin", ValueKind::DateTime)
                .group("Activity")
                .tooltip("Set by the sign-in flow"),
        )
        .build()
}

/// Roles group permissions under a name.
pub fn role() -> Result<ModelSchema, SchemaError> {
    SchemaBuilder::new(Role::NAME)
        .field(
            FieldDescriptor::new("Name", ValueKind::Text)
                .list_visible()
                .required()
                .max_length(32),
        )
        .field(FieldDescriptor::new("Description", ValueKind::Text).widget(WidgetKind::TextArea))
        .field(
            FieldDescriptor::new("Permissions", ValueKind::List)
                .list_visible()
                .choices(PERMISSION_CHOICES.iter().copied()),
        )
        .build()
}

pub struct BaseSettings;

impl AdminModel for BaseSettings {
    const NAME: &'static str = "Settings";

    fn schema() -> Result<ModelSchema, SchemaError> {
        base_settings()
    }
}

pub struct AdminUser;

impl AdminModel for AdminUser {
    const NAME: &'static str = "AdminUser";

    fn schema() -> Result<ModelSchema, SchemaError> {
        base_admin_user()
    }
}

pub struct Role;

impl AdminModel for Role {
    const NAME: &'static str = "Role";

    fn schema() -> Result<ModelSchema, SchemaError> {
        role()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldValue;

    #[test]
    fn base_settings_is_empty() {
        let schema = base_settings().unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema.name(), "Settings");
    }

    #[test]
    fn settings_subclass_with_one_checkbox() {
        let schema = base_settings()
            .unwrap()
            .extend("ForumSettings")
            .field(
                FieldDescriptor::new("IsSiteLocked", ValueKind::Bool)
                    .widget(WidgetKind::Checkbox)
                    .list_visible(),
            )
            .build()
            .unwrap();

        assert_eq!(schema.len(), 1);
        let field = &schema.fields()[0];
        assert_eq!(field.name, "IsSiteLocked");
        assert_eq!(field.widget, WidgetKind::Checkbox);
        assert!(field.list_visible);
    }

    #[test]
    fn admin_user_lists_identity_columns() {
        let schema = base_admin_user().unwrap();
        let columns: Vec<_> = schema.list_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(columns, vec!["UserName", "Email", "IsActive"]);
        assert_eq!(schema.groups(), vec!["Account", "Access", "Activity"]);
        assert_eq!(
            schema.field("IsActive").map(|f| &f.default),
            Some(&FieldValue::Bool(true))
        );
    }

    #[test]
    fn role_schema_builds() {
        let schema = role().unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.field("Description").unwrap().widget, WidgetKind::TextArea);
    }
}

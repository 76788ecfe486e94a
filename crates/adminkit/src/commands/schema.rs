use crate::commands::{CmdMessage, CmdResult, ModelSummary};
use crate::error::Result;
use crate::schema::SchemaRegistry;

/// Summaries of every registered model, in registration order.
///
/// A model whose schema fails to build is reported and skipped; the others
/// stay usable.
pub fn list_models(registry: &SchemaRegistry) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut models = Vec::with_capacity(registry.len());
    for name in registry.models() {
        match registry.schema(name) {
            Ok(schema) => models.push(ModelSummary::of(&schema)),
            Err(e) => result.add_message(CmdMessage::error(e.to_string())),
        }
    }
    Ok(result.with_models(models))
}

pub fn show(registry: &SchemaRegistry, model: &str) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    Ok(CmdResult::default()
        .with_models(vec![ModelSummary::of(&schema)])
        .with_schema(&schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::models::forum;
    use crate::schema::{FieldDescriptor, SchemaBuilder, ValueKind};

    #[test]
    fn lists_registered_models() {
        let res = list_models(&forum::registry()).unwrap();
        let names: Vec<_> = res.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["ForumSettings", "ForumAdminUser", "Role"]);
        assert_eq!(res.models[0].columns, vec!["Is Site Locked", "Site Name"]);
        assert!(res.messages.is_empty());
    }

    #[test]
    fn broken_models_are_reported_not_fatal() {
        let registry = forum::registry().register("Broken", || {
            SchemaBuilder::new("Broken")
                .field(FieldDescriptor::new("A", ValueKind::Text).label("X"))
                .field(FieldDescriptor::new("B", ValueKind::Text).label("X"))
                .build()
        });
        let res = list_models(&registry).unwrap();
        assert_eq!(res.models.len(), 3);
        assert_eq!(res.messages.len(), 1);
        assert!(res.messages[0].content.contains("duplicate display label"));
    }

    #[test]
    fn show_includes_field_metadata() {
        let res = show(&forum::registry(), "ForumSettings").unwrap();
        let schema = res.schema.unwrap();
        assert_eq!(schema.name(), "ForumSettings");
        assert!(schema.field("IsSiteLocked").unwrap().list_visible);
    }

    #[test]
    fn show_unknown_model() {
        assert!(matches!(
            show(&forum::registry(), "Nope"),
            Err(AdminError::ModelNotFound(_))
        ));
    }
}

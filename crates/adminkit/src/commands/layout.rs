use std::collections::HashMap;

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::layout::{parse_layout, Layout};
use crate::schema::SchemaRegistry;

/// The parsed detail-page layout of `model`.
///
/// Models without registered markup get a flat layout listing every field. Bad
/// markup is an error, never silently flattened.
pub fn show(
    registry: &SchemaRegistry,
    layouts: &HashMap<String, String>,
    model: &str,
) -> Result<CmdResult> {
    let schema = registry.schema(model)?;
    let mut result = CmdResult::default().with_schema(&schema);
    let layout = match layouts.get(model) {
        Some(markup) => parse_layout(markup, &schema)?,
        None => {
            result.add_message(CmdMessage::info(format!(
                "No layout registered for {}, showing all fields",
                model
            )));
            Layout::flat(&schema)
        }
    };
    Ok(result.with_layout(layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::layout::LayoutError;
    use crate::models::forum;

    fn layouts() -> HashMap<String, String> {
        ["ForumSettings", "ForumAdminUser"]
            .into_iter()
            .filter_map(|m| forum::layout(m).map(|l| (m.to_string(), l.to_string())))
            .collect()
    }

    #[test]
    fn registered_layout_is_parsed() {
        let res = show(&forum::registry(), &layouts(), "ForumSettings").unwrap();
        let layout = res.layout.unwrap();
        assert!(layout.tab("General").is_some());
        assert!(res.messages.is_empty());
    }

    #[test]
    fn missing_layout_falls_back_to_flat() {
        let res = show(&forum::registry(), &layouts(), "Role").unwrap();
        assert_eq!(res.layout.unwrap().fields().count(), 3);
        assert_eq!(res.messages.len(), 1);
    }

    #[test]
    fn broken_markup_is_an_error() {
        let mut layouts = layouts();
        layouts.insert("Role".into(), "[container Main]\nName\n".into());
        let err = show(&forum::registry(), &layouts, "Role").unwrap_err();
        assert!(matches!(
            err,
            AdminError::Layout(LayoutError::MissingEndContainer { line: 1, .. })
        ));
    }
}

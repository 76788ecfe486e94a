//! Form layout markup.
//!
//! Detail pages can group a model's fields into tabs and containers. Layouts are
//! written as plain text, one directive or field name per line:
//!
//! ```text
//! [tab General]
//!   [container Site]
//!     SiteName
//!     IsSiteLocked
//!   [/container]
//!   PostsPerPage
//! [/tab]
//! ```
//!
//! Indentation is cosmetic. Blank lines and lines starting with `#` are skipped.
//! Fields placed directly in a tab land in an unnamed container; content outside
//! any tab lands in an unnamed tab where it appears. Schema fields the markup
//! never mentions are appended in a trailing "Other" container so nothing
//! becomes uneditable.
//!
//! Parsing is strict: an unclosed tab or container is a hard error pointing at
//! the line that opened it.

use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use crate::schema::ModelSchema;

/// Name of the container collecting fields the markup does not place.
pub const OTHER_CONTAINER: &str = "Other";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("line {line}: {kind} '{name}' is never closed")]
    MissingEndContainer {
        kind: String,
        name: String,
        line: usize,
    },

    #[error("line {line}: [/{kind}] without a matching [{kind}]")]
    UnexpectedEnd { kind: String, line: usize },

    #[error("line {line}: tab '{name}' opened inside another {parent}")]
    NestedTab {
        name: String,
        parent: String,
        line: usize,
    },

    #[error("line {line}: container '{name}' opened inside container '{parent}'")]
    NestedContainer {
        name: String,
        parent: String,
        line: usize,
    },

    #[error("line {line}: unknown field '{field}' in model {model}")]
    UnknownField {
        model: String,
        field: String,
        line: usize,
    },

    #[error("line {line}: field '{field}' is placed more than once")]
    DuplicateField { field: String, line: usize },

    #[error("line {line}: unknown directive '{directive}'")]
    UnknownDirective { directive: String, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Container {
    pub name: Option<String>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub name: Option<String>,
    pub containers: Vec<Container>,
}

impl Tab {
    fn unnamed() -> Self {
        Self {
            name: None,
            containers: Vec::new(),
        }
    }

    /// Appends a loose field to the tab's trailing unnamed container.
    fn push_loose(&mut self, field: String) {
        match self.containers.last_mut() {
            Some(c) if c.name.is_none() => c.fields.push(field),
            _ => self.containers.push(Container {
                name: None,
                fields: vec![field],
            }),
        }
    }
}

/// A parsed layout for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub model: String,
    pub tabs: Vec<Tab>,
}

impl Layout {
    /// Every placed field in display order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.tabs
            .iter()
            .flat_map(|t| t.containers.iter())
            .flat_map(|c| c.fields.iter().map(String::as_str))
    }

    pub fn tab(&self, name: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.name.as_deref() == Some(name))
    }

    /// A layout with every field in one unnamed container.
    pub fn flat(schema: &ModelSchema) -> Self {
        Self {
            model: schema.name().to_string(),
            tabs: vec![Tab {
                name: None,
                containers: vec![Container {
                    name: None,
                    fields: schema.fields().iter().map(|f| f.name.clone()).collect(),
                }],
            }],
        }
    }
}

enum Line<'a> {
    Open { kind: &'a str, name: &'a str },
    Close(&'a str),
    Field(&'a str),
}

fn classify(text: &str) -> Option<Line<'_>> {
    let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) else {
        return Some(Line::Field(text));
    };
    if let Some(kind) = inner.strip_prefix('/') {
        return Some(Line::Close(kind.trim()));
    }
    let (kind, name) = inner.split_once(char::is_whitespace)?;
    Some(Line::Open {
        kind,
        name: name.trim(),
    })
}

/// Parses layout markup against `schema`.
pub fn parse_layout(source: &str, schema: &ModelSchema) -> Result<Layout, LayoutError> {
    let mut tabs: Vec<Tab> = Vec::new();
    // (tab, opening line)
    let mut open_tab: Option<(Tab, usize)> = None;
    // (container, opening line)
    let mut open_container: Option<(Container, usize)> = None;
    let mut loose = Tab::unnamed();
    let mut placed: HashSet<String> = HashSet::new();

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let parsed = classify(text).ok_or_else(|| LayoutError::UnknownDirective {
            directive: text.to_string(),
            line,
        })?;

        match parsed {
            Line::Open { kind: "tab", name } => {
                if let Some((c, _)) = &open_container {
                    return Err(LayoutError::NestedTab {
                        name: name.to_string(),
                        parent: format!("container '{}'", c.name.as_deref().unwrap_or_default()),
                        line,
                    });
                }
                if let Some((t, _)) = &open_tab {
                    return Err(LayoutError::NestedTab {
                        name: name.to_string(),
                        parent: format!("tab '{}'", t.name.as_deref().unwrap_or_default()),
                        line,
                    });
                }
                if !loose.containers.is_empty() {
                    tabs.push(std::mem::replace(&mut loose, Tab::unnamed()));
                }
                open_tab = Some((
                    Tab {
                        name: Some(name.to_string()),
                        containers: Vec::new(),
                    },
                    line,
                ));
            }
            Line::Open {
                kind: "container",
                name,
            } => {
                if let Some((c, _)) = &open_container {
                    return Err(LayoutError::NestedContainer {
                        name: name.to_string(),
                        parent: c.name.clone().unwrap_or_default(),
                        line,
                    });
                }
                open_container = Some((
                    Container {
                        name: Some(name.to_string()),
                        fields: Vec::new(),
                    },
                    line,
                ));
            }
            Line::Open { .. } => {
                return Err(LayoutError::UnknownDirective {
                    directive: text.to_string(),
                    line,
                })
            }
            Line::Close("container") => {
                let (container, _) = open_container.take().ok_or(LayoutError::UnexpectedEnd {
                    kind: "container".to_string(),
                    line,
                })?;
                match &mut open_tab {
                    Some((tab, _)) => tab.containers.push(container),
                    None => loose.containers.push(container),
                }
            }
            Line::Close("tab") => {
                if let Some((c, opened)) = &open_container {
                    return Err(LayoutError::MissingEndContainer {
                        kind: "container".to_string(),
                        name: c.name.clone().unwrap_or_default(),
                        line: *opened,
                    });
                }
                let (tab, _) = open_tab.take().ok_or(LayoutError::UnexpectedEnd {
                    kind: "tab".to_string(),
                    line,
                })?;
                tabs.push(tab);
            }
            Line::Close(_) => {
                return Err(LayoutError::UnknownDirective {
                    directive: text.to_string(),
                    line,
                })
            }
            Line::Field(name) => {
                if schema.field(name).is_none() {
                    return Err(LayoutError::UnknownField {
                        model: schema.name().to_string(),
                        field: name.to_string(),
                        line,
                    });
                }
                if !placed.insert(name.to_string()) {
                    return Err(LayoutError::DuplicateField {
                        field: name.to_string(),
                        line,
                    });
                }
                match (&mut open_container, &mut open_tab) {
                    (Some((c, _)), _) => c.fields.push(name.to_string()),
                    (None, Some((t, _))) => t.push_loose(name.to_string()),
                    (None, None) => loose.push_loose(name.to_string()),
                }
            }
        }
    }

    if let Some((c, opened)) = open_container {
        return Err(LayoutError::MissingEndContainer {
            kind: "container".to_string(),
            name: c.name.unwrap_or_default(),
            line: opened,
        });
    }
    if let Some((t, opened)) = open_tab {
        return Err(LayoutError::MissingEndContainer {
            kind: "tab".to_string(),
            name: t.name.unwrap_or_default(),
            line: opened,
        });
    }

    if !loose.containers.is_empty() {
        tabs.push(loose);
    }

    let unplaced: Vec<String> = schema
        .fields()
        .iter()
        .filter(|f| !placed.contains(&f.name))
        .map(|f| f.name.clone())
        .collect();
    if !unplaced.is_empty() {
        tabs.push(Tab {
            name: None,
            containers: vec![Container {
                name: Some(OTHER_CONTAINER.to_string()),
                fields: unplaced,
            }],
        });
    }

    tracing::debug!(model = schema.name(), tabs = tabs.len(), "parsed layout");

    Ok(Layout {
        model: schema.name().to_string(),
        tabs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forum;

    fn settings() -> ModelSchema {
        forum::settings().unwrap()
    }

    #[test]
    fn parses_tabs_and_containers() {
        let layout = parse_layout(
            "[tab General]\n  [container Site]\n    SiteName\n    IsSiteLocked\n  [/container]\n  PostsPerPage\n[/tab]\n",
            &settings(),
        )
        .unwrap();

        let general = layout.tab("General").unwrap();
        assert_eq!(general.containers.len(), 2);
        assert_eq!(general.containers[0].name.as_deref(), Some("Site"));
        assert_eq!(general.containers[0].fields, vec!["SiteName", "IsSiteLocked"]);
        assert_eq!(general.containers[1].name, None);
        assert_eq!(general.containers[1].fields, vec!["PostsPerPage"]);
    }

    #[test]
    fn unplaced_fields_go_to_other() {
        let layout = parse_layout("[tab General]\nSiteName\n[/tab]", &settings()).unwrap();
        let last = layout.tabs.last().unwrap();
        assert_eq!(last.containers[0].name.as_deref(), Some(OTHER_CONTAINER));
        assert_eq!(
            last.containers[0].fields,
            vec!["IsSiteLocked", "PostsPerPage", "AllowRegistration"]
        );
        assert_eq!(layout.fields().count(), settings().len());
    }

    #[test]
    fn loose_fields_keep_their_position_between_tabs() {
        let layout = parse_layout(
            "SiteName\n[tab Site]\nIsSiteLocked\n[/tab]\nPostsPerPage\n[tab Signup]\nAllowRegistration\n[/tab]\n",
            &settings(),
        )
        .unwrap();

        let names: Vec<_> = layout.tabs.iter().map(|t| t.name.as_deref()).collect();
        assert_eq!(names, vec![None, Some("Site"), None, Some("Signup")]);
        assert_eq!(layout.tabs[0].containers[0].fields, vec!["SiteName"]);
        assert_eq!(layout.tabs[2].containers[0].fields, vec!["PostsPerPage"]);
        assert_eq!(
            layout.fields().collect::<Vec<_>>(),
            vec!["SiteName", "IsSiteLocked", "PostsPerPage", "AllowRegistration"]
        );
    }

    #[test]
    fn unclosed_container_reports_opening_line() {
        let err = parse_layout(
            "# settings\n[tab General]\n  [container Site]\n    SiteName\n[/tab]\n",
            &settings(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::MissingEndContainer {
                kind: "container".into(),
                name: "Site".into(),
                line: 3,
            }
        );
    }

    #[test]
    fn unclosed_tab_at_end_of_input() {
        let err = parse_layout("[tab General]\nSiteName\n", &settings()).unwrap_err();
        assert_eq!(err.to_string(), "line 1: tab 'General' is never closed");
    }

    #[test]
    fn stray_end_marker() {
        let err = parse_layout("SiteName\n[/container]", &settings()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnexpectedEnd {
                kind: "container".into(),
                line: 2
            }
        );
    }

    #[test]
    fn tabs_do_not_nest() {
        let err = parse_layout("[tab A]\n[tab B]\n[/tab]\n[/tab]", &settings()).unwrap_err();
        assert!(matches!(err, LayoutError::NestedTab { line: 2, .. }));
    }

    #[test]
    fn unknown_and_duplicate_fields() {
        assert!(matches!(
            parse_layout("Nope", &settings()),
            Err(LayoutError::UnknownField { line: 1, .. })
        ));
        assert!(matches!(
            parse_layout("SiteName\nSiteName", &settings()),
            Err(LayoutError::DuplicateField { line: 2, .. })
        ));
        assert!(matches!(
            parse_layout("[section A]", &settings()),
            Err(LayoutError::UnknownDirective { .. })
        ));
    }

    #[test]
    fn bundled_layouts_parse() {
        for model in ["ForumSettings", "ForumAdminUser"] {
            let schema = forum::registry().schema(model).unwrap();
            let layout = parse_layout(forum::layout(model).unwrap(), &schema).unwrap();
            assert_eq!(layout.fields().count(), schema.len(), "{}", model);
        }
    }

    #[test]
    fn flat_layout_lists_all_fields() {
        let schema = settings();
        let layout = Layout::flat(&schema);
        assert_eq!(layout.fields().count(), schema.len());
    }
}

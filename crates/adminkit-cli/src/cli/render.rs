//! # Rendering
//!
//! Turns command results into pages. Two halves:
//!
//! - [`Renderer`]: the minijinja environment with every template registered and
//!   the shell's template vocabulary installed:
//!   - `style(name)` filter, see [`super::styles`]
//!   - `col(width)` filter, pads or truncates to a display width
//!   - `icon(name)` function, logical icon names to glyphs
//!   - `route(name, args...)` function, see [`super::routes`]
//!   - `current_year()` function, evaluated at render time
//! - View builders (`*_view`): shape library types into template-ready data.
//!   Decisions such as "this value is empty" or "this cell is an id" happen here
//!   so templates stay declarative.
//!
//! Column widths are measured in terminal cells with `unicode-width`, never in
//! bytes or chars.

use adminkit::commands::{CmdMessage, ModelSummary};
use adminkit::config::AdminConfig;
use adminkit::layout::Layout;
use adminkit::record::Record;
use adminkit::schema::{FieldValue, ModelSchema, ValidationRule};
use anyhow::Result;
use chrono::{Datelike, Local};
use minijinja::value::Rest;
use minijinja::{Environment, ErrorKind, Value};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::routes::{RouteTable, BIN, NAV_ROUTES, ROUTES};
use super::styles::{names, ADMIN_THEME};
use super::templates;

/// Widest a table column grows before its cells are truncated.
pub const MAX_COL_WIDTH: usize = 36;
/// Record ids are shown shortened; any unique prefix selects a record.
pub const SHORT_ID: usize = 8;
pub const EMPTY_VALUE: &str = "(empty)";
pub const ICON_PLACEHOLDER: &str = "□";

/// Glyph for a logical icon name. Unknown names get [`ICON_PLACEHOLDER`].
pub fn icon(name: &str) -> &'static str {
    match name {
        "app" => "▣",
        "model" => "◆",
        "record" => "●",
        "settings" => "⚙",
        "tab" => "▸",
        "container" => "▪",
        "path" => "→",
        "file" => "≡",
        "lock" => "⊘",
        "info" => "ℹ",
        "success" => "✓",
        "warning" => "!",
        "error" => "✗",
        _ => ICON_PLACEHOLDER,
    }
}

/// Pads `text` to exactly `width` cells, truncating with an ellipsis.
pub fn fit(text: &str, width: usize) -> String {
    let current = text.width();
    if current <= width {
        return format!("{}{}", text, " ".repeat(width - current));
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new(use_color: bool) -> Result<Self> {
        Self::with_routes(use_color, &ROUTES)
    }

    pub fn with_routes(use_color: bool, routes: &RouteTable) -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_global("version", env!("CARGO_PKG_VERSION"));

        let theme = ADMIN_THEME.clone();
        env.add_filter("style", move |value: Value, name: String| -> String {
            theme.apply(&name, &value.to_string(), use_color)
        });
        env.add_filter("col", |value: Value, width: usize| -> String {
            fit(&value.to_string(), width)
        });
        env.add_function("icon", |name: String| -> String { icon(&name).to_string() });
        env.add_function("current_year", || -> i32 { Local::now().year() });

        let routes = routes.clone();
        env.add_function(
            "route",
            move |name: String, args: Rest<String>| -> Result<String, minijinja::Error> {
                routes
                    .resolve(&name, &args)
                    .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
            },
        );

        for &(name, source) in templates::TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let tmpl = self.env.get_template(template)?;
        Ok(tmpl.render(data)?)
    }

    /// Renders a page: `body` plus the layout's own data.
    pub fn page(&self, template: &str, chrome: &Chrome, body: serde_json::Value) -> Result<String> {
        self.render(template, &PageContext { chrome, body })
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    #[serde(flatten)]
    chrome: &'a Chrome,
    #[serde(flatten)]
    body: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

/// Data every layout reads: header, navigation menu and messages.
#[derive(Debug, Clone, Serialize)]
pub struct Chrome {
    pub site_title: String,
    pub page_title: String,
    pub nav: Vec<NavItem>,
    pub nav_width: usize,
    pub messages: Vec<CmdMessage>,
}

impl Chrome {
    pub fn new(site_title: impl Into<String>, page_title: impl Into<String>) -> Self {
        let nav: Vec<NavItem> = NAV_ROUTES
            .iter()
            .filter_map(|name| ROUTES.get(name))
            .map(|route| NavItem {
                name: route.name,
                title: route.title,
                icon: nav_icon(route.name),
            })
            .collect();
        let nav_width = nav.iter().map(|n| n.title.width()).max().unwrap_or(0);
        Self {
            site_title: site_title.into(),
            page_title: page_title.into(),
            nav,
            nav_width,
            messages: Vec::new(),
        }
    }

    pub fn with_messages(mut self, messages: Vec<CmdMessage>) -> Self {
        self.messages.extend(messages);
        self
    }
}

fn nav_icon(route: &str) -> &'static str {
    match route {
        "models.index" => "model",
        "settings.edit" => "settings",
        "config.show" => "file",
        "auth.login" => "lock",
        _ => "",
    }
}

#[derive(Debug, Serialize)]
pub struct Column {
    label: String,
    width: usize,
}

#[derive(Debug, Serialize)]
pub struct Cell {
    text: String,
    style: &'static str,
    width: usize,
}

/// Rows of styled cells under labelled columns, sized to fit their content.
#[derive(Debug, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: labels
                .into_iter()
                .map(|l| Column {
                    label: l.into(),
                    width: 0,
                })
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<(String, &'static str)>) {
        self.rows.push(
            cells
                .into_iter()
                .map(|(text, style)| Cell {
                    text,
                    style,
                    width: 0,
                })
                .collect(),
        );
    }

    /// Fixes every column's width and copies it onto the column's cells.
    pub fn finish(mut self) -> Self {
        for (i, column) in self.columns.iter_mut().enumerate() {
            let widest = self
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.text.width())
                .chain(std::iter::once(column.label.width()))
                .max()
                .unwrap_or(0);
            column.width = widest.min(MAX_COL_WIDTH);
            for row in &mut self.rows {
                if let Some(cell) = row.get_mut(i) {
                    cell.width = column.width;
                }
            }
        }
        self
    }
}

/// Display text of a value and the style it is shown in.
pub fn display_value(value: &FieldValue, date_format: &str) -> (String, &'static str) {
    let blank = match value {
        FieldValue::Null => true,
        FieldValue::Text(s) => s.is_empty(),
        FieldValue::List(items) => items.is_empty(),
        _ => false,
    };
    if blank {
        (EMPTY_VALUE.to_string(), names::EMPTY)
    } else {
        (value.display_with(date_format), names::VALUE)
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID).collect()
}

pub fn models_view(models: &[ModelSummary], settings_model: &str) -> serde_json::Value {
    let name_width = models.iter().map(|m| m.name.width()).max().unwrap_or(0);
    let title_width = models.iter().map(|m| m.title.width()).max().unwrap_or(0);
    let rows: Vec<_> = models
        .iter()
        .map(|m| {
            json!({
                "name": m.name,
                "title": m.title,
                "fields": m.fields,
                "settings": m.name == settings_model,
            })
        })
        .collect();
    json!({
        "models": rows,
        "name_width": name_width,
        "title_width": title_width,
    })
}

pub fn list_view(schema: &ModelSchema, records: &[Record], date_format: &str) -> serde_json::Value {
    let columns: Vec<&str> = std::iter::once("Id")
        .chain(schema.list_fields().map(|f| f.label.as_str()))
        .collect();
    let mut table = Table::new(columns);
    for record in records {
        let mut cells = vec![(short_id(&record.id), names::ID)];
        cells.extend(
            schema
                .list_fields()
                .map(|f| display_value(record.get(&f.name), date_format)),
        );
        table.push_row(cells);
    }
    json!({
        "model": schema.name(),
        "table": table.finish(),
    })
}

/// Record fields grouped the way `layout` places them.
pub fn form_view(
    schema: &ModelSchema,
    record: &Record,
    layout: &Layout,
    date_format: &str,
) -> serde_json::Value {
    let mut label_width = 0;
    let tabs: Vec<_> = layout
        .tabs
        .iter()
        .map(|tab| {
            let containers: Vec<_> = tab
                .containers
                .iter()
                .map(|container| {
                    let fields: Vec<_> = container
                        .fields
                        .iter()
                        .filter_map(|name| schema.field(name))
                        .map(|field| {
                            label_width = label_width.max(field.label.width());
                            let (display, style) =
                                display_value(record.get(&field.name), date_format);
                            json!({
                                "name": field.name,
                                "label": field.label,
                                "display": display,
                                "style": style,
                            })
                        })
                        .collect();
                    json!({ "name": container.name, "fields": fields })
                })
                .collect();
            json!({ "name": tab.name, "containers": containers })
        })
        .collect();

    json!({
        "model": schema.name(),
        "record": {
            "id": record.id,
            "created": record.created_at.format(date_format).to_string(),
            "updated": record.updated_at.format(date_format).to_string(),
        },
        "form": { "tabs": tabs, "label_width": label_width },
    })
}

fn describe_rule(rule: &ValidationRule) -> String {
    match rule {
        ValidationRule::Required => "required".to_string(),
        ValidationRule::MinLength { min } => format!("min {}", min),
        ValidationRule::MaxLength { max } => format!("max {}", max),
        ValidationRule::Range { min, max } => format!("{}..{}", min, max),
        ValidationRule::Pattern { pattern } => format!("/{}/", pattern),
    }
}

pub fn schema_view(schema: &ModelSchema) -> serde_json::Value {
    let mut table = Table::new(["Field", "Label", "Kind", "Widget", "Group", "Rules", "Default"]);
    for field in schema.fields() {
        let mut rules: Vec<String> = field.rules.iter().map(describe_rule).collect();
        if field.list_visible {
            rules.insert(0, "list".to_string());
        }
        if !field.choices.is_empty() {
            rules.push(field.choices.join("|"));
        }
        let (default, default_style) = display_value(&field.default, "%Y-%m-%d %H:%M");
        table.push_row(vec![
            (field.name.clone(), names::TITLE),
            (field.label.clone(), names::LABEL),
            (field.value_kind.as_str().to_string(), names::KIND),
            (field.widget.as_str().to_string(), names::KIND),
            (field.group.clone().unwrap_or_default(), names::MUTED),
            (rules.join(", "), names::MUTED),
            (default, default_style),
        ]);
    }
    json!({
        "model": schema.name(),
        "base": schema.base(),
        "inherited": schema.inherited_fields().len(),
        "table": table.finish(),
    })
}

pub fn layout_view(layout: &Layout) -> serde_json::Value {
    json!({ "layout": layout })
}

pub fn projections_view(destination: &str, projections: &[serde_json::Value]) -> serde_json::Value {
    let mut key_width = 0;
    let rows: Vec<Vec<serde_json::Value>> = projections
        .iter()
        .map(|projection| match projection {
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(key, value)| {
                    key_width = key_width.max(key.width());
                    json!({ "key": key, "value": plain(value) })
                })
                .collect(),
            other => vec![json!({ "key": "", "value": plain(other) })],
        })
        .collect();
    json!({
        "destination": destination,
        "projections": rows,
        "key_width": key_width,
    })
}

/// JSON scalars and arrays as a person would type them.
fn plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => EMPTY_VALUE.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items.iter().map(plain).collect::<Vec<_>>().join(", "),
        other => other.to_string(),
    }
}

pub fn paths_view(paths: &[PathBuf]) -> serde_json::Value {
    let paths: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    json!({ "paths": paths })
}

pub fn config_view(config: &AdminConfig, sources: &[PathBuf]) -> Result<serde_json::Value> {
    let mut table = Table::new(["Key", "Value"]);
    let mut entries = Vec::new();
    flatten("", &serde_json::to_value(config)?, &mut entries);
    for (key, value) in entries {
        let style = if value.is_null() {
            names::EMPTY
        } else {
            names::VALUE
        };
        table.push_row(vec![(key, names::LABEL), (plain(&value), style)]);
    }

    let sources: Vec<_> = sources
        .iter()
        .map(|path| {
            json!({
                "path": path.display().to_string(),
                "state": if path.exists() { "loaded" } else { "not found" },
            })
        })
        .collect();
    Ok(json!({ "table": table.finish(), "sources": sources }))
}

fn flatten(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, serde_json::Value)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, nested, out);
            }
        }
        other => out.push((prefix.to_string(), other.clone())),
    }
}

pub fn routes_view(routes: &RouteTable) -> serde_json::Value {
    let mut table = Table::new(["Route", "Command", "Page"]);
    for route in routes.routes() {
        table.push_row(vec![
            (route.name.to_string(), names::TITLE),
            (format!("{} {}", BIN, route.command), names::COMMAND),
            (route.title.to_string(), names::MUTED),
        ]);
    }
    json!({ "table": table.finish() })
}

pub fn login_view(prompts: &[&str]) -> serde_json::Value {
    let prompt_width = prompts.iter().map(|p| p.width()).max().unwrap_or(0);
    json!({ "prompts": prompts, "prompt_width": prompt_width })
}

#[cfg(test)]
mod tests {
    use super::*;
    use adminkit::models::forum;
    use adminkit::record::Record;

    fn renderer() -> Renderer {
        Renderer::new(false).unwrap()
    }

    #[test]
    fn fit_pads_and_truncates_by_display_width() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("日本語", 4), "日… ");
        assert_eq!(fit("x", 0), "");
    }

    #[test]
    fn unknown_icon_gets_placeholder() {
        assert_eq!(icon("success"), "✓");
        assert_eq!(icon("rocket"), ICON_PLACEHOLDER);
    }

    #[test]
    fn every_template_compiles() {
        let r = renderer();
        for &(name, _) in templates::TEMPLATES {
            assert!(r.env.get_template(name).is_ok(), "template {}", name);
        }
    }

    #[test]
    fn messages_render_with_icons() {
        let out = renderer()
            .render(
                "messages",
                &json!({ "messages": [CmdMessage::success("Saved"), CmdMessage::warning("Careful")] }),
            )
            .unwrap();
        assert_eq!(out, "✓ Saved\n! Careful\n");
    }

    #[test]
    fn main_layout_has_header_nav_and_footer_year() {
        let chrome = Chrome::new("Forum", "Routes");
        let out = renderer()
            .page(templates::ROUTES, &chrome, routes_view(&ROUTES))
            .unwrap();
        assert!(out.starts_with("▣ Forum / Routes\n"));
        assert!(out.contains("adminkit settings"));
        assert!(out.contains("records.detail"));
        assert!(out.contains(&Local::now().year().to_string()));
    }

    #[test]
    fn auth_layout_renders_login() {
        let chrome = Chrome::new("Forum", "Sign in")
            .with_messages(vec![CmdMessage::warning("Site is locked")]);
        let out = renderer()
            .page(templates::LOGIN, &chrome, login_view(&["User name", "Password"]))
            .unwrap();
        assert!(out.starts_with("⊘ Forum\n"));
        assert!(out.contains("User name"));
        assert!(out.contains("! Site is locked"));
        assert!(out.contains(&format!("© {} Forum", Local::now().year())));
    }

    #[test]
    fn unknown_route_fails_the_render() {
        let routes = RouteTable::new().add("models.index", "models", "Models");
        let r = Renderer::with_routes(false, &routes).unwrap();
        let chrome = Chrome::new("Forum", "Sign in");
        // The auth layout has no navigation menu, the main layout links settings.edit
        assert!(r.page(templates::LOGIN, &chrome, login_view(&["User name"])).is_ok());
        assert!(r.page(templates::ROUTES, &chrome, routes_view(&routes)).is_err());
    }

    #[test]
    fn list_page_shows_list_columns_only() {
        let schema = forum::admin_user().unwrap();
        let mut record = Record::with_id(&schema, "3f2a9c77-0000");
        record.set_input(&schema, "UserName", "ada").unwrap();
        record.set_input(&schema, "Email", "ada@example.com").unwrap();

        let view = list_view(&schema, &[record], "%Y-%m-%d");
        let out = renderer()
            .page(templates::LIST, &Chrome::new("Forum", "Users"), view)
            .unwrap();
        assert!(out.contains("3f2a9c77"));
        assert!(!out.contains("3f2a9c77-0000"));
        assert!(out.contains("ada@example.com"));
        assert!(!out.contains("Signature"));
        assert!(out.contains("adminkit show ForumAdminUser <id>"));
    }

    #[test]
    fn form_groups_fields_and_marks_empty_values() {
        let schema = forum::settings().unwrap();
        let record = Record::settings(&schema);
        let layout = adminkit::layout::parse_layout(
            "[tab General]\n[container Site]\nSiteName\n[/container]\n[/tab]\n",
            &schema,
        )
        .unwrap();
        let view = form_view(&schema, &record, &layout, "%Y-%m-%d");
        let out = renderer()
            .page(templates::SETTINGS, &Chrome::new("Forum", "Settings"), view)
            .unwrap();
        assert!(out.contains("▸ General"));
        assert!(out.contains("  ▪ Site"));
        assert!(out.contains("Site Name"));
        assert!(out.contains("Forum"));
    }

    #[test]
    fn display_value_flags_blanks() {
        assert_eq!(
            display_value(&FieldValue::Null, "%Y").1,
            names::EMPTY
        );
        assert_eq!(
            display_value(&FieldValue::Text(String::new()), "%Y").0,
            EMPTY_VALUE
        );
        assert_eq!(
            display_value(&FieldValue::Bool(true), "%Y"),
            ("true".to_string(), names::VALUE)
        );
    }

    #[test]
    fn config_view_flattens_nested_keys() {
        let view = config_view(&AdminConfig::default(), &[]).unwrap();
        let keys: Vec<_> = view["table"]["rows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row[0]["text"].as_str().unwrap().to_string())
            .collect();
        assert!(keys.contains(&"api.uploads_folder".to_string()));
        assert!(keys.contains(&"services.disable_services".to_string()));
    }

    #[test]
    fn schema_view_lists_rules_and_defaults() {
        let schema = forum::settings().unwrap();
        let view = schema_view(&schema);
        let rows = view["table"]["rows"].as_array().unwrap();
        let site_name = rows
            .iter()
            .find(|row| row[0]["text"] == "SiteName")
            .unwrap();
        assert!(site_name[5]["text"].as_str().unwrap().contains("required"));
        assert!(site_name[5]["text"].as_str().unwrap().contains("max 80"));
        assert_eq!(site_name[6]["text"], "Forum");
    }
}

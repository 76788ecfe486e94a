//! # Templates
//!
//! Pages are minijinja templates kept as stand-alone files in `templates/` and
//! embedded here at compile time, so the binary is self-contained while the
//! markup stays easy to edit and diff.
//!
//! A few conventions the templates follow:
//!
//!     1. Layouts: every page extends a named layout, `main` (header, content,
//!     messages, navigation menu, footer) or `auth` (title, content, footer).
//!     Pages only fill `{% block content %}`.
//!
//!     2. Partials: `table`, `form` and `messages` are included by several pages
//!     and read fixed context keys (`table`, `form`, `messages`).
//!
//!     3. Whitespace: blocks are trimmed (`trim_blocks` + `lstrip_blocks`), so a
//!     line that ends in a block tag loses its line break. Such lines are
//!     followed by an explicit blank line.
//!
//!     4. Logic: formatting decisions (what is empty, which style a cell gets)
//!     are made in Rust and passed in as data. Templates only place things.

pub const MAIN_LAYOUT: &str = "main";
pub const AUTH_LAYOUT: &str = "auth";

pub const MODELS: &str = "models";
pub const LIST: &str = "list";
pub const DETAIL: &str = "detail";
pub const SETTINGS: &str = "settings";
pub const SCHEMA: &str = "schema";
pub const LAYOUT: &str = "layout";
pub const PROJECTIONS: &str = "projections";
pub const PATHS: &str = "paths";
pub const CONFIG: &str = "config";
pub const ROUTES: &str = "routes";
pub const LOGIN: &str = "login";

/// Every template, by the name other templates and the renderer use.
pub const TEMPLATES: &[(&str, &str)] = &[
    (MAIN_LAYOUT, include_str!("templates/main.jinja")),
    (AUTH_LAYOUT, include_str!("templates/auth.jinja")),
    ("messages", include_str!("templates/messages.jinja")),
    ("table", include_str!("templates/table.jinja")),
    ("form", include_str!("templates/form.jinja")),
    (MODELS, include_str!("templates/models.jinja")),
    (LIST, include_str!("templates/list.jinja")),
    (DETAIL, include_str!("templates/detail.jinja")),
    (SETTINGS, include_str!("templates/settings.jinja")),
    (SCHEMA, include_str!("templates/schema.jinja")),
    (LAYOUT, include_str!("templates/layout.jinja")),
    (PROJECTIONS, include_str!("templates/projections.jinja")),
    (PATHS, include_str!("templates/paths.jinja")),
    (CONFIG, include_str!("templates/config.jinja")),
    (ROUTES, include_str!("templates/routes.jinja")),
    (LOGIN, include_str!("templates/login.jinja")),
];

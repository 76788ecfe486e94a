//! Logical page routes.
//!
//! Pages link to each other by route name (`records.detail`), never by spelling
//! out a command line. The table below is the only place that knows which
//! command reaches which page; templates resolve names through the `route()`
//! function, and an unknown name fails the render.

use anyhow::{anyhow, bail, Result};
use once_cell::sync::Lazy;
use serde::Serialize;

pub const BIN: &str = "adminkit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub name: &'static str,
    /// Command line template; `{param}` placeholders are filled in order.
    pub command: &'static str,
    pub title: &'static str,
}

impl Route {
    pub fn params(&self) -> Vec<&'static str> {
        self.command
            .split_whitespace()
            .filter_map(|part| part.strip_prefix('{')?.strip_suffix('}'))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn add(mut self, name: &'static str, command: &'static str, title: &'static str) -> Self {
        self.routes.push(Route {
            name,
            command,
            title,
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// The command line that reaches `name`, with `args` filling its parameters.
    pub fn resolve(&self, name: &str, args: &[String]) -> Result<String> {
        let route = self
            .get(name)
            .ok_or_else(|| anyhow!("Unknown route '{}'", name))?;
        let params = route.params();
        if args.len() != params.len() {
            bail!(
                "Route '{}' takes {} argument(s) ({}), got {}",
                name,
                params.len(),
                params.join(", "),
                args.len()
            );
        }

        let mut args = args.iter();
        let parts: Vec<String> = route
            .command
            .split_whitespace()
            .map(|part| {
                if part.starts_with('{') {
                    // Lengths were checked above
                    args.next().map(|a| quote(a)).unwrap_or_default()
                } else {
                    part.to_string()
                }
            })
            .collect();
        Ok(format!("{} {}", BIN, parts.join(" ")))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) {
        format!("'{}'", arg.replace('\'', "'\\''"))
    } else {
        arg.to_string()
    }
}

pub static ROUTES: Lazy<RouteTable> = Lazy::new(|| {
    RouteTable::new()
        .add("models.index", "models", "Models")
        .add("schema.show", "schema {model}", "Schema")
        .add("records.list", "list {model}", "Records")
        .add("records.detail", "show {model} {id}", "Record")
        .add("records.create", "create {model}", "New record")
        .add("settings.edit", "settings", "Settings")
        .add("layout.show", "layout {model}", "Layout")
        .add("config.show", "config", "Configuration")
        .add("auth.login", "login", "Sign in")
});

/// Routes shown in the main layout's navigation menu.
pub const NAV_ROUTES: &[&str] = &["models.index", "settings.edit", "config.show", "auth.login"];

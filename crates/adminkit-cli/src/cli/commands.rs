//! # Shell Layer
//!
//! This module is **one possible UI client** for adminkit. It is the **only**
//! place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Context Setup**: Locate the data directory, load configuration and open
//!    the forum deployment over a file store
//! 2. **Dispatch**: Map each subcommand to one API call
//! 3. **Output**: Render a page (text) or serialize the command result (json/yaml)

use adminkit::api::AdminApi;
use adminkit::commands::{CmdMessage, CmdResult, FieldUpdate};
use adminkit::config::AdminConfig;
use adminkit::layout::Layout;
use adminkit::models::forum;
use adminkit::paths::PathResolver;
use adminkit::schema::FieldValue;
use adminkit::store::fs_backend::FsBackend;
use adminkit::store::FileStore;
use anyhow::{anyhow, Result};
use clap::Parser;
use console::Term;
use directories::ProjectDirs;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::render::{self, Chrome, Renderer};
use super::routes::ROUTES;
use super::setup::{Cli, Commands, OutputMode};
use super::templates;

/// Settings field the page header shows as the site title, when the deployment has one.
pub const SITE_NAME_FIELD: &str = "SiteName";
/// Boolean settings field that puts a locked notice on the sign-in page.
pub const SITE_LOCK_FIELD: &str = "IsSiteLocked";

const LOGIN_PROMPTS: &[&str] = &["User name", "Password"];

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = AppContext::new(&cli)?;
    let output = ctx.dispatch(cli.command.unwrap_or(Commands::Models))?;
    print!("{}", output);
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("adminkit=debug")
    } else {
        EnvFilter::try_from_env("ADMINKIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (tests calling run twice) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub struct AppContext {
    api: AdminApi<FsBackend>,
    renderer: Renderer,
    output: OutputMode,
}

impl AppContext {
    pub fn new(cli: &Cli) -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "adminkit");
        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => dirs
                .as_ref()
                .map(|d| d.data_dir().to_path_buf())
                .ok_or_else(|| anyhow!("Could not determine a data directory, pass --data-dir"))?,
        };
        let user_config = dirs.as_ref().map(|d| d.config_dir().to_path_buf());

        let config = AdminConfig::load(&data_dir, user_config.as_deref())?;
        let sources = AdminConfig::sources(&data_dir, user_config.as_deref());
        let resolver = PathResolver::new(cli.web_root.clone(), data_dir.clone());

        let api = forum::api(FileStore::at(data_dir.clone()))?
            .with_resolver(resolver)
            .with_config(config, sources);
        debug!(data_dir = %data_dir.display(), models = api.registry().len(), "admin shell ready");

        let use_color = !cli.no_color && Term::stdout().features().colors_supported();
        Ok(Self {
            api,
            renderer: Renderer::new(use_color)?,
            output: cli.output,
        })
    }

    pub fn dispatch(&self, command: Commands) -> Result<String> {
        let api = &self.api;
        let date_format = api.admin_config().api.date_time_string_format.clone();

        match command {
            Commands::Models => {
                let res = api.models()?;
                self.emit(&res, templates::MODELS, "Models", &res.messages, || {
                    Ok(render::models_view(&res.models, api.settings_model()))
                })
            }
            Commands::Schema { model } => {
                let res = api.schema(&model)?;
                let schema = api.registry().schema(&model)?;
                let title = format!("{} schema", schema.title());
                self.emit(&res, templates::SCHEMA, &title, &res.messages, || {
                    Ok(render::schema_view(&schema))
                })
            }
            Commands::List { model } => {
                let res = api.list(&model)?;
                let schema = api.registry().schema(&model)?;
                self.emit(&res, templates::LIST, schema.title(), &res.messages, || {
                    Ok(render::list_view(&schema, &res.records, &date_format))
                })
            }
            Commands::Show { model, id } => {
                let res = api.get(&model, &id)?;
                self.record_page(&model, &res, &date_format)
            }
            Commands::Create { model, updates } => {
                let res = api.create(&model, &parse_updates(&updates)?)?;
                self.record_page(&model, &res, &date_format)
            }
            Commands::Update { model, id, updates } => {
                let res = api.update(&model, &id, &parse_updates(&updates)?)?;
                self.record_page(&model, &res, &date_format)
            }
            Commands::Delete { model, id } => {
                let res = api.delete(&model, &id)?;
                let remaining = api.list(&model)?;
                let schema = api.registry().schema(&model)?;
                let mut messages = res.messages.clone();
                messages.extend(remaining.messages.iter().cloned());
                self.emit(&res, templates::LIST, schema.title(), &messages, || {
                    Ok(render::list_view(&schema, &remaining.records, &date_format))
                })
            }
            Commands::Settings { updates } => {
                let res = if updates.is_empty() {
                    api.settings()?
                } else {
                    api.save_settings(&parse_updates(&updates)?)?
                };
                let model = api.settings_model();
                let schema = api.registry().schema(model)?;
                let layout = self.layout_of(model)?;
                let record = res
                    .records
                    .first()
                    .ok_or_else(|| anyhow!("No settings record for {}", model))?;
                self.emit(&res, templates::SETTINGS, schema.title(), &res.messages, || {
                    Ok(render::form_view(&schema, record, &layout, &date_format))
                })
            }
            Commands::Project { model, destination } => {
                let res = api.project(&model, &destination)?;
                self.emit(&res, templates::PROJECTIONS, &destination, &res.messages, || {
                    Ok(render::projections_view(&destination, &res.projections))
                })
            }
            Commands::Layout { model } => {
                let res = api.layout(&model)?;
                let layout = match &res.layout {
                    Some(layout) => layout.clone(),
                    None => Layout::flat(&*api.registry().schema(&model)?),
                };
                let title = format!("{} layout", model);
                self.emit(&res, templates::LAYOUT, &title, &res.messages, || {
                    Ok(render::layout_view(&layout))
                })
            }
            Commands::Resolve { paths } => {
                let res = api.resolve_paths(&paths)?;
                self.emit(&res, templates::PATHS, "Paths", &res.messages, || {
                    Ok(render::paths_view(&res.paths))
                })
            }
            Commands::Config { template: true } => Ok(AdminConfig::template()),
            Commands::Config { template: false } => {
                let res = api.config()?;
                self.emit(&res, templates::CONFIG, "Configuration", &res.messages, || {
                    render::config_view(api.admin_config(), &res.paths)
                })
            }
            Commands::Routes => self.emit(ROUTES.routes(), templates::ROUTES, "Routes", &[], || {
                Ok(render::routes_view(&ROUTES))
            }),
            Commands::Login => {
                let locked = self.site_locked()?;
                let mut messages = Vec::new();
                if locked {
                    messages.push(CmdMessage::warning(
                        "The site is locked: only administrators can sign in",
                    ));
                }
                let data = json!({
                    "site_title": self.site_title()?,
                    "locked": locked,
                    "prompts": LOGIN_PROMPTS,
                });
                self.emit(&data, templates::LOGIN, "Sign in", &messages, || {
                    Ok(render::login_view(LOGIN_PROMPTS))
                })
            }
        }
    }

    /// Detail page of the single record in `res`.
    fn record_page(&self, model: &str, res: &CmdResult, date_format: &str) -> Result<String> {
        let schema = self.api.registry().schema(model)?;
        let layout = self.layout_of(model)?;
        let record = res
            .records
            .first()
            .ok_or_else(|| anyhow!("No {} record in result", model))?;
        let title = schema.title().to_string();
        self.emit(res, templates::DETAIL, &title, &res.messages, || {
            Ok(render::form_view(&schema, record, &layout, date_format))
        })
    }

    fn layout_of(&self, model: &str) -> Result<Layout> {
        match self.api.layout(model)?.layout {
            Some(layout) => Ok(layout),
            None => Ok(Layout::flat(&*self.api.registry().schema(model)?)),
        }
    }

    /// Serializes `result` in structured modes, renders `template` otherwise.
    fn emit<T, F>(
        &self,
        result: &T,
        template: &str,
        title: &str,
        messages: &[CmdMessage],
        body: F,
    ) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnOnce() -> Result<serde_json::Value>,
    {
        match self.output {
            OutputMode::Json => {
                let mut out = serde_json::to_string_pretty(result)?;
                out.push('\n');
                Ok(out)
            }
            OutputMode::Yaml => Ok(serde_yaml::to_string(result)?),
            OutputMode::Text => {
                let chrome = Chrome::new(self.site_title()?, title).with_messages(messages.to_vec());
                self.renderer.page(template, &chrome, body()?)
            }
        }
    }

    fn settings_value(&self, field: &str) -> Result<FieldValue> {
        let res = self.api.settings()?;
        Ok(res
            .records
            .first()
            .map(|r| r.get(field).clone())
            .unwrap_or(FieldValue::Null))
    }

    /// The saved site name, or the settings model's title.
    fn site_title(&self) -> Result<String> {
        if let Some(name) = self.settings_value(SITE_NAME_FIELD)?.as_text() {
            if !name.is_empty() {
                return Ok(name.to_string());
            }
        }
        let schema = self.api.registry().schema(self.api.settings_model())?;
        Ok(schema.title().to_string())
    }

    fn site_locked(&self) -> Result<bool> {
        Ok(self
            .settings_value(SITE_LOCK_FIELD)?
            .as_bool()
            .unwrap_or(false))
    }
}

fn parse_updates(raw: &[String]) -> Result<Vec<FieldUpdate>> {
    Ok(raw
        .iter()
        .map(|s| s.parse::<FieldUpdate>())
        .collect::<std::result::Result<Vec<_>, _>>()?)
}

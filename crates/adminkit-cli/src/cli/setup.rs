use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Rendered pages
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputMode {
    pub fn is_structured(&self) -> bool {
        !matches!(self, OutputMode::Text)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "adminkit",
    bin_name = "adminkit",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Schema-driven admin panel for the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputMode::Text, help_heading = "Options")]
    pub output: OutputMode,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Directory holding records and adminkit.toml
    #[arg(long, global = true, env = "ADMINKIT_DATA", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Web root used to resolve logical paths
    #[arg(long, global = true, env = "ADMINKIT_WEB_ROOT", help_heading = "Options")]
    pub web_root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered models
    #[command(display_order = 1)]
    Models,

    /// Show a model's fields
    #[command(display_order = 2)]
    Schema { model: String },

    /// List the records of a model
    #[command(alias = "ls", display_order = 3)]
    List { model: String },

    /// Show one record (id or unique id prefix)
    #[command(alias = "view", display_order = 4)]
    Show { model: String, id: String },

    /// Create a record from field=value pairs
    #[command(alias = "new", display_order = 5)]
    Create {
        model: String,

        /// Field edits (e.g. UserName=ada)
        #[arg(num_args = 0..)]
        updates: Vec<String>,
    },

    /// Update a record from field=value pairs
    #[command(display_order = 6)]
    Update {
        model: String,
        id: String,

        /// Field edits (e.g. IsModerator=yes)
        #[arg(required = true, num_args = 1..)]
        updates: Vec<String>,
    },

    /// Delete a record
    #[command(alias = "rm", display_order = 7)]
    Delete { model: String, id: String },

    /// Show the settings page, or save field=value edits
    #[command(display_order = 10)]
    Settings {
        /// Field edits (e.g. IsSiteLocked=true)
        #[arg(num_args = 0..)]
        updates: Vec<String>,
    },

    /// Project a model's records into a mapped shape
    #[command(display_order = 11)]
    Project { model: String, destination: String },

    /// Show the detail-page layout of a model
    #[command(display_order = 12)]
    Layout { model: String },

    /// Resolve logical paths against the web root
    #[command(display_order = 20)]
    Resolve {
        /// Logical paths (e.g. ~/uploads/logo.png); none resolves the uploads folder
        #[arg(num_args = 0..)]
        paths: Vec<String>,
    },

    /// Show the effective configuration
    #[command(display_order = 21)]
    Config {
        /// Print a commented adminkit.toml instead
        #[arg(long)]
        template: bool,
    },

    /// List the page routes
    #[command(display_order = 22)]
    Routes,

    /// Show the sign-in page
    #[command(display_order = 23)]
    Login,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn naked_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["adminkit"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.output, OutputMode::Text);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["adminkit", "settings", "IsSiteLocked=true", "-o", "json"]).unwrap();
        assert_eq!(cli.output, OutputMode::Json);
        match cli.command {
            Some(Commands::Settings { updates }) => assert_eq!(updates, vec!["IsSiteLocked=true"]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn update_requires_edits() {
        assert!(Cli::try_parse_from(["adminkit", "update", "Role", "abc"]).is_err());
    }
}

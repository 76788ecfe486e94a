//! # Shell Behavior
//!
//! This is **one possible UI client** for adminkit, not the application itself.
//! The shell is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! ## Naked Execution
//!
//! Running `adminkit` with no arguments shows the model index, the landing page
//! of the admin panel.
//!
//! ## Editing
//!
//! Edits are typed as `field=value` pairs and go through the same parsing and
//! validation as any other client:
//!
//! ```text
//! adminkit settings IsSiteLocked=true
//! adminkit create ForumAdminUser UserName=ada Email=ada@example.com
//! adminkit update ForumAdminUser 3f2a IsModerator=yes
//! ```
//!
//! Record ids can be shortened to any unique prefix.
//!
//! ## Output Modes
//!
//! `--output text` (default) renders pages; `json` and `yaml` print the
//! structured command result instead, for scripting.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and dispatch to the API facade
//! - `render`: Template environment, filters and page data
//! - `routes`: Logical route names and the command lines behind them
//! - `setup`: Argument parsing via clap
//! - `styles`: Terminal styling
//! - `templates`: Embedded page and layout templates

mod commands;
mod render;
mod routes;
pub mod setup;
mod styles;
mod templates;

pub use commands::run;

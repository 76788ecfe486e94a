//! # Adminkit CLI Architecture
//!
//! `adminkit` is the terminal admin shell for adminkit deployments. The binary is
//! intentionally thin: the shell lives in `src/cli/`, while this file only invokes
//! `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/adminkit/`: Core library, UI-agnostic schema, storage and projections
//! - `crates/adminkit-cli/`: This shell, depends on the `adminkit` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Shell Layer (crates/adminkit-cli/src/cli/)                 │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring + dispatch (commands.rs)                  │
//! │  - Route table for page navigation (routes.rs)              │
//! │  - Layouts and pages via minijinja templates (render.rs)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/adminkit/src/api.rs)                     │
//! │  - Dispatches to command modules                            │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward is UI agnostic. The shell is responsible for
//! **all** user-facing concerns: argument parsing, context initialization,
//! dispatch, error reporting and rendering.
//!
//! ## Rendering
//!
//! Pages are minijinja templates under `src/cli/templates/`, embedded at compile
//! time via `include_str!()`. Every page extends one of two named layouts
//! (`main` or `auth`), and templates navigate by route name through the
//! `route()` function instead of spelling out command lines.
//!
//! ## Testing Approach
//!
//! - **Library**: command and API tests in `crates/adminkit`.
//! - **Shell**: rendering and route tests feed canned data into templates;
//!   `tests/cli.rs` drives the real binary end to end with `assert_cmd`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

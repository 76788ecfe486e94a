//! # Adminkit Architecture
//!
//! Adminkit is a **generic admin-panel library**. Deployments declare their models
//! once, as field metadata, and get settings pages, list/detail screens and admin
//! user management from generic machinery that never knows a concrete model.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Admin Shell (adminkit-cli)                                 │
//! │  - Parses arguments, renders layouts and pages              │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Owns registry, store, mapper, resolver and config        │
//! │  - Returns structured, serializable results                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Schema lookup, record edits, projections                 │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Metadata & Storage (schema/, models/, store/)              │
//! │  - Field descriptors, cached per model                      │
//! │  - Records persisted by a StorageBackend                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Declaring a Deployment
//!
//! A deployment extends the base models instead of redeclaring them:
//!
//! ```
//! use adminkit::models::base_settings;
//! use adminkit::schema::{FieldDescriptor, ValueKind, WidgetKind};
//!
//! let settings = base_settings()
//!     .unwrap()
//!     .extend("ForumSettings")
//!     .field(
//!         FieldDescriptor::new("IsSiteLocked", ValueKind::Bool)
//!             .widget(WidgetKind::Checkbox)
//!             .list_visible(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.fields()[0].label, "Is Site Locked");
//! ```
//!
//! [`models::forum`] is the bundled example deployment, wired end to end by
//! [`models::forum::api`].
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types. It never
//! writes to stdout/stderr and never exits the process, so the same core could sit
//! behind an HTTP server as easily as behind the terminal shell.
//!
//! ## Startup Checks
//!
//! Broken declarations fail at startup, not at first use:
//! - [`schema::SchemaRegistry::build_all`] builds every schema
//! - [`mapper::MapperConfiguration::from_profiles`] validates every mapping
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Logic for each operation
//! - [`schema`]: Field metadata, schema builder and registry
//! - [`models`]: Base models and the forum deployment
//! - [`mapper`]: Declarative projections between shapes
//! - [`layout`]: Tab/container layout markup for detail pages
//! - [`record`]: Runtime values of a model instance
//! - [`store`]: Storage abstraction and implementations
//! - [`paths`]: Logical resource path resolution
//! - [`equality`]: Caller-supplied equality and hashing
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod equality;
pub mod error;
pub mod layout;
pub mod mapper;
pub mod models;
pub mod paths;
pub mod record;
pub mod schema;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

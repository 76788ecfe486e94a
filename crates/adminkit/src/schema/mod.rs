//! # Field Metadata
//!
//! Every model the admin panel exposes is described by a [`ModelSchema`]: an
//! ordered list of [`FieldDescriptor`]s saying how each field is labeled,
//! rendered, shown in lists and validated. The admin shell never knows about
//! concrete models; it renders whatever the schema says.
//!
//! ## Declaring Models
//!
//! Fields are declared explicitly through a builder, one call per field:
//!
//! ```
//! use adminkit::schema::{FieldDescriptor, SchemaBuilder, ValueKind, WidgetKind};
//!
//! let settings = SchemaBuilder::new("ForumSettings")
//!     .field(
//!         FieldDescriptor::new("IsSiteLocked", ValueKind::Bool)
//!             .widget(WidgetKind::Checkbox)
//!             .list_visible(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(settings.len(), 1);
//! ```
//!
//! ## Extension
//!
//! Deployments extend a base schema instead of subclassing it:
//! [`ModelSchema::extend`] returns a builder that already holds the base's
//! fields. The result lists base fields first, in their original order, then the
//! deployment's own. Inherited fields cannot be redeclared.
//!
//! ## Invariants
//!
//! Checked by [`SchemaBuilder::build`]:
//!
//! | Check | Error |
//! |-------|-------|
//! | Field names unique within a model | [`SchemaError::DuplicateName`] |
//! | Display labels unique within a model | [`SchemaError::DuplicateLabel`] |
//! | Widget accepts the value kind | [`SchemaError::WidgetMismatch`] |
//! | Rules fit the value kind, patterns compile | [`SchemaError::InvalidRule`], [`SchemaError::InvalidPattern`] |
//! | Select widgets declare choices | [`SchemaError::EmptyChoices`] |
//!
//! ## Caching
//!
//! [`SchemaRegistry`] builds each schema on first access and shares it as an
//! `Arc<ModelSchema>` for the rest of the process.

mod error;
mod field;
mod model;
mod registry;
mod value;
mod widget;

pub use error::SchemaError;
pub use field::{humanize, FieldDescriptor, Pattern, ValidationRule};
pub use model::{ModelSchema, SchemaBuilder};
pub use registry::{AdminModel, SchemaRegistry};
pub use value::FieldValue;
pub use widget::{ValueKind, WidgetKind};

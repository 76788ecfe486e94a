//! Bundled models.
//!
//! [`base`] holds the framework's extension points: an empty settings model, the
//! admin user and roles. [`forum`] is the bundled deployment built on top of them.

mod base;
pub mod forum;

pub use base::{
    base_admin_user, base_settings, role, AdminUser, BaseSettings, Role, PERMISSION_CHOICES,
    ROLE_CHOICES,
};

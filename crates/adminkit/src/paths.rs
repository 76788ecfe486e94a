//! Resource path resolution.
//!
//! Uploads, templates and other resources are referred to by logical,
//! app-relative paths such as `~/uploads/logo.png`. [`PathResolver`] turns them
//! into absolute paths under the hosting environment's web root when one is
//! configured, and under the content root otherwise.
//!
//! Resolution is pure string work: nothing here touches the filesystem.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use crate::config::ApiConfig;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathResolver {
    web_root: Option<PathBuf>,
    content_root: PathBuf,
}

impl PathResolver {
    pub fn new(web_root: Option<PathBuf>, content_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root,
            content_root: content_root.into(),
        }
    }

    pub fn web_root(&self) -> Option<&Path> {
        self.web_root.as_deref()
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// The directory logical paths resolve against.
    pub fn root(&self) -> &Path {
        self.web_root.as_deref().unwrap_or(&self.content_root)
    }

    /// Resolves a logical path against the web root, or the content root when no
    /// web root is set.
    ///
    /// A leading `~/` or `/` marks the path as app-relative and is stripped, so
    /// `~/uploads`, `/uploads` and `uploads` all resolve to `<root>/uploads`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let relative = strip_app_prefix(path);
        if relative.is_empty() {
            return self.root().to_path_buf();
        }
        self.root().join(relative)
    }

    /// Whether `path` resolves to a location inside the root.
    ///
    /// Logical paths containing `..` can climb out of the root; callers that
    /// serve files should reject those.
    pub fn is_contained(&self, path: &str) -> bool {
        let mut depth: usize = 0;
        for component in Path::new(strip_app_prefix(path)).components() {
            match component {
                Component::Normal(_) => depth += 1,
                Component::ParentDir => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return false,
                },
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => return false,
            }
        }
        true
    }

    /// Absolute location of the configured uploads folder.
    pub fn uploads_dir(&self, config: &ApiConfig) -> PathBuf {
        self.resolve(&config.uploads_folder)
    }
}

fn strip_app_prefix(path: &str) -> &str {
    let path = match path {
        "~" => "",
        _ => path.strip_prefix("~/").unwrap_or(path),
    };
    path.trim_start_matches(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_web_root() -> PathResolver {
        PathResolver::new(Some(PathBuf::from("/srv/www")), "/srv/app")
    }

    #[test]
    fn resolves_under_web_root_when_set() {
        let resolver = with_web_root();
        assert_eq!(resolver.resolve("~/uploads/a.png"), PathBuf::from("/srv/www/uploads/a.png"));
        assert_eq!(resolver.resolve("/uploads/a.png"), PathBuf::from("/srv/www/uploads/a.png"));
        assert_eq!(resolver.resolve("uploads/a.png"), PathBuf::from("/srv/www/uploads/a.png"));
    }

    #[test]
    fn falls_back_to_content_root() {
        let resolver = PathResolver::new(None, "/srv/app");
        assert_eq!(resolver.resolve("~/templates"), PathBuf::from("/srv/app/templates"));
        assert_eq!(resolver.root(), Path::new("/srv/app"));
    }

    #[test]
    fn root_markers_alone_resolve_to_root() {
        let resolver = with_web_root();
        for path in ["", "~", "~/", "/"] {
            assert_eq!(resolver.resolve(path), PathBuf::from("/srv/www"), "{:?}", path);
        }
    }

    #[test]
    fn resolved_paths_share_the_root_prefix() {
        let resolver = with_web_root();
        for path in ["a", "~/b/c", "/d", "e/f/g.txt", "~/uploads/"] {
            assert!(resolver.resolve(path).starts_with("/srv/www"), "{}", path);
        }
    }

    #[test]
    fn containment_rejects_climbing_paths() {
        let resolver = with_web_root();
        assert!(resolver.is_contained("~/uploads/../logo.png"));
        assert!(!resolver.is_contained("~/../etc/passwd"));
        assert!(!resolver.is_contained("uploads/../../x"));
    }

    #[test]
    fn uploads_dir_uses_config() {
        let config = ApiConfig {
            uploads_folder: "~/media".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(with_web_root().uploads_dir(&config), PathBuf::from("/srv/www/media"));
    }
}

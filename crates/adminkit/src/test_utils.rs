use crate::api::AdminApi;
use crate::models::forum;
use crate::paths::PathResolver;
use crate::store::fs_backend::FsBackend;
use crate::store::FileStore;
use std::path::PathBuf;
use tempfile::TempDir;

/// The forum deployment over a file store in a temp directory.
pub struct TestEnv {
    // Held so the directory lives as long as the test
    pub _temp_dir: TempDir,
    pub root: PathBuf,
    pub api: AdminApi<FsBackend>,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let api = forum::api(FileStore::at(root.join("data")))
            .expect("forum deployment builds")
            .with_resolver(PathResolver::new(None, root.clone()));
        Self {
            _temp_dir: temp_dir,
            root,
            api,
        }
    }
}

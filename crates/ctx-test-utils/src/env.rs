//! [`TestEnv`] builder for ctx test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding an isolated "home" with the global config
/// and a separate project tree for project-local config.
///
/// ```text
/// <tmp>/home/.config/ctx/config.json    global config
/// <tmp>/project/.ctx/config.json        project-local config
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use ctx_test_utils::env::TestEnv;
///
/// let env = TestEnv::new();
/// env.write_global(r#"{"account": "a1"}"#);
/// let cwd = env.project_subdir("src/app");
/// env.assert_global_json(serde_json::json!({"account": "a1"}));
/// ```
pub struct TestEnv {
    temp_dir: TempDir,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    /// Create the directory skeleton: `home/` and `project/`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("home")).unwrap();
        fs::create_dir_all(temp_dir.path().join("project")).unwrap();
        Self { temp_dir }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The isolated home directory.
    pub fn home(&self) -> PathBuf {
        self.root().join("home")
    }

    /// Path of the global config file (not created until written).
    pub fn global_path(&self) -> PathBuf {
        self.home().join(".config").join("ctx").join("config.json")
    }

    /// Root of the project tree.
    pub fn project_root(&self) -> PathBuf {
        self.root().join("project")
    }

    /// Path of the project-local config at the project root.
    pub fn local_path(&self) -> PathBuf {
        self.project_root().join(".ctx").join("config.json")
    }

    /// Create and return a directory nested inside the project.
    pub fn project_subdir(&self, relative: &str) -> PathBuf {
        let dir = self.project_root().join(relative);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write raw content to the global config file.
    pub fn write_global(&self, content: &str) {
        write_file(&self.global_path(), content);
    }

    /// Write raw content to the project-local config file.
    pub fn write_local(&self, content: &str) {
        write_file(&self.local_path(), content);
    }

    /// Raw bytes of the global config, `None` if absent.
    pub fn read_global(&self) -> Option<Vec<u8>> {
        fs::read(self.global_path()).ok()
    }

    /// Raw bytes of the project-local config, `None` if absent.
    pub fn read_local(&self) -> Option<Vec<u8>> {
        fs::read(self.local_path()).ok()
    }

    /// Assert the global config parses to exactly `expected`.
    pub fn assert_global_json(&self, expected: serde_json::Value) {
        assert_json_file(&self.global_path(), expected);
    }

    /// Assert the project-local config parses to exactly `expected`.
    pub fn assert_local_json(&self, expected: serde_json::Value) {
        assert_json_file(&self.local_path(), expected);
    }

    /// Assert no `*.tmp` files are left next to either config file.
    pub fn assert_no_temp_files(&self) {
        for path in [self.global_path(), self.local_path()] {
            let Some(dir) = path.parent() else { continue };
            let Ok(entries) = fs::read_dir(dir) else { continue };
            let leftovers: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .filter(|name| name.ends_with(".tmp"))
                .collect();
            assert!(
                leftovers.is_empty(),
                "temp files left in {}: {:?}",
                dir.display(),
                leftovers
            );
        }
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn assert_json_file(path: &Path, expected: serde_json::Value) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("expected {} to exist: {}", path.display(), e));
    let actual: serde_json::Value = serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("{} is not valid JSON: {}", path.display(), e));
    assert_eq!(actual, expected, "unexpected content in {}", path.display());
}

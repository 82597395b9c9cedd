//! [`TestProject`] fixture builder.

use std::fs;
use std::path::{Path, PathBuf};

use rulesets_fs::NormalizedPath;
use tempfile::TempDir;

/// A temporary rulesets home (`<tmp>/home`) and project (`<tmp>/project`).
///
/// # Example
///
/// ```rust,no_run
/// use rulesets_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_ruleset("base", "1.0.0", &[], "Be concise.");
/// project.write_ruleset("react", "2.0.0", &["base"], "Prefer hooks.");
/// project.assert_file_not_exists("AGENTS.md");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create empty home and project directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("home")).unwrap();
        fs::create_dir_all(temp_dir.path().join("project")).unwrap();
        Self { temp_dir }
    }

    /// The rulesets home directory.
    pub fn home(&self) -> PathBuf {
        self.temp_dir.path().join("home")
    }

    /// The project root.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("project")
    }

    pub fn home_path(&self) -> NormalizedPath {
        NormalizedPath::new(self.home())
    }

    pub fn root_path(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    /// Directory of ruleset `name` inside the home.
    pub fn ruleset_dir(&self, name: &str) -> PathBuf {
        self.home().join("sets").join(name)
    }

    /// Write (or overwrite) a ruleset with the given version and parents.
    pub fn write_ruleset(&self, name: &str, version: &str, extends: &[&str], rules: &str) {
        let extends_list = extends
            .iter()
            .map(|parent| format!("\"{parent}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let mut meta = format!("[set]\nname = \"{name}\"\nversion = \"{version}\"\n");
        if !extends.is_empty() {
            meta.push_str(&format!("\n[extends]\nsets = [{extends_list}]\n"));
        }
        self.write_ruleset_raw(name, &meta, Some(rules));
    }

    /// Write a ruleset from raw `meta.toml` text and optional rules.
    pub fn write_ruleset_raw(&self, name: &str, meta: &str, rules: Option<&str>) {
        let dir = self.ruleset_dir(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("meta.toml"), meta).unwrap();
        if let Some(rules) = rules {
            fs::write(dir.join("rules.md"), rules).unwrap();
        }
    }

    /// Write the global `config.toml` in the home.
    pub fn write_config(&self, content: &str) {
        fs::write(self.home().join("config.toml"), content).unwrap();
    }

    /// Absolute path of a project-relative file.
    pub fn project_file(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    pub fn write_project_file(&self, rel: &str, content: &str) {
        let path = self.project_file(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Read a project-relative file.
    ///
    /// # Panics
    /// Panics with the path when the file cannot be read.
    pub fn read_project_file(&self, rel: &str) -> String {
        let path = self.project_file(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", path.display()))
    }

    pub fn assert_file_exists(&self, rel: &str) {
        let path = self.project_file(rel);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    pub fn assert_file_not_exists(&self, rel: &str) {
        let path = self.project_file(rel);
        assert!(!path.exists(), "Expected file NOT to exist: {}", path.display());
    }

    /// Assert that the project-relative file contains `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read_project_file(rel);
        assert!(
            file_content.contains(content),
            "Expected {rel} to contain {content:?}, got:\n{file_content}"
        );
    }

    pub fn assert_file_not_contains(&self, rel: &str, content: &str) {
        let file_content = self.read_project_file(rel);
        assert!(
            !file_content.contains(content),
            "Expected {rel} NOT to contain {content:?}, got:\n{file_content}"
        );
    }

    /// Root of the temp dir holding both home and project.
    pub fn temp_root(&self) -> &Path {
        self.temp_dir.path()
    }
}

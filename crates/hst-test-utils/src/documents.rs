//! [`TestDocuments`] for tests that load configuration documents from disk.

use std::fs;
use std::path::{Path, PathBuf};

use hst_node::HstNode;
use tempfile::TempDir;

/// A temporary directory of configuration documents.
///
/// # Example
///
/// ```rust
/// use hst_test_utils::documents::TestDocuments;
/// use hst_test_utils::nodes::{ConfigurationBuilder, component};
///
/// let docs = TestDocuments::new();
/// let path = docs.write_yaml("demo.yaml", &ConfigurationBuilder::new("demo").page(component("home")).build());
/// docs.assert_file_contains("demo.yaml", "hst:pages");
/// assert!(path.exists());
/// ```
pub struct TestDocuments {
    temp_dir: TempDir,
}

impl Default for TestDocuments {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDocuments {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Write raw content, creating parent directories as needed.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_yaml(&self, name: &str, node: &HstNode) -> PathBuf {
        self.write(name, &serde_yaml::to_string(node).unwrap())
    }

    pub fn write_json(&self, name: &str, node: &HstNode) -> PathBuf {
        self.write(name, &serde_json::to_string_pretty(node).unwrap())
    }

    pub fn write_toml(&self, name: &str, node: &HstNode) -> PathBuf {
        self.write(name, &toml::to_string(node).unwrap())
    }

    /// Assert that the file at `name` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, name: &str, content: &str) {
        let full_path = self.path(name);
        let file_content = fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()));
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            full_path.display(),
            content,
            file_content
        );
    }
}

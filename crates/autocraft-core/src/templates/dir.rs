//! Resolution of the directory the template files are read from

use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit templates directory
pub const TEMPLATE_DIR_ENV: &str = "AUTOCRAFT_TEMPLATE_DIR";

/// A validated templates directory
#[derive(Debug, Clone)]
pub struct TemplateDir {
    path: PathBuf,
}

impl TemplateDir {
    /// Wrap a directory without checking it
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns a displayable version of the template path
    pub fn display(&self) -> std::path::Display<'_> {
        self.path.display()
    }

    /// Use `custom_dir` if given, otherwise search the standard locations
    pub fn discover(custom_dir: Option<&Path>) -> io::Result<Self> {
        let path = if let Some(dir) = custom_dir {
            if !dir.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Template directory not found: {}", dir.display()),
                ));
            }
            dir.to_path_buf()
        } else {
            Self::find_template_dir().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "Could not find template directory in any standard location",
                )
            })?
        };

        Ok(Self::new(path))
    }

    /// Check the standard locations in priority order
    fn find_template_dir() -> Option<PathBuf> {
        // 1. Check environment variable
        if let Ok(dir) = std::env::var(TEMPLATE_DIR_ENV) {
            let path = PathBuf::from(dir);
            if path.is_dir() {
                return Some(path);
            }
        }

        // 2. Check current directory
        let current = PathBuf::from("templates");
        if current.is_dir() {
            return Some(current);
        }

        // 3. Check the workspace root this crate was built from (development)
        let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
        if workspace.is_dir() {
            return Some(workspace);
        }

        // 4. Check in the user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            let templates_dir = home_dir.join(".autocraft").join("templates");
            if templates_dir.is_dir() {
                return Some(templates_dir);
            }
        }

        None
    }

    /// Get the path of the directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert to PathBuf
    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_template_dir_validation() {
        let temp_dir = tempdir().unwrap();

        let template = TemplateDir::discover(Some(temp_dir.path()));
        assert!(template.is_ok());
        assert_eq!(template.unwrap().path(), temp_dir.path());

        let result = TemplateDir::discover(Some(Path::new("/nonexistent")));
        assert!(result.is_err());
    }

    #[test]
    fn test_discovers_workspace_templates() {
        // The repository ships its templates next to the crates.
        let dir = TemplateDir::discover(None).unwrap();
        assert!(dir.path().is_dir());
    }
}

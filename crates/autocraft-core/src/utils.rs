//! Path and text helpers shared by every generator

use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::WriteOutcome;

/// Create every ancestor directory of `path`.
pub fn ensure_parent_dirs(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Write `content` to `path`.
///
/// With `overwrite == false` an existing file is left untouched and reported
/// as skipped. Write failures are returned unchanged.
pub fn write_file(path: &Path, content: &str, overwrite: bool) -> crate::Result<WriteOutcome> {
    if !overwrite && path.exists() {
        log::warn!("Not overwriting existing file: {}", path.display());
        return Ok(WriteOutcome::Skipped {
            path: path.to_path_buf(),
        });
    }

    ensure_parent_dirs(path)?;
    fs::write(path, content)?;
    log::debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(WriteOutcome::Wrote {
        path: path.to_path_buf(),
        bytes: content.len(),
    })
}

/// Map a dotted Java package to a relative directory path.
///
/// Malformed packages give malformed paths; nothing is validated here.
pub fn normalize_package_to_path(base_package: &str) -> PathBuf {
    PathBuf::from(base_package.trim().replace('.', "/"))
}

/// Read a template file from `dir`, trimmed.
///
/// A missing or unreadable file yields an empty string.
pub fn read_template(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    if !path.is_file() {
        log::warn!("Template not found: {}", path.display());
        return String::new();
    }

    match fs::read_to_string(&path) {
        Ok(content) => content.trim().to_string(),
        Err(e) => {
            log::warn!("Failed to read template {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Escape a value for use inside a Java string literal.
pub fn escape_java_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_normalize_package_to_path() {
        assert_eq!(
            normalize_package_to_path("  com.example.qa "),
            PathBuf::from("com/example/qa")
        );
        assert_eq!(normalize_package_to_path("single"), PathBuf::from("single"));
        // No validation: doubled dots pass straight through.
        assert_eq!(normalize_package_to_path("a..b"), PathBuf::from("a//b"));
    }

    #[test]
    fn test_write_file_creates_parents() -> crate::Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("deep/nested/file.txt");

        let outcome = write_file(&target, "hello", true)?;
        assert_eq!(
            outcome,
            WriteOutcome::Wrote {
                path: target.clone(),
                bytes: 5
            }
        );
        assert_eq!(fs::read_to_string(&target)?, "hello");
        Ok(())
    }

    #[test]
    fn test_write_file_skips_existing_without_overwrite() -> crate::Result<()> {
        let dir = tempdir()?;
        let target = dir.path().join("keep.txt");
        fs::write(&target, "original")?;

        let outcome = write_file(&target, "replacement", false)?;
        assert!(outcome.is_skipped());
        assert!(outcome.to_string().starts_with("[SKIPPED]"));
        assert_eq!(fs::read_to_string(&target)?, "original");

        write_file(&target, "replacement", true)?;
        assert_eq!(fs::read_to_string(&target)?, "replacement");
        Ok(())
    }

    #[test]
    fn test_write_file_counts_bytes_not_chars() -> crate::Result<()> {
        let dir = tempdir()?;
        let outcome = write_file(&dir.path().join("u.txt"), "é", true)?;
        assert!(matches!(outcome, WriteOutcome::Wrote { bytes: 2, .. }));
        Ok(())
    }

    #[test]
    fn test_write_file_into_unwritable_location_fails() -> crate::Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory")?;

        let result = write_file(&blocker.join("child.txt"), "x", true);
        assert!(matches!(result, Err(crate::Error::Io(_))));
        Ok(())
    }

    #[test]
    fn test_read_template() -> crate::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("BODY.j2"), "\n  int x = 1;\n\n")?;

        assert_eq!(read_template(dir.path(), "BODY.j2"), "int x = 1;");
        assert_eq!(read_template(dir.path(), "MISSING.j2"), "");
        assert_eq!(read_template(Path::new("/nonexistent/dir"), "X.j2"), "");
        Ok(())
    }

    #[test]
    fn test_escape_java_string() {
        assert_eq!(escape_java_string(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_java_string("a\\b\nc"), "a\\\\b\\nc");
        assert_eq!(escape_java_string("plain"), "plain");
    }
}

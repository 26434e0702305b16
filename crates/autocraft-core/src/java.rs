//! Java compilation units and their rendering.
//!
//! [`JavaUnit`] is the single place Java source text is assembled. Every
//! generator that produces Java builds a unit from its pieces and lets
//! [`JavaUnit::render`] lay out the package line, imports, Javadoc,
//! annotations, class header and indented body.
//!
//! # Examples
//!
//! ```
//! use autocraft_core::java::{JavaUnit, SourceKind};
//! use std::path::Path;
//!
//! let unit = JavaUnit::new("com.example.qa", "Smoke", SourceKind::Test);
//! assert_eq!(unit.render(), "package com.example.qa;\n\npublic class Smoke {\n}\n");
//! assert_eq!(
//!     unit.target_path(Path::new("out")),
//!     Path::new("out/src/test/java/com/example/qa/Smoke.java")
//! );
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::artifact::{Artifact, WriteOutcome};
use crate::utils::normalize_package_to_path;

// External imports (alphabetized)
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Source set a class belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `src/main/java`
    Main,
    /// `src/test/java`
    #[default]
    Test,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
        }
    }
}

impl FromStr for SourceKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Self::Main),
            "test" => Ok(Self::Test),
            other => Err(crate::Error::validation(format!(
                "src_type must be 'main' or 'test', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Java class, assembled from caller-supplied pieces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaUnit {
    pub package: String,
    pub class_name: String,
    pub kind: SourceKind,
    pub imports: Vec<String>,
    pub javadoc: Option<String>,
    pub annotations: Vec<String>,
    pub implements: Vec<String>,
    pub body: String,
}

impl JavaUnit {
    pub fn new(package: impl Into<String>, class_name: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            package: package.into(),
            class_name: class_name.into(),
            kind,
            imports: Vec::new(),
            javadoc: None,
            annotations: Vec::new(),
            implements: Vec::new(),
            body: String::new(),
        }
    }

    pub fn imports<I, S>(mut self, imports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.imports.extend(imports.into_iter().map(Into::into));
        self
    }

    pub fn annotations<I, S>(mut self, annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.annotations
            .extend(annotations.into_iter().map(Into::into));
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.implements.push(interface.into());
        self
    }

    pub fn javadoc(mut self, javadoc: impl Into<String>) -> Self {
        self.javadoc = Some(javadoc.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// `<base>/src/<kind>/java/<package path>/<Class>.java`
    pub fn target_path(&self, base_dir: &Path) -> PathBuf {
        base_dir
            .join("src")
            .join(self.kind.as_str())
            .join("java")
            .join(normalize_package_to_path(&self.package))
            .join(format!("{}.java", self.class_name))
    }

    /// Render the full source file, ending with a newline.
    pub fn render(&self) -> String {
        let mut lines = vec![format!("package {};", self.package.trim()), String::new()];

        let imports: Vec<&str> = self
            .imports
            .iter()
            .map(|imp| imp.trim().trim_end_matches(';'))
            .filter(|imp| !imp.is_empty())
            .collect();
        for imp in &imports {
            lines.push(format!("import {imp};"));
        }
        if !imports.is_empty() {
            lines.push(String::new());
        }

        if let Some(doc) = self.javadoc.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push("/**".to_string());
            // `*/` inside the text would close the comment early
            for line in doc.replace("*/", "*&#47;").lines() {
                lines.push(format!(" * {line}").trim_end().to_string());
            }
            lines.push(" */".to_string());
        }

        lines.extend(
            self.annotations
                .iter()
                .filter(|a| !a.trim().is_empty())
                .cloned(),
        );

        if self.implements.is_empty() {
            lines.push(format!("public class {} {{", self.class_name));
        } else {
            lines.push(format!(
                "public class {} implements {} {{",
                self.class_name,
                self.implements.join(", ")
            ));
        }

        for line in self.body.lines() {
            if line.trim().is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("    {line}"));
            }
        }
        lines.push("}".to_string());

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }

    /// The unit as a file under `base_dir`, always overwriting.
    pub fn to_artifact(&self, base_dir: &Path) -> Artifact {
        Artifact::new(self.target_path(base_dir), self.render())
    }

    /// Render and write the unit.
    pub fn emit(&self, base_dir: &Path) -> crate::Result<WriteOutcome> {
        log::debug!(
            "Emitting {}.{} ({})",
            self.package.trim(),
            self.class_name,
            self.kind
        );
        self.to_artifact(base_dir).write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brace_balance(s: &str) -> i64 {
        s.chars().fold(0, |acc, c| match c {
            '{' => acc + 1,
            '}' => acc - 1,
            _ => acc,
        })
    }

    #[test]
    fn test_source_kind_parse() {
        assert_eq!("main".parse::<SourceKind>().unwrap(), SourceKind::Main);
        assert_eq!("test".parse::<SourceKind>().unwrap(), SourceKind::Test);
        let err = "bench".parse::<SourceKind>().unwrap_err();
        assert!(matches!(err, crate::Error::Validation(_)));
        assert_eq!(SourceKind::default(), SourceKind::Test);
    }

    #[test]
    fn test_render_full_unit() {
        let unit = JavaUnit::new("com.example", "Widget", SourceKind::Main)
            .imports(["java.util.List", "", "java.sql.*;"])
            .javadoc("First line.\n\nSecond line.")
            .annotations(["@Deprecated"])
            .implements("AutoCloseable")
            .body("private int x;\n\npublic void close() {}");

        let expected = [
            "package com.example;",
            "",
            "import java.util.List;",
            "import java.sql.*;",
            "",
            "/**",
            " * First line.",
            " *",
            " * Second line.",
            " */",
            "@Deprecated",
            "public class Widget implements AutoCloseable {",
            "    private int x;",
            "",
            "    public void close() {}",
            "}",
            "",
        ]
        .join("\n");
        assert_eq!(unit.render(), expected);
    }

    #[test]
    fn test_javadoc_cannot_close_comment_early() {
        let unit = JavaUnit::new("a.b", "C", SourceKind::Main)
            .javadoc("Matches /api/*/orders and ends */ here.");
        let out = unit.render();
        assert!(out.contains(" * Matches /api/*&#47;orders and ends *&#47; here.\n */\n"));
        assert_eq!(out.matches("*/").count(), 1);
    }

    #[test]
    fn test_render_is_balanced_with_nested_body() {
        let unit = JavaUnit::new("a.b", "C", SourceKind::Test)
            .body("void m() {\n    if (true) { return; }\n}");
        let out = unit.render();
        assert_eq!(brace_balance(&out), 0);
        assert!(out.starts_with("package a.b;\n"));
        assert!(out.contains("\n        if (true) { return; }\n"));
    }

    #[test]
    fn test_target_path_per_kind() {
        let base = Path::new("/repo");
        let main = JavaUnit::new("org.acme.kit", "App", SourceKind::Main);
        let test = JavaUnit::new("org.acme.kit", "AppTest", SourceKind::Test);
        assert_eq!(
            main.target_path(base),
            PathBuf::from("/repo/src/main/java/org/acme/kit/App.java")
        );
        assert_eq!(
            test.target_path(base),
            PathBuf::from("/repo/src/test/java/org/acme/kit/AppTest.java")
        );
    }
}

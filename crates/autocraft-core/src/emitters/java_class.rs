//! The general-purpose Java class generator.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::default_base_dir;
use crate::artifact::Report;
use crate::java::{JavaUnit, SourceKind};
use crate::tools::Generator;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct JavaCodegenArgs {
    /// Java package, e.g. com.example.qatestkit
    pub base_package: String,
    /// Class name without .java
    pub class_name: String,
    /// Either 'main' or 'test'
    #[serde(default)]
    pub src_type: SourceKind,
    /// Class body placed between the braces
    #[serde(default)]
    pub body: String,
    /// Import targets, without the `import` keyword
    #[serde(default)]
    pub imports: Vec<String>,
    /// Annotations placed before the class declaration
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Javadoc text for the class
    #[serde(default)]
    pub javadoc: Option<String>,
    /// Repository root under which src/... is created
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

/// Writes a Java class or test to `src/{main|test}/java/<package>`.
pub struct JavaCodegenTool;

impl Generator for JavaCodegenTool {
    type Args = JavaCodegenArgs;
    const NAME: &'static str = "JavaCodegenTool";
    const DESCRIPTION: &'static str =
        "Writes a Java class or test to the appropriate src path based on base_package and src_type.";

    fn run(&self, args: JavaCodegenArgs) -> crate::Result<Report> {
        let mut unit = JavaUnit::new(args.base_package, args.class_name, args.src_type)
            .imports(args.imports)
            .annotations(args.annotations)
            .body(args.body);
        if let Some(doc) = args.javadoc {
            unit = unit.javadoc(doc);
        }
        Ok(unit.emit(&args.base_dir)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Tool, ToolAdapter};
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_smoke_class_end_to_end() -> crate::Result<()> {
        let dir = tempdir()?;
        let tool = ToolAdapter::new(JavaCodegenTool);
        let report = tool.invoke(&json!({
            "base_package": "com.example.qa",
            "class_name": "Smoke",
            "src_type": "test",
            "body": "",
            "base_dir": dir.path(),
        }))?;

        let path = dir.path().join("src/test/java/com/example/qa/Smoke.java");
        assert_eq!(
            fs::read_to_string(&path)?,
            "package com.example.qa;\n\npublic class Smoke {\n}\n"
        );
        assert!(report.starts_with("[WROTE]"));
        assert!(report.contains("Smoke.java"));
        Ok(())
    }

    #[test]
    fn test_invalid_src_type_rejected() -> crate::Result<()> {
        let dir = tempdir()?;
        let tool = ToolAdapter::new(JavaCodegenTool);
        let err = tool
            .invoke(&json!({
                "base_package": "com.example",
                "class_name": "X",
                "src_type": "bench",
                "base_dir": dir.path(),
            }))
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidParameter { .. }));
        assert!(!dir.path().join("src").exists());
        Ok(())
    }

    #[test]
    fn test_misspelled_parameter_rejected() -> crate::Result<()> {
        let dir = tempdir()?;
        let tool = ToolAdapter::new(JavaCodegenTool);
        let err = tool
            .invoke(&json!({
                "base_package": "com.example",
                "class_name": "MainApp",
                "srcType": "main",
                "base_dir": dir.path(),
            }))
            .unwrap_err();
        match err {
            crate::Error::InvalidParameter { tool, message } => {
                assert_eq!(tool, "JavaCodegenTool");
                assert!(message.contains("srcType"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("src").exists());

        let schema = tool.parameters();
        assert_eq!(schema["additionalProperties"], json!(false));
        Ok(())
    }

    #[test]
    fn test_overwrites_existing_class() -> crate::Result<()> {
        let dir = tempdir()?;
        let tool = ToolAdapter::new(JavaCodegenTool);
        let params = |body: &str| {
            json!({
                "base_package": "com.example",
                "class_name": "Main",
                "src_type": "main",
                "body": body,
                "base_dir": dir.path(),
            })
        };
        tool.invoke(&params("int a;"))?;
        tool.invoke(&params("int b;"))?;

        let content = fs::read_to_string(dir.path().join("src/main/java/com/example/Main.java"))?;
        assert!(content.contains("    int b;"));
        assert!(!content.contains("int a;"));
        Ok(())
    }
}

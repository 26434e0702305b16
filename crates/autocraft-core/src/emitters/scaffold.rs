//! Repository skeleton for a Maven/Java project.

use std::fs;
use std::path::PathBuf;

use indexmap::IndexSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::default_base_dir;
use crate::artifact::{Report, WriteOutcome};
use crate::tools::Generator;
use crate::utils::ensure_parent_dirs;

/// Conventional layout; entries ending in `/` are directories.
pub const DEFAULT_SCAFFOLD: [&str; 12] = [
    ".editorconfig",
    ".gitattributes",
    ".gitignore",
    "README.md",
    "docs/",
    "docs/USAGE.md",
    "docs/ARCHITECTURE.md",
    "pom.xml",
    "src/main/java/",
    "src/test/java/",
    "src/main/resources/",
    "src/test/resources/",
];

fn default_include_defaults() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RepoScaffolderArgs {
    /// Base directory for the project
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Include the standard Maven/Java skeleton
    #[serde(default = "default_include_defaults")]
    pub include_defaults: bool,
    /// Additional directories (trailing '/') and files to create
    #[serde(default)]
    pub extra_paths: Vec<String>,
}

impl RepoScaffolderArgs {
    /// Defaults first, then extras; duplicates dropped, first one wins.
    pub fn planned_paths(&self) -> Vec<String> {
        let defaults: &[&str] = if self.include_defaults {
            &DEFAULT_SCAFFOLD
        } else {
            &[]
        };
        let planned: IndexSet<String> = defaults
            .iter()
            .map(|p| p.to_string())
            .chain(self.extra_paths.iter().cloned())
            .collect();
        planned.into_iter().collect()
    }
}

/// Creates directories and empty placeholder files; never truncates.
pub struct RepoScaffolderTool;

impl Generator for RepoScaffolderTool {
    type Args = RepoScaffolderArgs;
    const NAME: &'static str = "RepoScaffolderTool";
    const DESCRIPTION: &'static str =
        "Creates a Java/Maven project skeleton and any additional paths.";

    fn run(&self, args: RepoScaffolderArgs) -> crate::Result<Report> {
        fs::create_dir_all(&args.base_dir)?;
        let mut report = Report::new();

        for entry in args.planned_paths() {
            let target = args.base_dir.join(&entry);
            let outcome = if entry.ends_with('/') {
                if target.is_dir() {
                    WriteOutcome::Skipped { path: target }
                } else {
                    fs::create_dir_all(&target)?;
                    WriteOutcome::CreatedDir { path: target }
                }
            } else if target.exists() {
                WriteOutcome::Skipped { path: target }
            } else {
                ensure_parent_dirs(&target)?;
                fs::write(&target, "")?;
                WriteOutcome::CreatedFile { path: target }
            };
            log::debug!("{}", outcome);
            report.push(outcome);
        }

        Ok(report)
    }
}

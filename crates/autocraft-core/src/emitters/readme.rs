//! README.md writer.

use std::path::PathBuf;

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::default_base_dir;
use crate::artifact::{Artifact, Report};
use crate::tools::Generator;

fn default_title() -> String {
    "QA Testkit".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ReadmeArgs {
    /// Project title
    #[serde(default = "default_title")]
    pub title: String,
    /// Heading to markdown content, rendered in the given order
    #[serde(default)]
    pub sections: IndexMap<String, String>,
    /// Repository root
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

/// Render the markdown document.
pub fn render_readme(title: &str, sections: &IndexMap<String, String>) -> String {
    let mut lines = vec![format!("# {title}"), String::new()];
    for (heading, body) in sections {
        lines.push(format!("## {heading}"));
        lines.push(body.trim().to_string());
        lines.push(String::new());
    }
    lines.join("\n")
}

pub struct ReadmeWriterTool;

impl Generator for ReadmeWriterTool {
    type Args = ReadmeArgs;
    const NAME: &'static str = "ReadmeWriterTool";
    const DESCRIPTION: &'static str = "Generates a README.md with given sections.";

    fn run(&self, args: ReadmeArgs) -> crate::Result<Report> {
        let content = render_readme(&args.title, &args.sections);
        Ok(Artifact::new(args.base_dir.join("README.md"), content)
            .write()?
            .into())
    }
}

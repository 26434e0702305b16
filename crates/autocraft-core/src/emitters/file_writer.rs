//! Raw file writer tool.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artifact::{Artifact, Report};
use crate::tools::Generator;

fn default_overwrite() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FileWriterArgs {
    /// Filesystem path to write
    pub path: PathBuf,
    /// Full file contents
    pub content: String,
    /// If false, an existing file is left as-is
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

pub struct FileWriterTool;

impl Generator for FileWriterTool {
    type Args = FileWriterArgs;
    const NAME: &'static str = "FileWriterTool";
    const DESCRIPTION: &'static str =
        "Writes text content to a file. Creates directories as needed.";

    fn run(&self, args: FileWriterArgs) -> crate::Result<Report> {
        let mut artifact = Artifact::new(args.path, args.content);
        if !args.overwrite {
            artifact = artifact.keep_existing();
        }
        Ok(artifact.write()?.into())
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tera::Context;

use super::{default_base_dir, render_body};
use crate::artifact::Report;
use crate::java::{JavaUnit, SourceKind};
use crate::templates::{TemplateId, TemplateStore};
use crate::tools::Generator;

fn default_class_name() -> String {
    "FakeDataExamples".to_string()
}

fn default_examples() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FakerArgs {
    pub base_package: String,
    #[serde(default = "default_class_name")]
    pub class_name: String,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Number of fake rows to print in example
    #[serde(default = "default_examples")]
    pub examples: u32,
}

/// A `main` class printing JavaFaker samples.
pub struct FakerTool {
    store: Arc<TemplateStore>,
}

impl FakerTool {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }
}

impl Generator for FakerTool {
    type Args = FakerArgs;
    const NAME: &'static str = "FakerTool";
    const DESCRIPTION: &'static str =
        "Generates a simple Java class that prints a few lines of fake data using JavaFaker.";

    fn run(&self, args: FakerArgs) -> crate::Result<Report> {
        let mut context = Context::new();
        context.insert("examples", &args.examples);
        let body = render_body(&self.store, TemplateId::FakerBody, &context)?;

        let unit = JavaUnit::new(args.base_package, args.class_name, SourceKind::Main)
            .imports(["com.github.javafaker.Faker"])
            .javadoc("Auto-generated fake data example using JavaFaker.")
            .body(body);
        Ok(unit.emit(&args.base_dir)?.into())
    }
}

//! Tool traits and the adapter that turns a typed generator into a tool.
//!
//! A [`Generator`] declares its arguments as a plain struct. [`ToolAdapter`]
//! derives the parameter schema from that struct, deserializes incoming
//! parameter bags into it (applying defaults and enum constraints) and hands
//! the typed value to the generator.

pub mod registry;

pub use registry::{Materialized, SkippedTool, ToolRegistry};

use std::marker::PhantomData;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::artifact::Report;

/// A typed generator: arguments in, written artifacts out.
pub trait Generator: Send + Sync {
    /// Parameter set accepted by the generator
    type Args: DeserializeOwned + JsonSchema;

    /// Stable registry name
    const NAME: &'static str;

    /// One-line description shown to callers
    const DESCRIPTION: &'static str;

    fn run(&self, args: Self::Args) -> crate::Result<Report>;
}

/// Object-safe view of a generator, as stored in the registry.
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the accepted parameters
    fn parameters(&self) -> JsonValue;

    /// Validate `params` and run; returns the status report text.
    fn invoke(&self, params: &JsonValue) -> crate::Result<String>;
}

/// Name, description and parameter schema of a tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: JsonValue,
}

impl ToolSpec {
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.parameters(),
        }
    }

    /// Whether the schema declares a property called `name`
    pub fn accepts(&self, name: &str) -> bool {
        self.parameters
            .get("properties")
            .and_then(JsonValue::as_object)
            .is_some_and(|props| props.contains_key(name))
    }
}

/// Wraps a [`Generator`] so it can be stored and invoked as a [`Tool`].
pub struct ToolAdapter<G: Generator> {
    generator: G,
    _args: PhantomData<fn() -> G::Args>,
}

impl<G: Generator> ToolAdapter<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            _args: PhantomData,
        }
    }

    /// Deserialize a parameter bag into the generator's argument struct.
    pub fn parse_args(&self, params: &JsonValue) -> crate::Result<G::Args> {
        let params = match params {
            JsonValue::Null => JsonValue::Object(JsonMap::new()),
            other => other.clone(),
        };
        serde_json::from_value(params).map_err(|e| crate::Error::InvalidParameter {
            tool: G::NAME.to_string(),
            message: e.to_string(),
        })
    }
}

impl<G: Generator> Tool for ToolAdapter<G> {
    fn name(&self) -> &str {
        G::NAME
    }

    fn description(&self) -> &str {
        G::DESCRIPTION
    }

    fn parameters(&self) -> JsonValue {
        schemars::schema_for!(G::Args).as_value().clone()
    }

    fn invoke(&self, params: &JsonValue) -> crate::Result<String> {
        let args = self.parse_args(params)?;
        log::info!("Running tool: {}", G::NAME);
        let report = self.generator.run(args)?;
        Ok(report.to_string())
    }
}

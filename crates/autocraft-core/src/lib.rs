//! Autocraft Core Library
//!
//! This library provides the generator tools that scaffold a Java QA/test
//! automation project: Maven POMs, JUnit tests, JDBC/Kafka/EMS boilerplate,
//! README files and OpenAPI schemas.

pub mod artifact;
pub mod config;
pub mod crew;
pub mod emitters;
pub mod error;
pub mod java;
pub mod templates;
pub mod tools;
pub mod utils;

pub use crate::{
    artifact::{Artifact, Report, WriteOutcome},
    config::Config,
    crew::CrewDefinition,
    error::{Error, Result},
    java::{JavaUnit, SourceKind},
    templates::{TemplateDir, TemplateId, TemplateStore},
    tools::{Generator, Materialized, Tool, ToolAdapter, ToolRegistry, ToolSpec},
};

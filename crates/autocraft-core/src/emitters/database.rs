//! Database smoke tests and examples: H2, plain JDBC, embedded Mongo and
//! Testcontainers.
//!
//! Bodies come from the template store. Values substituted into Java string
//! literals are escaped first.

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
use crate::utils::escape_java_string;

/// Where the H2 smoke test gets its database from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum H2Mode {
    #[default]
    Testcontainers,
    Inmem,
}

impl H2Mode {
    fn template(&self) -> TemplateId {
        match self {
            Self::Testcontainers => TemplateId::H2TestBodyTestcontainers,
            Self::Inmem => TemplateId::H2TestBodyInmem,
        }
    }
}

fn default_h2_class() -> String {
    "H2SmokeTest".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct H2RunnerArgs {
    /// Root Java package for placement
    pub base_package: String,
    /// Test class name
    #[serde(default = "default_h2_class")]
    pub class_name: String,
    /// Repo root
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Either 'testcontainers' or 'inmem'
    #[serde(default)]
    pub mode: H2Mode,
}

pub struct H2RunnerTool {
    store: Arc<TemplateStore>,
}

impl H2RunnerTool {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }
}

impl Generator for H2RunnerTool {
    type Args = H2RunnerArgs;
    const NAME: &'static str = "H2RunnerTool";
    const DESCRIPTION: &'static str = "Generates a JUnit test that brings up H2 (in-memory) or a containerized DB and runs a simple query.";

    fn run(&self, args: H2RunnerArgs) -> crate::Result<Report> {
        let body = render_body(&self.store, args.mode.template(), &Context::new())?;
        let mut imports = vec![
            "java.sql.*",
            "org.assertj.core.api.Assertions",
            "org.junit.jupiter.api.*",
        ];
        if args.mode == H2Mode::Testcontainers {
            imports.push("org.testcontainers.containers.*");
        }

        let unit = JavaUnit::new(args.base_package, args.class_name, SourceKind::Test)
            .imports(imports)
            .javadoc("Auto-generated smoke test for DB connectivity.")
            .body(body);
        Ok(unit.emit(&args.base_dir)?.into())
    }
}

fn default_jdbc_class() -> String {
    "JdbcExec".to_string()
}

fn default_driver_class() -> String {
    "org.h2.Driver".to_string()
}

fn default_username() -> String {
    "sa".to_string()
}

fn default_sql() -> String {
    "SELECT 1".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct JdbcExecArgs {
    pub base_package: String,
    /// JDBC URL
    pub jdbc_url: String,
    #[serde(default = "default_jdbc_class")]
    pub class_name: String,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// JDBC driver FQCN
    #[serde(default = "default_driver_class")]
    pub driver_class: String,
    /// DB username
    #[serde(default = "default_username")]
    pub username: String,
    /// DB password
    #[serde(default)]
    pub password: String,
    /// SQL to run in example main()
    #[serde(default = "default_sql")]
    pub sql: String,
}

pub struct JdbcExecutorTool {
    store: Arc<TemplateStore>,
}

impl JdbcExecutorTool {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }
}

impl Generator for JdbcExecutorTool {
    type Args = JdbcExecArgs;
    const NAME: &'static str = "JDBCExecutorTool";
    const DESCRIPTION: &'static str =
        "Creates a tiny Java 'main' program that connects via JDBC and executes a query.";

    fn run(&self, args: JdbcExecArgs) -> crate::Result<Report> {
        let mut context = Context::new();
        context.insert("driver_class", &escape_java_string(&args.driver_class));
        context.insert("jdbc_url", &escape_java_string(&args.jdbc_url));
        context.insert("username", &escape_java_string(&args.username));
        context.insert("password", &escape_java_string(&args.password));
        context.insert("sql", &escape_java_string(&args.sql));
        let body = render_body(&self.store, TemplateId::JdbcExecBody, &context)?;

        let unit = JavaUnit::new(args.base_package, args.class_name, SourceKind::Main)
            .imports(["java.sql.*"])
            .javadoc("Auto-generated JDBC example application.")
            .body(body);
        Ok(unit.emit(&args.base_dir)?.into())
    }
}

fn default_mongo_class() -> String {
    "MongoEmbedTest".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MongoEmbedArgs {
    pub base_package: String,
    #[serde(default = "default_mongo_class")]
    pub class_name: String,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

pub struct MongoEmbedTool {
    store: Arc<TemplateStore>,
}

impl MongoEmbedTool {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }
}

impl Generator for MongoEmbedTool {
    type Args = MongoEmbedArgs;
    const NAME: &'static str = "MongoEmbedTool";
    const DESCRIPTION: &'static str =
        "Creates a JUnit test that starts an embedded MongoDB and verifies basic CRUD.";

    fn run(&self, args: MongoEmbedArgs) -> crate::Result<Report> {
        let body = render_body(&self.store, TemplateId::MongoEmbedBody, &Context::new())?;
        let unit = JavaUnit::new(args.base_package, args.class_name, SourceKind::Test)
            .imports([
                "org.junit.jupiter.api.*",
                "org.assertj.core.api.Assertions",
                "com.mongodb.client.*",
                "org.bson.Document",
                "de.flapdoodle.embed.mongo.*",
                "de.flapdoodle.embed.mongo.config.*",
                "de.flapdoodle.embed.mongo.distribution.*",
            ])
            .javadoc("Auto-generated embedded Mongo test using flapdoodle.")
            .body(body);
        Ok(unit.emit(&args.base_dir)?.into())
    }
}

fn default_container_class() -> String {
    "SqlServerContainerTest".to_string()
}

fn default_image() -> String {
    "mcr.microsoft.com/mssql/server:2022-latest".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TestcontainersArgs {
    pub base_package: String,
    #[serde(default = "default_container_class")]
    pub class_name: String,
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Container image
    #[serde(default = "default_image")]
    pub image: String,
}

pub struct TestcontainersTool {
    store: Arc<TemplateStore>,
}

impl TestcontainersTool {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store }
    }
}

impl Generator for TestcontainersTool {
    type Args = TestcontainersArgs;
    const NAME: &'static str = "TestcontainersTool";
    const DESCRIPTION: &'static str = "Generates a JUnit test that boots a Testcontainers DB (default SQL Server) and verifies connectivity.";

    fn run(&self, args: TestcontainersArgs) -> crate::Result<Report> {
        let mut context = Context::new();
        context.insert("image", &escape_java_string(&args.image));
        let body = render_body(
            &self.store,
            TemplateId::TestcontainersSqlServerBody,
            &context,
        )?;

        let unit = JavaUnit::new(args.base_package, args.class_name, SourceKind::Test)
            .imports([
                "java.sql.*",
                "org.assertj.core.api.Assertions",
                "org.junit.jupiter.api.*",
                "org.testcontainers.containers.*",
            ])
            .javadoc("Auto-generated Testcontainers-based SQL Server smoke test.")
            .body(body);
        Ok(unit.emit(&args.base_dir)?.into())
    }
}

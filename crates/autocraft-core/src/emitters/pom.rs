//! Maven `pom.xml` generator.
//!
//! The document comes from a Tera template. Caller dependencies and plugins
//! are listed first, followed by the baseline test stack (JUnit Jupiter,
//! AssertJ, Mockito) and the baseline build plugins (Surefire, JaCoCo), which
//! are always present.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tera::Context;

use super::default_base_dir;
use crate::artifact::{Artifact, Report};
use crate::templates::render_template;
use crate::tools::Generator;

const POM_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 https://maven.apache.org/xsd/maven-4.0.0.xsd">
  <modelVersion>4.0.0</modelVersion>

  <groupId>{{ group_id }}</groupId>
  <artifactId>{{ artifact_id }}</artifactId>
  <version>{{ version }}</version>
  <packaging>{{ packaging }}</packaging>

  <properties>
    <maven.compiler.source>{{ java_version }}</maven.compiler.source>
    <maven.compiler.target>{{ java_version }}</maven.compiler.target>
    <project.build.sourceEncoding>UTF-8</project.build.sourceEncoding>
    <junit.jupiter.version>5.10.2</junit.jupiter.version>
    <assertj.version>3.25.3</assertj.version>
    <mockito.version>5.12.0</mockito.version>
  </properties>

  <dependencies>
{%- for dep in dependencies %}
    <dependency>
      <groupId>{{ dep.group_id }}</groupId>
      <artifactId>{{ dep.artifact_id }}</artifactId>
{%- if dep.version %}
      <version>{{ dep.version }}</version>
{%- endif %}
{%- if dep.scope %}
      <scope>{{ dep.scope }}</scope>
{%- endif %}
{%- if dep.optional %}
      <optional>{{ dep.optional }}</optional>
{%- endif %}
    </dependency>
{%- endfor %}
    <!-- Baseline testing stack -->
    <dependency>
      <groupId>org.junit.jupiter</groupId>
      <artifactId>junit-jupiter</artifactId>
      <version>${junit.jupiter.version}</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.assertj</groupId>
      <artifactId>assertj-core</artifactId>
      <version>${assertj.version}</version>
      <scope>test</scope>
    </dependency>
    <dependency>
      <groupId>org.mockito</groupId>
      <artifactId>mockito-core</artifactId>
      <version>${mockito.version}</version>
      <scope>test</scope>
    </dependency>
  </dependencies>

  <build>
    <plugins>
{%- for plugin in plugins %}
      <plugin>
        <groupId>{{ plugin.group_id }}</groupId>
        <artifactId>{{ plugin.artifact_id }}</artifactId>
{%- if plugin.version %}
        <version>{{ plugin.version }}</version>
{%- endif %}
{%- if plugin.configuration_xml %}
        {{ plugin.configuration_xml }}
{%- endif %}
{%- if plugin.executions_xml %}
        {{ plugin.executions_xml }}
{%- endif %}
      </plugin>
{%- endfor %}
      <plugin>
        <groupId>org.apache.maven.plugins</groupId>
        <artifactId>maven-surefire-plugin</artifactId>
        <version>3.2.5</version>
        <configuration>
          <useModulePath>false</useModulePath>
          <includes>
            <include>**/*Test.java</include>
          </includes>
        </configuration>
      </plugin>
      <plugin>
        <groupId>org.jacoco</groupId>
        <artifactId>jacoco-maven-plugin</artifactId>
        <version>0.8.11</version>
        <executions>
          <execution>
            <goals>
              <goal>prepare-agent</goal>
            </goals>
          </execution>
          <execution>
            <id>report</id>
            <phase>test</phase>
            <goals>
              <goal>report</goal>
            </goals>
          </execution>
        </executions>
      </plugin>
    </plugins>
  </build>
</project>
"#;

fn default_group_id() -> String {
    "com.example".to_string()
}

fn default_artifact_id() -> String {
    "qa-testkit".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_java_version() -> String {
    "17".to_string()
}

fn default_packaging() -> String {
    "jar".to_string()
}

/// A `<dependency>` entry
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PomDependency {
    #[serde(rename = "groupId", alias = "group_id")]
    pub group_id: String,
    #[serde(rename = "artifactId", alias = "artifact_id")]
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: Option<bool>,
}

/// A `<plugin>` entry with optional raw XML fragments
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PomPlugin {
    #[serde(rename = "groupId", alias = "group_id")]
    pub group_id: String,
    #[serde(rename = "artifactId", alias = "artifact_id")]
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Raw XML for the <configuration>...</configuration> block
    #[serde(default, alias = "configurationXml")]
    pub configuration_xml: Option<String>,
    /// Raw XML for the <executions>...</executions> block
    #[serde(default, alias = "executionsXml")]
    pub executions_xml: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PomArgs {
    /// Repository root where pom.xml is written
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Maven groupId
    #[serde(rename = "groupId", alias = "group_id", default = "default_group_id")]
    pub group_id: String,
    /// Maven artifactId
    #[serde(rename = "artifactId", alias = "artifact_id", default = "default_artifact_id")]
    pub artifact_id: String,
    /// Project version
    #[serde(default = "default_version")]
    pub version: String,
    /// Target Java version
    #[serde(default = "default_java_version")]
    pub java_version: String,
    #[serde(default)]
    pub dependencies: Vec<PomDependency>,
    #[serde(default)]
    pub plugins: Vec<PomPlugin>,
    /// Maven packaging
    #[serde(default = "default_packaging")]
    pub packaging: String,
}

#[derive(Serialize)]
struct DependencyView {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
    scope: Option<String>,
    optional: Option<String>,
}

#[derive(Serialize)]
struct PluginView<'a> {
    group_id: String,
    artifact_id: String,
    version: Option<String>,
    configuration_xml: Option<&'a str>,
    executions_xml: Option<&'a str>,
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(xml_escape)
}

/// Render the pom.xml text.
pub fn render_pom(args: &PomArgs) -> crate::Result<String> {
    let dependencies: Vec<DependencyView> = args
        .dependencies
        .iter()
        .map(|dep| DependencyView {
            group_id: xml_escape(&dep.group_id),
            artifact_id: xml_escape(&dep.artifact_id),
            version: non_empty(&dep.version),
            scope: non_empty(&dep.scope),
            optional: dep.optional.map(|o| o.to_string()),
        })
        .collect();

    let plugins: Vec<PluginView<'_>> = args
        .plugins
        .iter()
        .map(|plugin| PluginView {
            group_id: xml_escape(&plugin.group_id),
            artifact_id: xml_escape(&plugin.artifact_id),
            version: non_empty(&plugin.version),
            configuration_xml: plugin.configuration_xml.as_deref().filter(|x| !x.is_empty()),
            executions_xml: plugin.executions_xml.as_deref().filter(|x| !x.is_empty()),
        })
        .collect();

    let mut context = Context::new();
    context.insert("group_id", &xml_escape(&args.group_id));
    context.insert("artifact_id", &xml_escape(&args.artifact_id));
    context.insert("version", &xml_escape(&args.version));
    context.insert("packaging", &xml_escape(&args.packaging));
    context.insert("java_version", &xml_escape(&args.java_version));
    context.insert("dependencies", &dependencies);
    context.insert("plugins", &plugins);

    render_template("pom.xml", POM_TEMPLATE, &context)
}

/// Writes `<base_dir>/pom.xml`, replacing any existing file.
pub struct PomXmlTool;

impl Generator for PomXmlTool {
    type Args = PomArgs;
    const NAME: &'static str = "PomXmlTool";
    const DESCRIPTION: &'static str =
        "Generates a minimal, opinionated Maven pom.xml with optional deps/plugins.";

    fn run(&self, args: PomArgs) -> crate::Result<Report> {
        let xml = render_pom(&args)?;
        Ok(Artifact::new(args.base_dir.join("pom.xml"), xml)
            .write()?
            .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Tool, ToolAdapter};
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn parse(params: serde_json::Value) -> PomArgs {
        ToolAdapter::new(PomXmlTool).parse_args(&params).unwrap()
    }

    #[test]
    fn test_baseline_only() -> crate::Result<()> {
        let xml = render_pom(&parse(json!({})))?;

        assert!(xml.contains("<groupId>com.example</groupId>"));
        assert!(xml.contains("<artifactId>qa-testkit</artifactId>"));
        assert!(xml.contains("<maven.compiler.source>17</maven.compiler.source>"));
        assert!(xml.contains("<packaging>jar</packaging>"));
        for artifact in ["junit-jupiter", "assertj-core", "mockito-core"] {
            assert!(xml.contains(&format!("<artifactId>{artifact}</artifactId>")));
        }
        assert!(xml.contains("<artifactId>maven-surefire-plugin</artifactId>"));
        assert!(xml.contains("<artifactId>jacoco-maven-plugin</artifactId>"));
        assert_eq!(xml.matches("<dependency>").count(), 3);
        assert_eq!(xml.matches("<plugin>").count(), 2);
        assert!(xml.contains("<version>${junit.jupiter.version}</version>"));
        assert!(xml.ends_with("</project>\n"));
        Ok(())
    }

    #[test]
    fn test_caller_entries_precede_baseline_once_each() -> crate::Result<()> {
        let xml = render_pom(&parse(json!({
            "groupId": "org.acme",
            "dependencies": [
                {"groupId": "com.h2database", "artifactId": "h2", "version": "2.2.224", "scope": "test"},
                {"groupId": "org.projectlombok", "artifactId": "lombok", "optional": false}
            ],
            "plugins": [
                {"groupId": "org.apache.maven.plugins", "artifactId": "maven-jar-plugin", "version": "3.3.0"},
                {"groupId": "org.codehaus.mojo", "artifactId": "exec-maven-plugin",
                 "configuration_xml": "<configuration><mainClass>x.Main</mainClass></configuration>"}
            ]
        })))?;

        assert_eq!(xml.matches("<dependency>").count(), 5);
        assert_eq!(xml.matches("</dependency>").count(), 5);
        assert_eq!(xml.matches("<plugin>").count(), 4);
        assert_eq!(xml.matches("maven-jar-plugin").count(), 1);
        assert_eq!(xml.matches("exec-maven-plugin").count(), 1);
        assert!(xml.contains("      <version>2.2.224</version>\n      <scope>test</scope>\n"));
        assert!(xml.contains("<optional>false</optional>"));
        assert!(xml.contains("        <configuration><mainClass>x.Main</mainClass></configuration>\n"));

        let h2 = xml.find("<artifactId>h2</artifactId>").unwrap();
        let junit = xml.find("<artifactId>junit-jupiter</artifactId>").unwrap();
        assert!(h2 < junit);
        let exec = xml.find("exec-maven-plugin").unwrap();
        let surefire = xml.find("maven-surefire-plugin").unwrap();
        assert!(exec < surefire);
        Ok(())
    }

    #[test]
    fn test_dependency_layout() -> crate::Result<()> {
        let xml = render_pom(&parse(json!({
            "dependencies": [{"groupId": "g", "artifactId": "a"}]
        })))?;
        assert!(xml.contains(
            "  <dependencies>\n    <dependency>\n      <groupId>g</groupId>\n      <artifactId>a</artifactId>\n    </dependency>\n    <!-- Baseline testing stack -->"
        ));
        Ok(())
    }

    #[test]
    fn test_writes_pom() -> crate::Result<()> {
        let dir = tempdir()?;
        let report = ToolAdapter::new(PomXmlTool).invoke(&json!({"base_dir": dir.path()}))?;
        assert!(report.starts_with("[WROTE]"));
        let xml = fs::read_to_string(dir.path().join("pom.xml"))?;
        assert!(xml.starts_with("<?xml"));
        Ok(())
    }
}

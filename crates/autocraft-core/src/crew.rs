//! Agent and task definitions read from `agents.yaml` and `tasks.yaml`.
//!
//! The definitions are consumed by an external agent engine; this module only
//! loads them, resolves `${ENV}` model references and code-execution
//! settings, checks that every task names a declared agent and resolves each
//! agent's tool list against a [`ToolRegistry`].

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;

use crate::tools::{Materialized, ToolRegistry};

static ENV_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{(.*)\}$").expect("env reference pattern is valid"));

/// Agent keys that control code execution in the agent engine, in display order
pub const CODE_EXEC_FLAGS: [&str; 4] = [
    "allow_code_execution",
    "code_execution_mode",
    "max_execution_time",
    "max_retry_limit",
];

const DEFAULT_EXECUTION_TIME: i64 = 30;
const DEFAULT_RETRY_LIMIT: i64 = 3;

/// One agent entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub backstory: Option<String>,
    /// Model name, or `${VAR}` to read it from the environment
    #[serde(default)]
    pub llm: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    /// Engine flags such as `verbose` or `allow_delegation`, kept as written
    #[serde(flatten)]
    pub flags: IndexMap<String, YamlValue>,
}

impl AgentSpec {
    /// The model after `${VAR}` expansion
    pub fn resolved_llm(&self) -> Option<String> {
        self.llm.as_deref().and_then(resolve_llm)
    }

    /// Flags the agent runs with.
    ///
    /// Keys set in YAML win, then `defaults` fill the code-execution keys
    /// still unset. An agent named `coder` finally gets sandboxed execution
    /// (`safe` mode, 30 seconds, 3 retries) for whatever remains unset.
    pub fn effective_flags(
        &self,
        name: &str,
        defaults: &CodeExecDefaults,
    ) -> IndexMap<String, YamlValue> {
        let mut flags = self.flags.clone();
        for (key, value) in defaults.entries() {
            flags.entry(key.to_string()).or_insert(value);
        }
        if name.eq_ignore_ascii_case("coder") {
            let fallback = [
                ("allow_code_execution", YamlValue::Bool(true)),
                ("code_execution_mode", YamlValue::from("safe")),
                ("max_execution_time", YamlValue::from(DEFAULT_EXECUTION_TIME)),
                ("max_retry_limit", YamlValue::from(DEFAULT_RETRY_LIMIT)),
            ];
            for (key, value) in fallback {
                flags.entry(key.to_string()).or_insert(value);
            }
        }
        flags
    }
}

/// Crew-wide code-execution defaults from the `CREW_CODE_*` variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeExecDefaults {
    pub allow_code_execution: Option<bool>,
    pub code_execution_mode: Option<String>,
    pub max_execution_time: Option<i64>,
    pub max_retry_limit: Option<i64>,
}

impl CodeExecDefaults {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup; empty values count as unset.
    ///
    /// `CREW_CODE_EXEC` enables execution when it is `1`, `true`, `yes` or
    /// `on`. A timeout or retry count that is not an integer becomes 30 or 3.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            allow_code_execution: var("CREW_CODE_EXEC")
                .filter(|v| is_truthy(v))
                .map(|_| true),
            code_execution_mode: var("CREW_CODE_MODE"),
            max_execution_time: var("CREW_CODE_TIMEOUT")
                .map(|v| int_or("CREW_CODE_TIMEOUT", &v, DEFAULT_EXECUTION_TIME)),
            max_retry_limit: var("CREW_CODE_RETRIES")
                .map(|v| int_or("CREW_CODE_RETRIES", &v, DEFAULT_RETRY_LIMIT)),
        }
    }

    fn entries(&self) -> Vec<(&'static str, YamlValue)> {
        let mut entries = Vec::new();
        if let Some(allow) = self.allow_code_execution {
            entries.push(("allow_code_execution", YamlValue::Bool(allow)));
        }
        if let Some(mode) = &self.code_execution_mode {
            entries.push(("code_execution_mode", YamlValue::from(mode.as_str())));
        }
        if let Some(seconds) = self.max_execution_time {
            entries.push(("max_execution_time", YamlValue::from(seconds)));
        }
        if let Some(retries) = self.max_retry_limit {
            entries.push(("max_retry_limit", YamlValue::from(retries)));
        }
        entries
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn int_or(key: &str, value: &str, default: i64) -> i64 {
    value.trim().parse().unwrap_or_else(|_| {
        log::warn!("{}='{}' is not an integer; using {}", key, value, default);
        default
    })
}

/// One task entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub output_file: Option<String>,
    /// Names of tasks whose description and expected output prime this one
    #[serde(default)]
    pub context: Vec<String>,
    #[serde(flatten)]
    pub flags: IndexMap<String, YamlValue>,
}

/// A task whose `agent` is missing or undeclared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAgentRef {
    pub task: String,
    pub agent: Option<String>,
}

/// Expand `${VAR}` to the variable's value; anything else is returned as is.
///
/// An unset variable resolves to `None`.
pub fn resolve_llm(raw: &str) -> Option<String> {
    match ENV_REFERENCE.captures(raw) {
        Some(caps) => std::env::var(&caps[1]).ok(),
        None => Some(raw.to_string()),
    }
}

/// The full crew: agents and tasks in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrewDefinition {
    pub agents: IndexMap<String, AgentSpec>,
    pub tasks: IndexMap<String, TaskSpec>,
}

impl CrewDefinition {
    /// Load `agents.yaml` and `tasks.yaml` from `config_dir`.
    pub fn load(config_dir: &Path) -> crate::Result<Self> {
        Self::from_files(&config_dir.join("agents.yaml"), &config_dir.join("tasks.yaml"))
    }

    pub fn from_files(agents: &Path, tasks: &Path) -> crate::Result<Self> {
        Ok(Self {
            agents: load_entries(agents, "agent")?,
            tasks: load_entries(tasks, "task")?,
        })
    }

    /// Tasks whose agent is absent or not declared, in task order.
    pub fn unknown_agent_refs(&self) -> Vec<UnknownAgentRef> {
        self.tasks
            .iter()
            .filter(|(_, task)| {
                !matches!(task.agent.as_deref(), Some(agent) if self.agents.contains_key(agent))
            })
            .map(|(name, task)| UnknownAgentRef {
                task: name.clone(),
                agent: task.agent.clone(),
            })
            .collect()
    }

    /// Fail when any task references an unknown agent.
    pub fn validate(&self) -> crate::Result<()> {
        let bad = self.unknown_agent_refs();
        if bad.is_empty() {
            return Ok(());
        }
        let lines: Vec<String> = bad
            .iter()
            .map(|r| {
                format!(
                    "  - task={} references missing agent {}",
                    r.task,
                    r.agent.as_deref().map_or("<none>".to_string(), |a| format!("'{a}'"))
                )
            })
            .collect();
        Err(crate::Error::validation(format!(
            "Task validation failed; unknown agents:\n{}\nAvailable: [{}]",
            lines.join("\n"),
            self.agents.keys().cloned().collect::<Vec<_>>().join(", ")
        )))
    }

    /// Resolve every agent's declared tools against `registry`.
    pub fn materialize_tools(&self, registry: &ToolRegistry) -> IndexMap<String, Materialized> {
        self.agents
            .iter()
            .map(|(name, agent)| (name.clone(), registry.materialize(&agent.tools)))
            .collect()
    }

    /// Description and expected output of the tasks listed in `task`'s
    /// context, or `None` when there is nothing to add.
    pub fn task_context(&self, task: &str) -> Option<String> {
        let spec = self.tasks.get(task)?;
        let mut chunks = Vec::new();
        for key in &spec.context {
            let Some(ctx) = self.tasks.get(key) else {
                log::warn!("Task '{}' lists unknown context task '{}'", task, key);
                continue;
            };
            if let Some(desc) = ctx.description.as_deref().filter(|d| !d.trim().is_empty()) {
                chunks.push(format!("[{key}] description:\n{}", desc.trim()));
            }
            if let Some(exp) = ctx
                .expected_output
                .as_deref()
                .filter(|e| !e.trim().is_empty())
            {
                chunks.push(format!("[{key}] expected_output:\n{}", exp.trim()));
            }
        }
        if chunks.is_empty() {
            None
        } else {
            Some(format!("Context for {task}:\n\n{}", chunks.join("\n\n")))
        }
    }
}

fn load_entries<T>(path: &Path, kind: &str) -> crate::Result<IndexMap<String, T>>
where
    T: serde::de::DeserializeOwned,
{
    if !path.is_file() {
        return Err(crate::Error::config(format!(
            "Missing YAML file: {}",
            path.display()
        )));
    }
    let content = std::fs::read_to_string(path)?;
    let raw: YamlValue = serde_yaml::from_str(&content)?;
    let entries: IndexMap<String, YamlValue> = match raw {
        YamlValue::Null => IndexMap::new(),
        YamlValue::Mapping(_) => serde_yaml::from_value(raw)?,
        _ => {
            return Err(crate::Error::config(format!(
                "{} must be a YAML mapping (name -> config)",
                path.display()
            )))
        }
    };

    let mut parsed = IndexMap::new();
    for (name, value) in entries {
        match value {
            YamlValue::Mapping(_) => {
                parsed.insert(name, serde_yaml::from_value(value)?);
            }
            YamlValue::Null => {
                parsed.insert(name, serde_yaml::from_value(YamlValue::Mapping(Default::default()))?);
            }
            _ => log::warn!("Skipping {} '{}' with invalid spec (expected mapping)", kind, name),
        }
    }
    log::debug!("Loaded {} {} entries from {}", parsed.len(), kind, path.display());
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateStore;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    const AGENTS: &str = r#"
architect:
  role: QA Architect
  goal: Plan the kit
  llm: ${AUTOCRAFT_TEST_LLM}
  tools: [RepoScaffolderTool, PomXmlTool, SeleniumTool, ""]
  verbose: true
coder:
  role: Coder
  llm: gpt-4o-mini
  tools:
    - JavaCodegenTool
broken: "not a mapping"
"#;

    const TASKS: &str = r#"
plan:
  description: "  Plan the layout  "
  expected_output: A plan
  agent: architect
build:
  description: Build it
  agent: coder
  output_file: out/build.md
  context: [plan, ghost]
orphan:
  description: Nobody owns this
  agent: tester
"#;

    fn crew_dir() -> std::io::Result<tempfile::TempDir> {
        let dir = tempdir()?;
        fs::write(dir.path().join("agents.yaml"), AGENTS)?;
        fs::write(dir.path().join("tasks.yaml"), TASKS)?;
        Ok(dir)
    }

    #[test]
    fn test_load_preserves_order_and_skips_invalid() -> crate::Result<()> {
        let dir = crew_dir()?;
        let crew = CrewDefinition::load(dir.path())?;

        let agents: Vec<&str> = crew.agents.keys().map(String::as_str).collect();
        assert_eq!(agents, ["architect", "coder"]);
        let tasks: Vec<&str> = crew.tasks.keys().map(String::as_str).collect();
        assert_eq!(tasks, ["plan", "build", "orphan"]);

        let architect = &crew.agents["architect"];
        assert_eq!(architect.flags.get("verbose"), Some(&YamlValue::Bool(true)));
        assert_eq!(crew.tasks["build"].output_file.as_deref(), Some("out/build.md"));
        Ok(())
    }

    #[test]
    fn test_resolve_llm() {
        std::env::set_var("AUTOCRAFT_TEST_RESOLVE", "claude-x");
        assert_eq!(resolve_llm("${AUTOCRAFT_TEST_RESOLVE}").as_deref(), Some("claude-x"));
        assert_eq!(resolve_llm("${AUTOCRAFT_TEST_UNSET_VAR}"), None);
        assert_eq!(resolve_llm("gpt-4o").as_deref(), Some("gpt-4o"));
        assert_eq!(resolve_llm("prefix-${X}").as_deref(), Some("prefix-${X}"));

        std::env::set_var("AUTOCRAFT-TEST-DASHED", "dashed-model");
        assert_eq!(resolve_llm("${AUTOCRAFT-TEST-DASHED}").as_deref(), Some("dashed-model"));
    }

    fn lookup(vars: &[(&str, &str)]) -> CodeExecDefaults {
        let vars: std::collections::HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CodeExecDefaults::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_code_exec_defaults_from_variables() {
        assert_eq!(lookup(&[]), CodeExecDefaults::default());

        let defaults = lookup(&[
            ("CREW_CODE_EXEC", "Yes"),
            ("CREW_CODE_MODE", "local"),
            ("CREW_CODE_TIMEOUT", " 45 "),
            ("CREW_CODE_RETRIES", "5"),
        ]);
        assert_eq!(defaults.allow_code_execution, Some(true));
        assert_eq!(defaults.code_execution_mode.as_deref(), Some("local"));
        assert_eq!(defaults.max_execution_time, Some(45));
        assert_eq!(defaults.max_retry_limit, Some(5));

        let bad = lookup(&[
            ("CREW_CODE_EXEC", "0"),
            ("CREW_CODE_MODE", ""),
            ("CREW_CODE_TIMEOUT", "soon"),
            ("CREW_CODE_RETRIES", "2.5"),
        ]);
        assert_eq!(bad.allow_code_execution, None);
        assert_eq!(bad.code_execution_mode, None);
        assert_eq!(bad.max_execution_time, Some(30));
        assert_eq!(bad.max_retry_limit, Some(3));
    }

    #[test]
    fn test_effective_flags_precedence() -> crate::Result<()> {
        let coder: AgentSpec = serde_yaml::from_str(
            "role: Coder\ncode_execution_mode: local\nverbose: true\n",
        )?;
        let plain = AgentSpec::default();

        let none = CodeExecDefaults::default();
        let flags = coder.effective_flags("coder", &none);
        assert_eq!(flags["code_execution_mode"], YamlValue::from("local"));
        assert_eq!(flags["allow_code_execution"], YamlValue::Bool(true));
        assert_eq!(flags["max_execution_time"], YamlValue::from(30));
        assert_eq!(flags["max_retry_limit"], YamlValue::from(3));
        assert_eq!(flags["verbose"], YamlValue::Bool(true));
        assert!(plain.effective_flags("writer", &none).is_empty());

        let env = lookup(&[("CREW_CODE_MODE", "docker"), ("CREW_CODE_RETRIES", "7")]);
        let flags = coder.effective_flags("Coder", &env);
        assert_eq!(flags["code_execution_mode"], YamlValue::from("local"));
        assert_eq!(flags["max_retry_limit"], YamlValue::from(7));
        assert_eq!(flags["max_execution_time"], YamlValue::from(30));

        let flags = plain.effective_flags("writer", &env);
        assert_eq!(flags["code_execution_mode"], YamlValue::from("docker"));
        assert_eq!(flags["max_retry_limit"], YamlValue::from(7));
        assert!(!flags.contains_key("allow_code_execution"));
        Ok(())
    }

    #[test]
    fn test_validate_reports_unknown_agents() -> crate::Result<()> {
        let dir = crew_dir()?;
        let crew = CrewDefinition::load(dir.path())?;

        let bad = crew.unknown_agent_refs();
        assert_eq!(
            bad,
            vec![UnknownAgentRef {
                task: "orphan".to_string(),
                agent: Some("tester".to_string()),
            }]
        );
        let err = crew.validate().unwrap_err().to_string();
        assert!(err.contains("task=orphan references missing agent 'tester'"), "{err}");

        let mut fixed = crew.clone();
        fixed.tasks.shift_remove("orphan");
        fixed.validate()?;
        Ok(())
    }

    #[test]
    fn test_materialize_tools_skips_unknown() -> crate::Result<()> {
        let dir = crew_dir()?;
        let crew = CrewDefinition::load(dir.path())?;
        let registry = ToolRegistry::with_builtin_tools(Arc::new(TemplateStore::empty()))?;

        let tools = crew.materialize_tools(&registry);
        let architect = &tools["architect"];
        assert_eq!(architect.names(), ["RepoScaffolderTool", "PomXmlTool"]);
        assert_eq!(architect.skipped.len(), 1);
        assert_eq!(architect.skipped[0].name, "SeleniumTool");
        assert!(tools["coder"].skipped.is_empty());
        Ok(())
    }

    #[test]
    fn test_task_context() -> crate::Result<()> {
        let dir = crew_dir()?;
        let crew = CrewDefinition::load(dir.path())?;

        assert_eq!(
            crew.task_context("build").as_deref(),
            Some("Context for build:\n\n[plan] description:\nPlan the layout\n\n[plan] expected_output:\nA plan")
        );
        assert_eq!(crew.task_context("plan"), None);
        assert_eq!(crew.task_context("missing"), None);
        Ok(())
    }

    #[test]
    fn test_non_mapping_file_rejected() -> crate::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("agents.yaml"), "- a\n- b\n")?;
        fs::write(dir.path().join("tasks.yaml"), "")?;
        let err = CrewDefinition::load(dir.path()).unwrap_err();
        assert!(err.is_configuration(), "{err}");

        let missing = CrewDefinition::load(&dir.path().join("nowhere")).unwrap_err();
        assert!(missing.to_string().contains("Missing YAML file"));
        Ok(())
    }
}

//! autocraft CLI entrypoint
//! Parses command-line arguments and dispatches to the core generators and
//! the crew configuration.

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// External imports (alphabetized)
use anyhow::Context;
use autocraft_core::crew::{CodeExecDefaults, CODE_EXEC_FLAGS};
use autocraft_core::{Config, CrewDefinition, TemplateStore, ToolRegistry, ToolSpec};
use clap::Parser;
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autocraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (YAML, TOML or JSON); autocraft.{yaml,yml,toml,json}
    /// in the working directory is used when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the registered generator tools
    Tools {
        /// Print each tool's JSON Schema instead of a summary
        #[arg(long)]
        schema: bool,
    },
    /// Run one generator tool and print its report
    Invoke {
        /// Tool name, e.g. JavaCodegenTool
        tool: String,
        /// Parameters as a JSON object
        #[arg(long, conflicts_with = "params_file")]
        params: Option<String>,
        /// File holding the parameters (JSON, or YAML for .yaml/.yml)
        #[arg(long)]
        params_file: Option<PathBuf>,
        /// Used as `base_dir` when the parameters do not set one
        #[arg(long)]
        base_dir: Option<PathBuf>,
    },
    /// List agents and tasks from the crew YAML files
    List,
    /// Validate task-to-agent references and tool names
    Validate,
    /// Print effective paths and model resolution
    PrintConfig,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; library `log` records are forwarded as well
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), Path::new("."))
        .context("Failed to load configuration")?;
    debug!("Effective configuration: {:?}", config);

    match &cli.command {
        Commands::Tools { schema } => {
            let registry = build_registry(&config)?;
            if *schema {
                println!("{}", serde_json::to_string_pretty(&registry.specs())?);
            } else {
                for spec in registry.specs() {
                    println!("{}: {}", spec.name, spec.description);
                }
            }
        }
        Commands::Invoke {
            tool,
            params,
            params_file,
            base_dir,
        } => {
            let registry = build_registry(&config)?;
            let spec = ToolSpec::of(registry.resolve(tool)?.as_ref());
            let mut params = read_params(params.as_deref(), params_file.as_deref())?;

            if spec.accepts("base_dir") && !params.contains_key("base_dir") {
                let dir = base_dir.clone().unwrap_or_else(|| config.output_dir.clone());
                debug!("Injecting base_dir {}", dir.display());
                params.insert(
                    "base_dir".to_string(),
                    JsonValue::String(dir.to_string_lossy().into_owned()),
                );
            }

            info!("Invoking tool: {}", tool);
            let report = registry
                .invoke(tool, &JsonValue::Object(params))
                .with_context(|| format!("Tool '{tool}' failed"))?;
            println!("{report}");
        }
        Commands::List => {
            let crew = load_crew(&config)?;

            println!("== Agents ==");
            for (name, agent) in &crew.agents {
                println!(
                    "- {}: role={}, llm={}, tools=[{}]",
                    name,
                    quoted(agent.role.as_deref()),
                    quoted(agent.llm.as_deref()),
                    agent.tools.join(", ")
                );
            }

            println!("\n== Tasks ==");
            for (name, task) in &crew.tasks {
                println!(
                    "- {}: agent={}, output_file={}, context=[{}]",
                    name,
                    quoted(task.agent.as_deref()),
                    quoted(task.output_file.as_deref()),
                    task.context.join(", ")
                );
            }
        }
        Commands::Validate => {
            let crew = load_crew(&config)?;
            let registry = build_registry(&config)?;

            for (agent, materialized) in crew.materialize_tools(&registry) {
                for skipped in &materialized.skipped {
                    warn!(
                        "Agent '{}' declares unknown tool '{}'; it will be skipped",
                        agent, skipped.name
                    );
                    println!("  - agent={agent} skips unknown tool '{}'", skipped.name);
                }
            }

            crew.validate()?;
            println!(
                "Validation OK ({} agents, {} tasks)",
                crew.agents.len(),
                crew.tasks.len()
            );
        }
        Commands::PrintConfig => {
            let crew = load_crew(&config)?;
            let store = load_store(&config);

            println!("Paths:");
            println!("  config_dir:   {}", config.config_dir.display());
            println!("  agents.yaml:  {}", config.agents_path().display());
            println!("  tasks.yaml:   {}", config.tasks_path().display());
            println!("  output_dir:   {}", config.output_dir.display());
            println!(
                "  templates:    {}",
                store
                    .source()
                    .map_or("<none>".to_string(), |p| p.display().to_string())
            );
            let missing = store.missing();
            if !missing.is_empty() {
                let names: Vec<String> = missing.iter().map(|id| id.to_string()).collect();
                println!("  missing templates: {}", names.join(", "));
            }

            println!("\nLLM Resolution:");
            for (name, agent) in &crew.agents {
                println!(
                    "  - {}: raw={}, resolved={}",
                    name,
                    quoted(agent.llm.as_deref()),
                    quoted(agent.resolved_llm().as_deref())
                );
            }

            println!("\nCode Execution:");
            let defaults = CodeExecDefaults::from_env();
            for (name, agent) in &crew.agents {
                let flags = agent.effective_flags(name, &defaults);
                let settings: Vec<String> = CODE_EXEC_FLAGS
                    .iter()
                    .filter_map(|key| flags.get(*key).map(|v| format!("{key}={}", flag_text(v))))
                    .collect();
                if settings.is_empty() {
                    println!("  - {name}: none");
                } else {
                    println!("  - {name}: {}", settings.join(", "));
                }
            }
        }
    }

    Ok(())
}

/// Templates from the configured directory, else the process-wide store.
fn load_store(config: &Config) -> Arc<TemplateStore> {
    if config.template_dir.is_none() {
        return Arc::new(TemplateStore::global().clone());
    }
    match config.templates() {
        Ok(dir) => Arc::new(TemplateStore::load(dir.path())),
        Err(e) => {
            warn!("{}; generator bodies will be empty", e);
            Arc::new(TemplateStore::empty())
        }
    }
}

fn build_registry(config: &Config) -> anyhow::Result<ToolRegistry> {
    ToolRegistry::with_builtin_tools(load_store(config)).context("Failed to build tool registry")
}

fn load_crew(config: &Config) -> anyhow::Result<CrewDefinition> {
    CrewDefinition::load(&config.config_dir).with_context(|| {
        format!(
            "Failed to load crew files from {}",
            config.config_dir.display()
        )
    })
}

/// Parameters from `--params` or `--params-file`; `{}` when neither is given.
fn read_params(
    inline: Option<&str>,
    file: Option<&Path>,
) -> anyhow::Result<JsonMap<String, JsonValue>> {
    let value: JsonValue = match (inline, file) {
        (Some(text), _) => serde_json::from_str(text).context("--params is not valid JSON")?,
        (None, Some(path)) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                    .with_context(|| format!("{} is not valid YAML", path.display()))?,
                _ => serde_json::from_str(&text)
                    .with_context(|| format!("{} is not valid JSON", path.display()))?,
            }
        }
        (None, None) => JsonValue::Object(JsonMap::new()),
    };

    match value {
        JsonValue::Object(map) => Ok(map),
        JsonValue::Null => Ok(JsonMap::new()),
        other => anyhow::bail!("Tool parameters must be a JSON object, got: {other}"),
    }
}

fn flag_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => format!("'{s}'"),
        serde_yaml::Value::Null => "None".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

fn quoted(value: Option<&str>) -> String {
    value.map_or_else(|| "None".to_string(), |v| format!("'{v}'"))
}

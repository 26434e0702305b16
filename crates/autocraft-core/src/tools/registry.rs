//! Tool registry mapping stable names to tool instances.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use super::{Tool, ToolAdapter, ToolSpec};
use crate::emitters::{
    database::{H2RunnerTool, JdbcExecutorTool, MongoEmbedTool, TestcontainersTool},
    ems::EmsMessagingScaffoldTool,
    faker::FakerTool,
    file_writer::FileWriterTool,
    java_class::JavaCodegenTool,
    kafka::{KafkaMessagingScaffoldTool, KafkaMockTool},
    openapi::OpenApiSchemaTool,
    pom::PomXmlTool,
    readme::ReadmeWriterTool,
    scaffold::RepoScaffolderTool,
};
use crate::templates::TemplateStore;

/// A declared tool name that could not be materialized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTool {
    pub name: String,
    pub reason: String,
}

/// Result of resolving a list of declared tool names
#[derive(Default)]
pub struct Materialized {
    pub tools: Vec<Arc<dyn Tool>>,
    pub skipped: Vec<SkippedTool>,
}

impl Materialized {
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}

/// Registry of generator tools.
///
/// Names are unique and kept in registration order. The registry is built
/// once and then only read.
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Registry holding every built-in generator, reading bodies from `store`.
    pub fn with_builtin_tools(store: Arc<TemplateStore>) -> crate::Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(ToolAdapter::new(FileWriterTool)))?;
        registry.register(Arc::new(ToolAdapter::new(RepoScaffolderTool)))?;
        registry.register(Arc::new(ToolAdapter::new(PomXmlTool)))?;
        registry.register(Arc::new(ToolAdapter::new(JavaCodegenTool)))?;
        registry.register(Arc::new(ToolAdapter::new(ReadmeWriterTool)))?;
        registry.register(Arc::new(ToolAdapter::new(H2RunnerTool::new(store.clone()))))?;
        registry.register(Arc::new(ToolAdapter::new(JdbcExecutorTool::new(store.clone()))))?;
        registry.register(Arc::new(ToolAdapter::new(MongoEmbedTool::new(store.clone()))))?;
        registry.register(Arc::new(ToolAdapter::new(TestcontainersTool::new(store.clone()))))?;
        registry.register(Arc::new(ToolAdapter::new(KafkaMockTool::new(store.clone()))))?;
        registry.register(Arc::new(ToolAdapter::new(OpenApiSchemaTool)))?;
        registry.register(Arc::new(ToolAdapter::new(FakerTool::new(store.clone()))))?;
        registry.register(Arc::new(ToolAdapter::new(KafkaMessagingScaffoldTool)))?;
        registry.register(Arc::new(ToolAdapter::new(EmsMessagingScaffoldTool::new(store))))?;
        Ok(registry)
    }

    /// Register a tool under its `name()`; a second tool with the same name
    /// is rejected.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> crate::Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(crate::Error::DuplicateTool(name));
        }
        log::debug!("Registering tool: {}", name);
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look up a tool, failing with the list of known names.
    pub fn resolve(&self, name: &str) -> crate::Result<Arc<dyn Tool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| crate::Error::UnknownTool {
                name: name.to_string(),
                known: self.names().into_iter().map(String::from).collect(),
            })
    }

    /// Check if a tool is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Name, description and schema of every tool.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| ToolSpec::of(t.as_ref())).collect()
    }

    /// Resolve `name` and run it with `params`.
    pub fn invoke(&self, name: &str, params: &JsonValue) -> crate::Result<String> {
        self.resolve(name)?.invoke(params)
    }

    /// Resolve every declared name, skipping the ones that fail.
    ///
    /// Blank names are ignored silently; unknown names are logged and listed
    /// in [`Materialized::skipped`].
    pub fn materialize<I, S>(&self, names: I) -> Materialized
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = Materialized::default();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match self.resolve(name) {
                Ok(tool) => result.tools.push(tool),
                Err(e) => {
                    log::warn!("Tool '{}' not found in registry; skipping", name);
                    result.skipped.push(SkippedTool {
                        name: name.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        result
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILTIN: [&str; 14] = [
        "FileWriterTool",
        "RepoScaffolderTool",
        "PomXmlTool",
        "JavaCodegenTool",
        "ReadmeWriterTool",
        "H2RunnerTool",
        "JDBCExecutorTool",
        "MongoEmbedTool",
        "TestcontainersTool",
        "KafkaMockTool",
        "OpenAPISchemaTool",
        "FakerTool",
        "KafkaMessagingScaffoldTool",
        "EmsMessagingScaffoldTool",
    ];

    fn builtin() -> ToolRegistry {
        ToolRegistry::with_builtin_tools(Arc::new(TemplateStore::empty())).unwrap()
    }

    #[test]
    fn test_builtin_names_in_order() {
        let registry = builtin();
        assert_eq!(registry.names(), BUILTIN.to_vec());
        assert_eq!(registry.len(), 14);
    }

    #[test]
    fn test_resolve_unknown_lists_known_names() {
        let registry = builtin();
        let err = registry.resolve("NopeTool").err().unwrap();
        match &err {
            crate::Error::UnknownTool { name, known } => {
                assert_eq!(name, "NopeTool");
                assert_eq!(known, &BUILTIN.map(String::from).to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("Known tools: [FileWriterTool, RepoScaffolderTool"));
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(ToolAdapter::new(FileWriterTool)))
            .unwrap();
        let err = registry
            .register(Arc::new(ToolAdapter::new(FileWriterTool)))
            .unwrap_err();
        assert!(matches!(err, crate::Error::DuplicateTool(name) if name == "FileWriterTool"));
    }

    #[test]
    fn test_materialize_skips_unknown() {
        let registry = builtin();
        let result = registry.materialize(["PomXmlTool", "", "GhostTool", "FakerTool"]);
        assert_eq!(result.names(), vec!["PomXmlTool", "FakerTool"]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].name, "GhostTool");
        assert!(result.skipped[0].reason.contains("Unknown tool 'GhostTool'"));
    }

    #[test]
    fn test_specs_cover_every_tool() {
        let registry = builtin();
        let specs = registry.specs();
        assert_eq!(specs.len(), registry.len());
        for spec in &specs {
            assert!(!spec.description.is_empty(), "{}", spec.name);
            assert!(spec.parameters.is_object(), "{}", spec.name);
        }
        let java = specs.iter().find(|s| s.name == "JavaCodegenTool").unwrap();
        assert!(java.accepts("src_type"));
        assert!(java.accepts("base_dir"));
    }
}

//! In-memory store of the template files, loaded once

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use super::{TemplateDir, TemplateId};
use crate::utils::read_template;

static GLOBAL_STORE: Lazy<TemplateStore> = Lazy::new(|| match TemplateDir::discover(None) {
    Ok(dir) => TemplateStore::load(dir.path()),
    Err(e) => {
        log::warn!("{}; generator bodies will be empty", e);
        TemplateStore::empty()
    }
});

/// Template name to text, read-only after loading.
///
/// Templates missing on disk are stored as empty strings, so every lookup
/// succeeds and callers render empty bodies instead of failing.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    source: Option<PathBuf>,
    texts: HashMap<TemplateId, String>,
}

impl TemplateStore {
    /// Read every known template from `dir`
    pub fn load(dir: &Path) -> Self {
        log::info!("Loading templates from: {}", dir.display());
        let texts = TemplateId::all()
            .map(|id| (id, read_template(dir, id.file_name())))
            .collect();
        Self {
            source: Some(dir.to_path_buf()),
            texts,
        }
    }

    /// A store in which every template is empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// The process-wide store, discovered and loaded on first use.
    ///
    /// There is no reload: template edits need a new process.
    pub fn global() -> &'static TemplateStore {
        &GLOBAL_STORE
    }

    /// Replace one template's text
    pub fn with_template(mut self, id: TemplateId, text: impl Into<String>) -> Self {
        self.texts.insert(id, text.into());
        self
    }

    /// Text of a template, or `""` when it was not found
    pub fn get(&self, id: TemplateId) -> &str {
        self.texts.get(&id).map(String::as_str).unwrap_or("")
    }

    /// Directory the store was loaded from
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Identifiers whose text is empty
    pub fn missing(&self) -> Vec<TemplateId> {
        TemplateId::all().filter(|id| self.get(*id).is_empty()).collect()
    }
}

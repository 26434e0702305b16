//! Generators for the artifacts of a Java QA test kit.
//!
//! Each submodule pairs an argument struct (the tool's parameter schema) with
//! a [`Generator`](crate::tools::Generator) implementation. Generators that
//! produce Java go through [`JavaUnit`](crate::java::JavaUnit).

pub mod database;
pub mod ems;
pub mod faker;
pub mod file_writer;
pub mod java_class;
pub mod kafka;
pub mod openapi;
pub mod pom;
pub mod readme;
pub mod scaffold;

use std::path::PathBuf;

use tera::Context;

use crate::templates::{render_template, TemplateId, TemplateStore};

pub(crate) fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Render a stored template body; a missing template yields an empty body.
pub(crate) fn render_body(
    store: &TemplateStore,
    id: TemplateId,
    context: &Context,
) -> crate::Result<String> {
    render_template(id.file_name(), store.get(id), context)
}

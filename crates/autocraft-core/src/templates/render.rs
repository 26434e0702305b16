//! Placeholder substitution through Tera

use tera::{Context, Tera};

/// Render `source` with `context`.
///
/// `name` only identifies the template in error messages. Output is never
/// HTML-escaped; an empty source renders to an empty string.
pub fn render_template(name: &str, source: &str, context: &Context) -> crate::Result<String> {
    if source.is_empty() {
        return Ok(String::new());
    }

    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    tera.add_raw_template(name, source)?;
    log::debug!("Rendering template: {}", name);
    Ok(tera.render(name, context)?)
}

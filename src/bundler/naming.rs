//! Archive file names from templates.
//!
//! Templates are rendered against the `[bundle.data]` bindings plus two derived
//! keys: `_id`, the zero-padded assignment number, and `format`, the file
//! extension of the backend unless the bindings already set one.

use super::Backend;
use crate::config::Bindings;
use crate::error::{Error, Result};
use crate::template::Renderer;
use serde_json::Value;

/// Key of the assignment number in the template data.
pub const ID_KEY: &str = "_id";

/// Key of the archive extension in the template data.
pub const FORMAT_KEY: &str = "format";

/// Returns a copy of `data` with `_id` set to `id` and `format` derived from
/// `backend` unless present.
pub fn bindings(data: &Bindings, id: &str, backend: Backend) -> Bindings {
    let mut merged = with_format(data, backend);
    merged.insert(ID_KEY.to_string(), Value::String(id.to_string()));
    merged
}

/// Renders the archive name for `backend`.
///
/// `format` is derived from the backend when `data` does not set it. The
/// result must be a plain file name; empty names and names containing path
/// separators are rejected.
pub fn render(template: &str, data: &Bindings, backend: Backend) -> Result<String> {
    let data = with_format(data, backend);
    let name = Renderer::lenient().render(template, &data)?;
    let name = name.trim();

    let is_path = name.contains(|c: char| c == '/' || c == '\\');
    if name.is_empty() || name == "." || name == ".." || is_path {
        return Err(Error::Template {
            reason: format!("template {template:?} rendered {name:?}, which is not a file name"),
        });
    }
    Ok(name.to_string())
}

fn with_format(data: &Bindings, backend: Backend) -> Bindings {
    let mut merged = data.clone();
    merged
        .entry(FORMAT_KEY.to_string())
        .or_insert_with(|| Value::String(backend.extension().to_string()));
    merged
}

//! String and list helpers for archive name templates.
//!
//! Names of group members usually arrive as one string, so templates need to
//! split them, pick parts and join them again:
//!
//! ```text
//! {{join (initial (split member " ")) "-"}}_{{last (split member " ")}}
//! ```
//!
//! Argument order is value first, then options. `default` follows the sprig
//! convention and takes the fallback first: `{{default "anon" group}}`.

use handlebars::{Handlebars, handlebars_helper};
use serde_json::Value as Json;

handlebars_helper!(split: |value: str, separator: str| {
    value
        .split(separator)
        .map(|part| Json::String(part.to_string()))
        .collect::<Vec<_>>()
});

handlebars_helper!(join: |list: Json, separator: str| {
    match list {
        Json::Array(items) => items.iter().map(as_text).collect::<Vec<_>>().join(separator),
        other => as_text(other),
    }
});

handlebars_helper!(first: |list: Json| {
    list.as_array().and_then(|items| items.first()).cloned().unwrap_or(Json::Null)
});

handlebars_helper!(last: |list: Json| {
    list.as_array().and_then(|items| items.last()).cloned().unwrap_or(Json::Null)
});

handlebars_helper!(initial: |list: Json| {
    match list.as_array() {
        Some(items) if !items.is_empty() => Json::Array(items[..items.len() - 1].to_vec()),
        _ => Json::Array(Vec::new()),
    }
});

handlebars_helper!(rest: |list: Json| {
    match list.as_array() {
        Some(items) if !items.is_empty() => Json::Array(items[1..].to_vec()),
        _ => Json::Array(Vec::new()),
    }
});

handlebars_helper!(lower: |value: str| value.to_lowercase());

handlebars_helper!(upper: |value: str| value.to_uppercase());

handlebars_helper!(trim: |value: str| value.trim().to_string());

handlebars_helper!(title: |value: str| {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
});

handlebars_helper!(replace: |value: str, from: str, to: str| value.replace(from, to));

handlebars_helper!(default: |fallback: Json, value: Json| {
    if is_empty(value) { fallback.clone() } else { value.clone() }
});

/// Registers every helper of this module on `registry`.
pub fn register(registry: &mut Handlebars<'static>) {
    registry.register_helper("split", Box::new(split));
    registry.register_helper("join", Box::new(join));
    registry.register_helper("first", Box::new(first));
    registry.register_helper("last", Box::new(last));
    registry.register_helper("initial", Box::new(initial));
    registry.register_helper("rest", Box::new(rest));
    registry.register_helper("lower", Box::new(lower));
    registry.register_helper("upper", Box::new(upper));
    registry.register_helper("trim", Box::new(trim));
    registry.register_helper("title", Box::new(title));
    registry.register_helper("replace", Box::new(replace));
    registry.register_helper("default", Box::new(default));
}

fn as_text(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_empty(value: &Json) -> bool {
    match value {
        Json::Null => true,
        Json::Bool(b) => !b,
        Json::String(s) => s.is_empty(),
        Json::Array(items) => items.is_empty(),
        Json::Object(map) => map.is_empty(),
        Json::Number(_) => false,
    }
}

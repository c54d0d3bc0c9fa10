//! Handlebars rendering for command arguments and archive names.
//!
//! Templates may be written with Go-style leading dots (`{{._id}}`,
//! `{{ .format }}`); the dot in front of a path head is dropped before rendering,
//! so both spellings resolve against the same data.

pub mod helpers;

use crate::error::{Error, Result};
use handlebars::Handlebars;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::LazyLock;

static MUSTACHE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{\{[^}]*\}\}").ok());

static DOT_HEAD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(^|[\s({~])\.([A-Za-z_])").ok());

/// Template renderer with the string helpers registered and escaping disabled.
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Renderer that fails on missing variables.
    pub fn strict() -> Self {
        Self::with_strict_mode(true)
    }

    /// Renderer that renders missing variables as empty strings.
    pub fn lenient() -> Self {
        Self::with_strict_mode(false)
    }

    fn with_strict_mode(strict: bool) -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(strict);
        helpers::register(&mut registry);
        Self { registry }
    }

    /// Renders `template` against `data`.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String> {
        let template = normalize(template);
        self.registry
            .render_template(&template, data)
            .map_err(|e| Error::Template {
                reason: e.to_string(),
            })
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::lenient()
    }
}

/// Drops leading dots from path heads inside mustaches.
///
/// `{{._id}}` becomes `{{_id}}` and `{{join (split .member " ") "-"}}` becomes
/// `{{join (split member " ") "-"}}`. Parent paths (`../x`) and `this.x` are
/// left alone.
pub fn normalize(template: &str) -> Cow<'_, str> {
    let (Some(mustache), Some(dot_head)) = (MUSTACHE.as_ref(), DOT_HEAD.as_ref()) else {
        return Cow::Borrowed(template);
    };
    mustache.replace_all(template, |caps: &regex::Captures<'_>| {
        dot_head.replace_all(&caps[0], "${1}${2}").into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_go_style_paths() {
        assert_eq!(
            normalize("assignment-{{._id}}.{{.format}}"),
            "assignment-{{_id}}.{{format}}"
        );
        assert_eq!(normalize("{{ .format }}"), "{{ format }}");
        assert_eq!(normalize("{{~ .x ~}}"), "{{~ x ~}}");
        assert_eq!(
            normalize(r#"{{join (split .member " ") "-"}}"#),
            r#"{{join (split member " ") "-"}}"#
        );
        assert_eq!(normalize("{{../x}} {{this.y}}"), "{{../x}} {{this.y}}");
        assert_eq!(normalize("plain.text .dot"), "plain.text .dot");
    }

    #[test]
    fn does_not_escape_html() {
        let out = Renderer::strict()
            .render("{{DIR}}", &json!({ "DIR": "a&b/<c>" }))
            .unwrap();
        assert_eq!(out, "a&b/<c>");
    }

    #[test]
    fn strict_mode_rejects_missing_variables() {
        let err = Renderer::strict()
            .render("{{MISSING}}", &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
    }

    #[test]
    fn lenient_mode_renders_missing_as_empty() {
        let out = Renderer::lenient()
            .render("a{{missing}}b", &json!({}))
            .unwrap();
        assert_eq!(out, "ab");
    }

    #[test]
    fn helpers_split_member_names() {
        let data = json!({ "member": "Ada Byron Lovelace" });
        let r = Renderer::lenient();

        assert_eq!(
            r.render(r#"{{last (split member " ")}}"#, &data).unwrap(),
            "Lovelace"
        );
        assert_eq!(
            r.render(r#"{{first (split member " ")}}"#, &data).unwrap(),
            "Ada"
        );
        assert_eq!(
            r.render(r#"{{join (initial (split member " ")) "-"}}"#, &data)
                .unwrap(),
            "Ada-Byron"
        );
        assert_eq!(
            r.render(r#"{{join (rest (split member " ")) "_"}}"#, &data)
                .unwrap(),
            "Byron_Lovelace"
        );
    }

    #[test]
    fn helpers_change_case_and_text() {
        let r = Renderer::lenient();
        let data = json!({ "s": "  online algorithms " });

        assert_eq!(r.render("{{upper (trim s)}}", &data).unwrap(), "ONLINE ALGORITHMS");
        assert_eq!(r.render("{{title (trim s)}}", &data).unwrap(), "Online Algorithms");
        assert_eq!(r.render("{{lower \"ABC\"}}", &data).unwrap(), "abc");
        assert_eq!(
            r.render(r#"{{replace (trim s) " " "_"}}"#, &data).unwrap(),
            "online_algorithms"
        );
    }

    #[test]
    fn default_prefers_non_empty_values() {
        let r = Renderer::lenient();

        assert_eq!(
            r.render(r#"{{default "anon" group}}"#, &json!({})).unwrap(),
            "anon"
        );
        assert_eq!(
            r.render(r#"{{default "anon" group}}"#, &json!({ "group": "" }))
                .unwrap(),
            "anon"
        );
        assert_eq!(
            r.render(r#"{{default "anon" group}}"#, &json!({ "group": "cows" }))
                .unwrap(),
            "cows"
        );
    }
}

//! Rendering collaborator seam.
//!
//! Handlers hand over a view name, a plain data mapping and an optional layout
//! name; markup is entirely the renderer's business. The presentation layer
//! proper is out of scope for this crate, so the bundled implementation emits
//! a minimal HTML shell that carries the escaped data.

use serde_json::Value;

pub trait Renderer: Send + Sync {
    fn render(&self, view: &str, data: &Value, layout: Option<&str>) -> String;
}

/// Escape text for inclusion in an HTML document.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn value_to_html(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            out.push_str("<dl>");
            for (key, val) in map {
                out.push_str("<dt>");
                out.push_str(&escape(key));
                out.push_str("</dt><dd>");
                value_to_html(val, out);
                out.push_str("</dd>");
            }
            out.push_str("</dl>");
        }
        Value::Array(items) => {
            out.push_str("<ul>");
            for item in items {
                out.push_str("<li>");
                value_to_html(item, out);
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }
        Value::String(s) => out.push_str(&escape(s)),
        Value::Null => {}
        other => out.push_str(&escape(&other.to_string())),
    }
}

/// Minimal stand-in renderer: one HTML document per view with the data mapped
/// to definition lists. Replaced wholesale when a real template layer lands.
pub struct HtmlShell;

impl Renderer for HtmlShell {
    fn render(&self, view: &str, data: &Value, layout: Option<&str>) -> String {
        let mut body = String::new();
        value_to_html(data, &mut body);
        format!(
            "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
             <title>{title}</title></head>\n\
             <body data-view=\"{view}\"{layout_attr}>\n{body}\n</body>\n</html>\n",
            title = escape(view),
            view = escape(view),
            layout_attr = match layout {
                Some(name) => format!(" data-layout=\"{}\"", escape(name)),
                None => String::new(),
            },
            body = body,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_covers_html_metacharacters() {
        assert_eq!(
            escape(r#"<b>"Jedi & Co's"</b>"#),
            "&lt;b&gt;&quot;Jedi &amp; Co&#39;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_escapes_data_values() {
        let html = HtmlShell.render("index", &json!({ "hero_title": "<script>" }), None);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_marks_view_and_layout() {
        let html = HtmlShell.render("dashboard", &json!({}), Some("admin/layout-sidebar"));
        assert!(html.contains("data-view=\"dashboard\""));
        assert!(html.contains("data-layout=\"admin/layout-sidebar\""));
    }

    #[test]
    fn test_render_walks_nested_collections() {
        let html = HtmlShell.render(
            "blog",
            &json!({ "posts": [{ "title": "Eye care" }, { "title": "Child health" }] }),
            None,
        );
        assert!(html.contains("Eye care"));
        assert!(html.contains("Child health"));
    }
}

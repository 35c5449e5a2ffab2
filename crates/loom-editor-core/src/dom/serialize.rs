//! HTML serialization (`innerHTML` / `outerHTML`).

use super::parse::is_void_element;
use super::{Dom, NodeId, NodeKind};

impl Dom {
    /// Serialized children of `id`.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialized `id` including its own tag.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(text) => escape_text(text, out),
            NodeKind::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Fragment => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attribute(value, out);
                    out.push('"');
                }
                out.push('>');
                if is_void_element(&el.tag) {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

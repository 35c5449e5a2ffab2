//! Tolerant HTML fragment parser.
//!
//! Not an HTML5 tree builder. It understands start/end tags with quoted or
//! bare attributes, void elements, comments and a handful of character
//! references, which covers editor content. Unmatched end tags are ignored
//! and unclosed elements are closed at the end of input.

use super::{Dom, NodeId};

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

pub(super) fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

impl Dom {
    /// Parse `html` into a new detached fragment and return the fragment.
    pub fn parse_fragment(&mut self, html: &str) -> NodeId {
        let fragment = self.create_fragment();
        let mut open: Vec<NodeId> = vec![fragment];
        let bytes = html.as_bytes();
        let len = bytes.len();
        let mut i = 0;

        while i < len {
            let current = open.last().copied().unwrap_or(fragment);

            if bytes[i] != b'<' {
                let start = i;
                while i < len && bytes[i] != b'<' {
                    i += 1;
                }
                let text = decode_entities(&html[start..i]);
                if !text.is_empty() {
                    let node = self.create_text(text);
                    self.append_child(current, node);
                }
                continue;
            }

            if html[i..].starts_with(COMMENT_START) {
                let body_start = i + COMMENT_START.len();
                let (body, next) = match html[body_start..].find(COMMENT_END) {
                    Some(end) => (
                        &html[body_start..body_start + end],
                        body_start + end + COMMENT_END.len(),
                    ),
                    None => (&html[body_start..], len),
                };
                let node = self.create_comment(body);
                self.append_child(current, node);
                i = next;
                continue;
            }

            // Doctype and processing instructions carry nothing for editor content.
            if i + 1 < len && (bytes[i + 1] == b'!' || bytes[i + 1] == b'?') {
                i = html[i..].find('>').map_or(len, |end| i + end + 1);
                continue;
            }

            if i + 1 < len && bytes[i + 1] == b'/' {
                let start = i + 2;
                let mut j = start;
                while j < len && is_name_char(bytes[j]) {
                    j += 1;
                }
                let name = html[start..j].to_ascii_lowercase();
                while j < len && bytes[j] != b'>' {
                    j += 1;
                }
                i = (j + 1).min(len);

                if let Some(pos) = open
                    .iter()
                    .rposition(|&n| self.tag(n) == Some(name.as_str()))
                {
                    open.truncate(pos);
                }
                continue;
            }

            let start = i + 1;
            let mut j = start;
            while j < len && is_name_char(bytes[j]) {
                j += 1;
            }
            if j == start {
                // A lone '<' is text.
                let node = self.create_text("<");
                self.append_child(current, node);
                i += 1;
                continue;
            }

            let name = html[start..j].to_ascii_lowercase();
            let element = self.create_element(&name);
            let mut self_closing = false;
            let mut k = j;

            loop {
                while k < len && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                if k >= len {
                    break;
                }
                if bytes[k] == b'>' {
                    k += 1;
                    break;
                }
                if bytes[k] == b'/' {
                    if k + 1 < len && bytes[k + 1] == b'>' {
                        self_closing = true;
                        k += 2;
                        break;
                    }
                    k += 1;
                    continue;
                }

                let name_start = k;
                while k < len && is_name_char(bytes[k]) {
                    k += 1;
                }
                if name_start == k {
                    k += 1;
                    continue;
                }
                let attribute_name = html[name_start..k].to_ascii_lowercase();

                while k < len && bytes[k].is_ascii_whitespace() {
                    k += 1;
                }
                let mut value = String::new();
                if k < len && bytes[k] == b'=' {
                    k += 1;
                    while k < len && bytes[k].is_ascii_whitespace() {
                        k += 1;
                    }
                    if k < len && (bytes[k] == b'"' || bytes[k] == b'\'') {
                        let quote = bytes[k];
                        k += 1;
                        let value_start = k;
                        while k < len && bytes[k] != quote {
                            k += 1;
                        }
                        value = decode_entities(&html[value_start..k]);
                        if k < len {
                            k += 1;
                        }
                    } else {
                        let value_start = k;
                        while k < len && !bytes[k].is_ascii_whitespace() && bytes[k] != b'>' {
                            k += 1;
                        }
                        value = decode_entities(&html[value_start..k]);
                    }
                }
                self.set_attribute(element, &attribute_name, value);
            }

            self.append_child(current, element);
            if !self_closing && !is_void_element(&name) {
                open.push(element);
            }
            i = k;
        }

        fragment
    }
}

/// Decode the character references editor content actually uses.
///
/// Named: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`. Numeric
/// references must be semicolon-terminated. Anything else passes through.
fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let name = &rest[1..semi];
            let c = match name {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| name.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, semi))
        });

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_and_void() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment("<div id=a>x<br>y<img src='i.png'/></div>tail");
        let children = dom.children(fragment).to_vec();
        assert_eq!(children.len(), 2);
        let div = children[0];
        assert_eq!(dom.element_id(div), Some("a"));
        assert_eq!(dom.children(div).len(), 4);
        assert_eq!(dom.text(children[1]), Some("tail"));
    }

    #[test]
    fn test_parse_unclosed_and_stray_end_tags() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment("<p><b>bold</p></i>after");
        let children = dom.children(fragment).to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(dom.text_content(children[0]), "bold");
        assert_eq!(dom.text(children[1]), Some("after"));
    }

    #[test]
    fn test_parse_comment() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment("a<!--{\"x\":1}-->");
        let last = dom.last_child(fragment).unwrap();
        assert_eq!(dom.text(last), Some("{\"x\":1}"));
        assert!(!dom.is_text(last));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(decode_entities("&#65;&#x42;&nbsp;"), "AB\u{a0}");
        assert_eq!(decode_entities("fish & chips"), "fish & chips");
        assert_eq!(decode_entities("&unknown;"), "&unknown;");
    }
}

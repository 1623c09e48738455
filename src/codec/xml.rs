//! XML codec for SOAP message bodies.
//!
//! Requests are typed structs serialized to a [`serde_json::Value`] tree and
//! rendered here. Responses are parsed back into the same kind of tree.
//!
//! # Rendering rules
//!
//! - object → element with one child element per key
//! - key starting with `@` → attribute on the enclosing element
//! - array → the element repeated once per item
//! - `null` → `<bm:name xsi:nil="true"/>`
//! - scalar → escaped text
//!
//! # Parsing rules
//!
//! - namespace prefixes are stripped, tag case is preserved
//! - children become object keys; repeated names collapse into an array
//! - text-only elements become strings, `true`/`false` become booleans
//! - empty or `xsi:nil` elements become `null`
//! - attributes become `@name` keys; namespace declarations are dropped

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{BigMachinesError, Result};

/// Namespace prefix applied to every rendered element and attribute.
pub const ELEMENT_PREFIX: &str = "bm";

/// Replacement text for filtered element values.
pub const FILTERED: &str = "***FILTERED***";

/// Options for rendering a message tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    /// Indent nested elements (one element per line).
    pub pretty: bool,
    /// Element names whose text is replaced with [`FILTERED`].
    pub filters: &'a [String],
}

impl<'a> RenderOptions<'a> {
    /// Compact rendering without filtering, used for the wire.
    pub fn wire() -> Self {
        Self::default()
    }

    /// Rendering for log output.
    pub fn log(pretty: bool, filters: &'a [String]) -> Self {
        Self { pretty, filters }
    }

    fn is_filtered(&self, name: &str) -> bool {
        self.filters.iter().any(|f| f == name)
    }
}

/// Render `value` as the content of an element named `name`.
pub fn render_element(name: &str, value: &Value, options: RenderOptions<'_>) -> String {
    let mut out = String::with_capacity(256);
    write_element(&mut out, name, value, options, 0);
    out
}

fn write_element(out: &mut String, name: &str, value: &Value, options: RenderOptions<'_>, depth: usize) {
    if let Value::Array(items) = value {
        for item in items {
            write_element(out, name, item, options, depth);
        }
        return;
    }

    if options.pretty && !out.is_empty() {
        out.push('\n');
        out.push_str(&"  ".repeat(depth));
    }
    out.push('<');
    out.push_str(ELEMENT_PREFIX);
    out.push(':');
    out.push_str(name);

    match value {
        Value::Null => out.push_str(r#" xsi:nil="true"/>"#),
        Value::Object(map) => {
            let mut has_children = false;
            for (key, child) in map {
                if let Some(attr) = key.strip_prefix('@') {
                    out.push_str(&format!(
                        r#" {ELEMENT_PREFIX}:{attr}="{}""#,
                        escape(&scalar_text(child))
                    ));
                } else {
                    has_children = true;
                }
            }
            if !has_children {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for (key, child) in map.iter().filter(|(key, _)| !key.starts_with('@')) {
                write_element(out, key, child, options, depth + 1);
            }
            if options.pretty {
                out.push('\n');
                out.push_str(&"  ".repeat(depth));
            }
            close_tag(out, name);
        }
        scalar => {
            out.push('>');
            if options.is_filtered(name) {
                out.push_str(FILTERED);
            } else {
                out.push_str(&escape(&scalar_text(scalar)));
            }
            close_tag(out, name);
        }
    }
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(ELEMENT_PREFIX);
    out.push(':');
    out.push_str(name);
    out.push('>');
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Partially built element while walking the event stream.
#[derive(Default)]
struct Node {
    name: String,
    entries: Map<String, Value>,
    text: String,
    has_children: bool,
    nil: bool,
}

impl Node {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let mut node = Node {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            ..Node::default()
        };
        for attr in start.attributes() {
            let attr = attr.map_err(|e| BigMachinesError::Xml(e.into()))?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let local = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            if local == "nil" && value == "true" {
                node.nil = true;
                continue;
            }
            node.entries.insert(format!("@{local}"), Value::String(value));
        }
        Ok(node)
    }

    fn into_value(self) -> Value {
        if self.nil {
            return Value::Null;
        }
        if self.has_children {
            return Value::Object(self.entries);
        }
        let text = self.text.trim();
        if text.is_empty() {
            if self.entries.is_empty() {
                Value::Null
            } else {
                Value::Object(self.entries)
            }
        } else {
            typecast(text)
        }
    }

    fn add_child(&mut self, name: String, value: Value) {
        self.has_children = true;
        match self.entries.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.entries.insert(name, value);
            }
        }
    }
}

fn typecast(text: &str) -> Value {
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(text.to_string()),
    }
}

fn close(stack: &mut Vec<Node>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(node) = stack.pop() {
        let name = node.name.clone();
        let value = node.into_value();
        if let Some(parent) = stack.last_mut() {
            parent.add_child(name, value);
        }
    }
}

/// Parse an XML document into a value tree.
///
/// The returned map is keyed by the document's root element name.
pub fn parse_document(xml: &[u8]) -> Result<Map<String, Value>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![Node::default()];
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => stack.push(Node::open(&start)?),
            Event::Empty(start) => {
                stack.push(Node::open(&start)?);
                close(&mut stack);
            }
            Event::End(_) => close(&mut stack),
            Event::Text(text) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    while stack.len() > 1 {
        close(&mut stack);
    }
    Ok(stack.pop().map(|root| root.entries).unwrap_or_default())
}

/// Parse a SOAP envelope and return the contents of `Envelope/Body`.
pub fn parse_body(xml: &[u8]) -> Result<Map<String, Value>> {
    let mut document = parse_document(xml)?;
    let envelope = match document.remove("Envelope") {
        Some(Value::Object(envelope)) => envelope,
        _ => return Err(BigMachinesError::UnexpectedResponseShape("Envelope".into())),
    };
    match envelope.get("Body") {
        Some(Value::Object(body)) => Ok(body.clone()),
        Some(Value::Null) => Ok(Map::new()),
        _ => Err(BigMachinesError::UnexpectedResponseShape("Body".into())),
    }
}

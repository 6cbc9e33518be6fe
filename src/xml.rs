//! XML body decoding.
//!
//! Turns the platform's Rails-style XML into a generic [`Value`] tree:
//!
//! - an element with child elements becomes a mapping, repeated child
//!   names become a sequence (a single child stays a bare item, which
//!   is what [`crate::normalize::arrayify`] compensates for);
//! - a leaf element becomes a string, or a typed scalar when it carries
//!   `type="integer" | "boolean" | "decimal" | "float"`;
//! - `type="array"` forces a sequence of the children, `nil="true"` and
//!   empty elements yield null;
//! - any other attribute becomes a mapping entry, with the element text
//!   stored under [`CONTENT_KEY`].
//!
//! The result is a single-entry mapping `{root_name: root_value}`.
//! Keys are left exactly as they appear in the document.

use core::fmt::Display;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Number, Value};

use crate::error::{Result, ZaypayError};

/// Key under which the text of an element with attributes is stored.
pub const CONTENT_KEY: &str = "__content__";

/// Attribute carrying the Rails type hint.
const TYPE_ATTR: &str = "type";

/// Attribute marking an explicit null.
const NIL_ATTR: &str = "nil";

/// Decodes an XML document into a generic value tree.
///
/// # Errors
///
/// Returns [`ZaypayError::Xml`] if the document is malformed or has no
/// root element.
pub fn decode(body: &str) -> Result<Value> {
    let mut reader = Reader::from_str(body);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ZaypayError::Xml("unbalanced closing tag".to_owned()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let unescaped = text.unescape().map_err(xml_error)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&unescaped);
                }
            }
            Event::CData(cdata) => {
                let raw = cdata.into_inner();
                let text = core::str::from_utf8(&raw).map_err(xml_error)?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(text);
                }
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ZaypayError::Xml(format!("element <{}> is never closed", open.name)));
    }
    let (name, value) =
        root.ok_or_else(|| ZaypayError::Xml("document has no root element".to_owned()))?;
    let mut document = Map::new();
    let _previous = document.insert(name, value);
    Ok(Value::Object(document))
}

/// Wraps any displayable decoder error into [`ZaypayError::Xml`].
fn xml_error<E: Display>(err: E) -> ZaypayError {
    ZaypayError::Xml(err.to_string())
}

/// Finishes `element` and hands it to its parent, or makes it the root.
fn attach(stack: &mut [Element], root: &mut Option<(String, Value)>, element: Element) {
    let (name, value) = element.finish();
    match stack.last_mut() {
        Some(parent) => parent.children.push((name, value)),
        None => *root = Some((name, value)),
    }
}

/// An element whose closing tag has not been seen yet.
#[derive(Debug)]
struct Element {
    /// Tag name.
    name: String,
    /// Attributes other than the `type`/`nil` hints.
    attributes: Map<String, Value>,
    /// Value of the `type` attribute, if any.
    type_hint: Option<String>,
    /// Whether the element carried `nil="true"`.
    nil: bool,
    /// Finished children in document order.
    children: Vec<(String, Value)>,
    /// Accumulated text content.
    text: String,
}

impl Element {
    /// Reads the tag name and attributes of an opening tag.
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = core::str::from_utf8(start.name().as_ref())
            .map_err(xml_error)?
            .to_owned();
        let mut element = Self {
            name,
            attributes: Map::new(),
            type_hint: None,
            nil: false,
            children: Vec::new(),
            text: String::new(),
        };
        for attribute in start.attributes() {
            let attribute = attribute.map_err(xml_error)?;
            let key = core::str::from_utf8(attribute.key.as_ref()).map_err(xml_error)?;
            let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
            match key {
                TYPE_ATTR => element.type_hint = Some(value),
                NIL_ATTR => element.nil = value == "true",
                other => {
                    let _previous = element
                        .attributes
                        .insert(other.to_owned(), Value::String(value));
                }
            }
        }
        Ok(element)
    }

    /// Converts the element into its `(name, value)` pair.
    fn finish(self) -> (String, Value) {
        let value = if self.nil {
            Value::Null
        } else if self.type_hint.as_deref() == Some("array") {
            Value::Array(self.children.into_iter().map(|(_, child)| child).collect())
        } else if self.children.is_empty() {
            leaf_value(self.text, self.type_hint.as_deref(), self.attributes)
        } else {
            let mut map = self.attributes;
            merge_children(&mut map, self.children);
            Value::Object(map)
        };
        (self.name, value)
    }
}

/// Builds the value of an element without child elements.
fn leaf_value(text: String, type_hint: Option<&str>, attributes: Map<String, Value>) -> Value {
    let scalar = if text.is_empty() {
        Value::Null
    } else {
        typecast(text, type_hint)
    };
    if attributes.is_empty() {
        return scalar;
    }
    let mut map = attributes;
    if !scalar.is_null() {
        let _previous = map.insert(CONTENT_KEY.to_owned(), scalar);
    }
    Value::Object(map)
}

/// Applies a Rails `type` hint to leaf text. Text that does not parse as
/// the hinted type is kept as a string.
fn typecast(text: String, type_hint: Option<&str>) -> Value {
    match type_hint {
        Some("integer") => text
            .trim()
            .parse::<i64>()
            .map_or(Value::String(text), Value::from),
        Some("boolean") => parse_bool(text.trim()).map_or(Value::String(text), Value::Bool),
        Some("decimal" | "float") => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or(Value::String(text), Value::Number),
        _ => Value::String(text),
    }
}

/// Parses the boolean spellings Rails emits.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Inserts children into `map`, turning repeated names into sequences.
fn merge_children(map: &mut Map<String, Value>, children: Vec<(String, Value)>) {
    let mut repeated: Vec<String> = Vec::new();
    for (name, value) in children {
        if repeated.contains(&name) {
            if let Some(Value::Array(items)) = map.get_mut(&name) {
                items.push(value);
            }
            continue;
        }
        match map.remove(&name) {
            Some(first) => {
                let _previous = map.insert(name.clone(), Value::Array(vec![first, value]));
                repeated.push(name);
            }
            None => {
                let _previous = map.insert(name, value);
            }
        }
    }
}

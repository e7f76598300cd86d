use super::namespaces::{RDF, XML, XMLNS};
use super::{ArrayItem, ArrayKind, Property, XmpPacket, XmpValue};
use crate::error::AppError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

#[derive(Debug)]
struct Name {
    uri: String,
    local: String,
    prefix: String,
}

#[derive(Debug)]
struct Attr {
    name: Name,
    value: String,
}

#[derive(Debug)]
struct Element {
    name: Name,
    attrs: Vec<Attr>,
    children: Vec<Node>,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

type Scope = Vec<(String, String)>;

impl Element {
    fn is(&self, uri: &str, local: &str) -> bool {
        self.name.uri == uri && self.name.local == local
    }

    fn attr(&self, uri: &str, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.uri == uri && a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Attributes that carry property values rather than RDF syntax.
    fn property_attrs(&self) -> impl Iterator<Item = &Attr> {
        self.attrs.iter().filter(|a| {
            !a.name.uri.is_empty() && a.name.uri != RDF && a.name.uri != XML && a.name.uri != XMLNS
        })
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }
}

/// Parses a serialized XMP packet. Whitespace-only input yields an empty packet.
pub fn parse_packet(text: &str) -> Result<XmpPacket, AppError> {
    let nodes = read_tree(text)?;
    let mut packet = XmpPacket::new();
    collect_descriptions(&nodes, &mut packet);
    Ok(packet)
}

fn read_tree(text: &str) -> Result<Vec<Node>, AppError> {
    let mut reader = Reader::from_str(text);
    let mut scopes: Vec<Scope> = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let (element, declared) = open_element(&start, &scopes)?;
                scopes.push(declared);
                stack.push(element);
            }
            Event::Empty(start) => {
                let (element, _) = open_element(&start, &scopes)?;
                attach(&mut stack, &mut roots, Node::Element(element));
            }
            Event::End(_) => {
                scopes.pop();
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut roots, Node::Element(element));
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(text.unescape()?.into_owned()));
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    parent.children.push(Node::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(AppError::Generic("unexpected end of XMP packet".to_string()));
    }
    Ok(roots)
}

fn attach(stack: &mut [Element], roots: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

fn open_element(start: &BytesStart, scopes: &[Scope]) -> Result<(Element, Scope), AppError> {
    let mut declared: Scope = Vec::new();
    let mut raw_attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        if key == "xmlns" {
            declared.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declared.push((prefix.to_string(), value));
        } else {
            raw_attrs.push((key, value));
        }
    }

    let resolve = |qname: &str, is_attr: bool| -> Name {
        let (prefix, local) = match qname.split_once(':') {
            Some((prefix, local)) => (prefix, local),
            None => ("", qname),
        };
        let uri = if prefix == "xml" {
            XML.to_string()
        } else if prefix.is_empty() && is_attr {
            String::new()
        } else {
            declared
                .iter()
                .rev()
                .chain(scopes.iter().rev().flat_map(|scope| scope.iter().rev()))
                .find(|(p, _)| p == prefix)
                .map(|(_, uri)| uri.clone())
                .unwrap_or_default()
        };
        Name {
            uri,
            local: local.to_string(),
            prefix: prefix.to_string(),
        }
    };

    let qname = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let element = Element {
        name: resolve(&qname, false),
        attrs: raw_attrs
            .iter()
            .map(|(key, value)| Attr {
                name: resolve(key, true),
                value: value.clone(),
            })
            .collect(),
        children: Vec::new(),
    };
    Ok((element, declared))
}

fn collect_descriptions(nodes: &[Node], packet: &mut XmpPacket) {
    for node in nodes {
        if let Node::Element(element) = node {
            if element.is(RDF, "Description") {
                for property in description_fields(element, packet) {
                    packet.push_property(property);
                }
            } else {
                collect_descriptions(&element.children, packet);
            }
        }
    }
}

fn description_fields(element: &Element, packet: &mut XmpPacket) -> Vec<Property> {
    let mut fields: Vec<Property> = element
        .property_attrs()
        .map(|attr| Property {
            prefix: packet.register_namespace(&attr.name.prefix, &attr.name.uri),
            name: attr.name.local.clone(),
            value: XmpValue::Text(attr.value.clone()),
        })
        .collect();
    for child in element.child_elements() {
        fields.push(Property {
            prefix: packet.register_namespace(&child.name.prefix, &child.name.uri),
            name: child.name.local.clone(),
            value: parse_value(child, packet),
        });
    }
    fields
}

fn array_kind(element: &Element) -> Option<ArrayKind> {
    if element.name.uri != RDF {
        return None;
    }
    match element.name.local.as_str() {
        "Bag" => Some(ArrayKind::Bag),
        "Seq" => Some(ArrayKind::Seq),
        "Alt" => Some(ArrayKind::Alt),
        _ => None,
    }
}

fn parse_value(element: &Element, packet: &mut XmpPacket) -> XmpValue {
    if let Some(resource) = element.attr(RDF, "resource") {
        return XmpValue::Text(resource.to_string());
    }
    if element.attr(RDF, "parseType") == Some("Resource") {
        return XmpValue::Struct(description_fields(element, packet));
    }

    let children: Vec<&Element> = element.child_elements().collect();
    if let [only] = children.as_slice() {
        if let Some(kind) = array_kind(only) {
            let items = only
                .child_elements()
                .filter(|li| li.is(RDF, "li"))
                .map(|li| ArrayItem {
                    lang: li.attr(XML, "lang").map(str::to_string),
                    value: parse_value(li, packet),
                })
                .collect();
            return XmpValue::Array { kind, items };
        }
        if only.is(RDF, "Description") {
            return XmpValue::Struct(description_fields(only, packet));
        }
    }

    if !children.is_empty() || element.property_attrs().next().is_some() {
        return XmpValue::Struct(description_fields(element, packet));
    }
    XmpValue::Text(element.text())
}

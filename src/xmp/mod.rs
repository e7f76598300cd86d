//! In-memory XMP packet with exiv2-style key access.
//!
//! Keys look like `Xmp.dc.subject` or
//! `Xmp.mwg-rs.Regions/mwg-rs:RegionList[2]/mwg-rs:Name`. Arrays of plain
//! text are addressed as a single key; arrays of structs expose 1-based
//! `[n]` item paths.

pub mod namespaces;
mod parse;
mod write;

use crate::error::AppError;
use std::collections::BTreeMap;

pub use parse::parse_packet;
pub use write::serialize_packet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    Bag,
    Seq,
    Alt,
}

impl ArrayKind {
    pub fn rdf_name(self) -> &'static str {
        match self {
            ArrayKind::Bag => "Bag",
            ArrayKind::Seq => "Seq",
            ArrayKind::Alt => "Alt",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmpValue {
    Text(String),
    Array { kind: ArrayKind, items: Vec<ArrayItem> },
    Struct(Vec<Property>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayItem {
    pub lang: Option<String>,
    pub value: XmpValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub prefix: String,
    pub name: String,
    pub value: XmpValue,
}

#[derive(Debug, Clone, Default)]
pub struct XmpPacket {
    /// Prefixes declared by the document for schemas without a canonical prefix.
    namespaces: BTreeMap<String, String>,
    properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Field { prefix: String, name: String },
    Index(usize),
}

/// Array type used when a property is created from scratch.
fn default_array_kind(prefix: &str, name: &str) -> Option<ArrayKind> {
    match (prefix, name) {
        ("digiKam", "TagsList") => Some(ArrayKind::Seq),
        ("MicrosoftPhoto", "LastKeywordXMP") => Some(ArrayKind::Bag),
        ("MicrosoftPhoto", "LastKeywordIPTC") => Some(ArrayKind::Bag),
        ("dc", "subject") => Some(ArrayKind::Bag),
        ("dc", "creator") => Some(ArrayKind::Seq),
        ("dc", "title") | ("dc", "description") | ("dc", "rights") => Some(ArrayKind::Alt),
        ("lr", "hierarchicalSubject") => Some(ArrayKind::Bag),
        ("mediapro", "CatalogSets") => Some(ArrayKind::Bag),
        _ => None,
    }
}

fn parse_key(key: &str) -> Result<Vec<Step>, AppError> {
    let invalid = || AppError::InvalidKey(key.to_string());
    let rest = key.strip_prefix("Xmp.").ok_or_else(invalid)?;
    let (prefix, mut path) = rest.split_once('.').ok_or_else(invalid)?;

    let end = path.find(|c: char| c == '/' || c == '[').unwrap_or(path.len());
    let name = &path[..end];
    if prefix.is_empty() || name.is_empty() {
        return Err(invalid());
    }
    let mut steps = vec![Step::Field {
        prefix: prefix.to_string(),
        name: name.to_string(),
    }];
    path = &path[end..];

    while !path.is_empty() {
        if let Some(tail) = path.strip_prefix('[') {
            let close = tail.find(']').ok_or_else(invalid)?;
            let index: usize = tail[..close].parse().map_err(|_| invalid())?;
            if index == 0 {
                return Err(invalid());
            }
            steps.push(Step::Index(index));
            path = &tail[close + 1..];
        } else if let Some(tail) = path.strip_prefix('/') {
            let end = tail.find(|c: char| c == '/' || c == '[').unwrap_or(tail.len());
            let (prefix, name) = tail[..end].split_once(':').ok_or_else(invalid)?;
            if prefix.is_empty() || name.is_empty() {
                return Err(invalid());
            }
            steps.push(Step::Field {
                prefix: prefix.to_string(),
                name: name.to_string(),
            });
            path = &tail[end..];
        } else {
            return Err(invalid());
        }
    }
    Ok(steps)
}

fn text_items(items: &[ArrayItem]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| match &item.value {
            XmpValue::Text(text) => Some(text.clone()),
            _ => None,
        })
        .collect()
}

fn flatten(path: String, value: &XmpValue, out: &mut Vec<String>) {
    out.push(path.clone());
    match value {
        XmpValue::Text(_) => {}
        XmpValue::Array { items, .. } => {
            if text_items(items).is_none() {
                for (i, item) in items.iter().enumerate() {
                    flatten(format!("{}[{}]", path, i + 1), &item.value, out);
                }
            }
        }
        XmpValue::Struct(fields) => {
            for field in fields {
                flatten(
                    format!("{}/{}:{}", path, field.prefix, field.name),
                    &field.value,
                    out,
                );
            }
        }
    }
}

impl XmpPacket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub(crate) fn push_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Returns the prefix under which `uri` is exposed in keys, registering
    /// the document's own prefix for schemas that have no canonical one.
    pub(crate) fn register_namespace(&mut self, hint: &str, uri: &str) -> String {
        if let Some(prefix) = namespaces::prefix_for_uri(uri) {
            return prefix.to_string();
        }
        if let Some((prefix, _)) = self.namespaces.iter().find(|(_, u)| u.as_str() == uri) {
            return prefix.clone();
        }
        let base = if hint.is_empty() { "ns" } else { hint };
        let mut prefix = base.to_string();
        let mut n = 1;
        while namespaces::uri_for_prefix(&prefix).is_some() || self.namespaces.contains_key(&prefix) {
            prefix = format!("{}{}", base, n);
            n += 1;
        }
        self.namespaces.insert(prefix.clone(), uri.to_string());
        prefix
    }

    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        namespaces::uri_for_prefix(prefix).or_else(|| self.namespaces.get(prefix).map(String::as_str))
    }

    /// Every key in document order, including container nodes.
    pub fn keys(&self) -> Vec<String> {
        let mut out = Vec::new();
        for property in &self.properties {
            flatten(
                format!("Xmp.{}.{}", property.prefix, property.name),
                &property.value,
                &mut out,
            );
        }
        out
    }

    fn find(&self, steps: &[Step]) -> Option<&XmpValue> {
        let (first, rest) = steps.split_first()?;
        let Step::Field { prefix, name } = first else {
            return None;
        };
        let mut current = &self
            .properties
            .iter()
            .find(|p| &p.prefix == prefix && &p.name == name)?
            .value;
        for step in rest {
            current = match (step, current) {
                (Step::Index(i), XmpValue::Array { items, .. }) => &items.get(i - 1)?.value,
                (Step::Field { prefix, name }, XmpValue::Struct(fields)) => {
                    &fields
                        .iter()
                        .find(|f| &f.prefix == prefix && &f.name == name)?
                        .value
                }
                _ => return None,
            };
        }
        Some(current)
    }

    fn find_mut(&mut self, steps: &[Step]) -> Option<&mut XmpValue> {
        let (first, rest) = steps.split_first()?;
        let Step::Field { prefix, name } = first else {
            return None;
        };
        let mut current = &mut self
            .properties
            .iter_mut()
            .find(|p| &p.prefix == prefix && &p.name == name)?
            .value;
        for step in rest {
            current = match (step, current) {
                (Step::Index(i), XmpValue::Array { items, .. }) => &mut items.get_mut(i - 1)?.value,
                (Step::Field { prefix, name }, XmpValue::Struct(fields)) => {
                    &mut fields
                        .iter_mut()
                        .find(|f| &f.prefix == prefix && &f.name == name)?
                        .value
                }
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn contains(&self, key: &str) -> bool {
        parse_key(key).ok().and_then(|steps| self.find(&steps).map(|_| ())).is_some()
    }

    /// String form of a key: text as-is, arrays of text joined with `", "`.
    pub fn get_string(&self, key: &str) -> Option<String> {
        let steps = parse_key(key).ok()?;
        match self.find(&steps)? {
            XmpValue::Text(text) => Some(text.clone()),
            XmpValue::Array { items, .. } => text_items(items).map(|texts| texts.join(", ")),
            XmpValue::Struct(_) => None,
        }
    }

    /// All values of a key; a plain text property yields one value.
    pub fn get_multiple(&self, key: &str) -> Vec<String> {
        let Ok(steps) = parse_key(key) else {
            return Vec::new();
        };
        match self.find(&steps) {
            Some(XmpValue::Text(text)) => vec![text.clone()],
            Some(XmpValue::Array { items, .. }) => items
                .iter()
                .filter_map(|item| match &item.value {
                    XmpValue::Text(text) => Some(text.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Sets a text value. On an existing array the value is appended as one
    /// more item; an empty value leaves the array as it is.
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let steps = parse_key(key)?;
        match self.find_mut(&steps) {
            Some(XmpValue::Array { items, .. }) => {
                if !value.is_empty() {
                    items.push(ArrayItem {
                        lang: None,
                        value: XmpValue::Text(value.to_string()),
                    });
                }
                Ok(())
            }
            Some(existing) => {
                *existing = XmpValue::Text(value.to_string());
                Ok(())
            }
            None => {
                let [Step::Field { prefix, name }] = steps.as_slice() else {
                    return Err(AppError::InvalidKey(key.to_string()));
                };
                let value = match default_array_kind(prefix, name) {
                    Some(_) if value.is_empty() => return Ok(()),
                    Some(kind) => XmpValue::Array {
                        kind,
                        items: vec![ArrayItem {
                            lang: None,
                            value: XmpValue::Text(value.to_string()),
                        }],
                    },
                    None => XmpValue::Text(value.to_string()),
                };
                self.properties.push(Property {
                    prefix: prefix.clone(),
                    name: name.clone(),
                    value,
                });
                Ok(())
            }
        }
    }

    /// Replaces a key with an array holding exactly `values`. An empty list
    /// removes a top-level key.
    pub fn set_multiple(&mut self, key: &str, values: &[String]) -> Result<(), AppError> {
        let steps = parse_key(key)?;
        let items: Vec<ArrayItem> = values
            .iter()
            .map(|v| ArrayItem {
                lang: None,
                value: XmpValue::Text(v.clone()),
            })
            .collect();

        let existing_kind = match self.find(&steps) {
            Some(XmpValue::Array { kind, .. }) => Some(*kind),
            Some(_) => Some(ArrayKind::Bag),
            None => None,
        };
        if let Some(kind) = existing_kind {
            if items.is_empty() && steps.len() == 1 {
                self.remove(key);
            } else if let Some(existing) = self.find_mut(&steps) {
                *existing = XmpValue::Array { kind, items };
            }
            return Ok(());
        }

        let [Step::Field { prefix, name }] = steps.as_slice() else {
            return Err(AppError::InvalidKey(key.to_string()));
        };
        if items.is_empty() {
            return Ok(());
        }
        let kind = default_array_kind(prefix, name).unwrap_or(ArrayKind::Bag);
        self.properties.push(Property {
            prefix: prefix.clone(),
            name: name.clone(),
            value: XmpValue::Array { kind, items },
        });
        Ok(())
    }

    /// Removes a top-level property. Returns whether anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let Ok(steps) = parse_key(key) else {
            return false;
        };
        let [Step::Field { prefix, name }] = steps.as_slice() else {
            return false;
        };
        let before = self.properties.len();
        self.properties
            .retain(|p| !(&p.prefix == prefix && &p.name == name));
        self.properties.len() != before
    }
}

use std::borrow::Cow;
use std::fmt::Write as _;

use serde::Serialize;

use crate::handle::ResourceId;

/// One named, typed entry in a structured dump.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredObject {
    pub name: &'static str,
    pub type_name: Cow<'static, str>,
    /// Kept for stream shape only, not shown to users.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    pub data: StructuredData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StructuredData {
    Null,
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum { value: i64, name: String },
    /// `flags` is the declared flags type; the entry's `type_name` carries
    /// the bits enum used to render `bits`.
    Bitmask {
        value: u64,
        flags: &'static str,
        bits: String,
    },
    Resource(ResourceId),
    Struct(Vec<StructuredObject>),
    Array(Vec<StructuredObject>),
}

impl StructuredObject {
    pub fn new(name: &'static str, type_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name,
            type_name: type_name.into(),
            hidden: false,
            data: StructuredData::Struct(Vec::new()),
        }
    }

    pub fn children(&self) -> &[StructuredObject] {
        match &self.data {
            StructuredData::Struct(children) | StructuredData::Array(children) => children,
            _ => &[],
        }
    }

    pub(crate) fn push_child(&mut self, child: StructuredObject) {
        if let StructuredData::Struct(children) | StructuredData::Array(children) = &mut self.data {
            children.push(child);
        }
    }

    pub(crate) fn last_child_mut(&mut self) -> Option<&mut StructuredObject> {
        match &mut self.data {
            StructuredData::Struct(children) | StructuredData::Array(children) => children.last_mut(),
            _ => None,
        }
    }

    /// First child called `name`.
    pub fn child(&self, name: &str) -> Option<&StructuredObject> {
        self.children().iter().find(|c| c.name == name)
    }

    /// Follow a sequence of child names, e.g. `["pNext", "srcAccessMask"]`.
    pub fn path(&self, path: &[&str]) -> Option<&StructuredObject> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }

    pub fn visible_children(&self) -> impl Iterator<Item = &StructuredObject> {
        self.children().iter().filter(|c| !c.hidden)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.data, StructuredData::Null)
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        match self.data {
            StructuredData::Unsigned(v) => Some(v),
            StructuredData::Bitmask { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self.data {
            StructuredData::Signed(v) => Some(v),
            StructuredData::Enum { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn as_resource(&self) -> Option<ResourceId> {
        match self.data {
            StructuredData::Resource(id) => Some(id),
            _ => None,
        }
    }

    /// Indented text rendering as a viewer would show it. Hidden entries
    /// are left out.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let value = match &self.data {
            StructuredData::Null => Some("NULL".to_string()),
            StructuredData::Bool(v) => Some(v.to_string()),
            StructuredData::Unsigned(v) => Some(v.to_string()),
            StructuredData::Signed(v) => Some(v.to_string()),
            StructuredData::Float(v) => Some(v.to_string()),
            StructuredData::String(v) => Some(format!("{v:?}")),
            StructuredData::Bytes(v) => Some(format!("<{} bytes>", v.len())),
            StructuredData::Enum { name, .. } => Some(name.clone()),
            StructuredData::Bitmask { bits, .. } => Some(bits.clone()),
            StructuredData::Resource(id) => Some(id.to_string()),
            StructuredData::Array(c) => Some(format!("[{}]", c.len())),
            StructuredData::Struct(_) => None,
        };
        let _ = match value {
            Some(value) => writeln!(out, "{indent}{} {} = {value}", self.type_name, self.name),
            None => writeln!(out, "{indent}{} {}", self.type_name, self.name),
        };
        for child in self.visible_children() {
            child.render_into(out, depth + 1);
        }
    }
}

/// Export a structured dump as pretty-printed JSON.
pub fn to_json(objects: &[StructuredObject]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(objects)
}

//! In-memory configuration nodes
//!
//! An [`HstNode`] is a read-only view of one node of the content tree: a
//! type tag, a name, a stable identifier, typed properties and ordered
//! children. Documents are deserialized straight into this shape:
//!
//! ```yaml
//! name: home
//! type: hst:component
//! properties:
//!   hst:referencecomponent: hst:abstractpages/base
//!   hst:parameternames: [title]
//!   hst:parametervalues: [Welcome]
//! children:
//!   - name: main
//!     type: hst:containercomponent
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::NodeType;
use crate::path::NodePath;
use crate::{Error, Result};

/// A single property value.
///
/// Dates are stored as RFC 3339 strings and parsed on access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    String(String),
    Strings(Vec<String>),
    Bools(Vec<bool>),
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::Strings(value)
    }
}

impl From<Vec<&str>> for PropertyValue {
    fn from(value: Vec<&str>) -> Self {
        Self::Strings(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<bool>> for PropertyValue {
    fn from(value: Vec<bool>) -> Self {
        Self::Bools(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::String(value.to_rfc3339())
    }
}

/// A configuration node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HstNode {
    name: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default = "Uuid::new_v4")]
    identifier: Uuid,
    #[serde(skip)]
    path: NodePath,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    properties: BTreeMap<String, PropertyValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<HstNode>,
}

impl HstNode {
    /// Create a detached node living directly below the root.
    pub fn new(name: impl Into<String>, node_type: impl AsRef<str>) -> Self {
        let name = name.into();
        Self {
            path: NodePath::root().join(&name),
            name,
            node_type: node_type.as_ref().to_string(),
            identifier: Uuid::new_v4(),
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Builder-style child append; the child subtree is re-pathed below this node.
    pub fn with_child(mut self, child: HstNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn with_identifier(mut self, identifier: Uuid) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn add_child(&mut self, mut child: HstNode) {
        child.rebase(&self.path);
        self.children.push(child);
    }

    /// Re-anchor this subtree below `parent`, recomputing every path.
    pub fn rebase(&mut self, parent: &NodePath) {
        self.path = parent.join(&self.name);
        let path = self.path.clone();
        for child in &mut self.children {
            child.rebase(&path);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw type tag.
    pub fn type_tag(&self) -> &str {
        &self.node_type
    }

    /// The type tag parsed into a known [`NodeType`], if it is one.
    pub fn node_type(&self) -> Option<NodeType> {
        self.node_type.parse().ok()
    }

    pub fn is_type(&self, node_type: NodeType) -> bool {
        self.node_type == node_type.as_str()
    }

    pub fn identifier(&self) -> Uuid {
        self.identifier
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn string_property(&self, name: &str) -> Option<&str> {
        match self.properties.get(name) {
            Some(PropertyValue::String(value)) => Some(value),
            _ => None,
        }
    }

    pub fn boolean_property(&self, name: &str) -> Option<bool> {
        match self.properties.get(name) {
            Some(PropertyValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Get a boolean property, or `default` when absent.
    pub fn boolean_or(&self, name: &str, default: bool) -> bool {
        self.boolean_property(name).unwrap_or(default)
    }

    pub fn strings_property(&self, name: &str) -> Option<&[String]> {
        match self.properties.get(name) {
            Some(PropertyValue::Strings(values)) => Some(values),
            _ => None,
        }
    }

    pub fn booleans_property(&self, name: &str) -> Option<&[bool]> {
        match self.properties.get(name) {
            Some(PropertyValue::Bools(values)) => Some(values),
            Some(PropertyValue::Strings(values)) if values.is_empty() => Some(&[]),
            _ => None,
        }
    }

    /// Parse a date property stored as an RFC 3339 string.
    pub fn date_property(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let Some(raw) = self.string_property(name) else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(raw)
            .map(|d| Some(d.with_timezone(&Utc)))
            .map_err(|e| Error::InvalidProperty {
                path: self.path.to_string(),
                property: name.to_string(),
                message: e.to_string(),
            })
    }

    /// Get a string property that must be present.
    pub fn required_string(&self, name: &str) -> Result<&str> {
        self.string_property(name).ok_or_else(|| Error::MissingProperty {
            path: self.path.to_string(),
            property: name.to_string(),
        })
    }

    pub fn children(&self) -> &[HstNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&HstNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Resolve a slash-separated relative path below this node.
    pub fn descendant(&self, relative: &str) -> Option<&HstNode> {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn children_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &HstNode> {
        self.children.iter().filter(move |c| c.is_type(node_type))
    }

    /// First child with the given name and type.
    pub fn section(&self, node_type: NodeType) -> Option<&HstNode> {
        self.children_of_type(node_type).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HstNode {
        HstNode::new("demo", NodeType::Configuration).with_child(
            HstNode::new("hst:pages", NodeType::Pages).with_child(
                HstNode::new("home", NodeType::Component)
                    .with_property("hst:async", true)
                    .with_property("hst:template", "home.ftl")
                    .with_property("hst:parameternames", vec!["a", "b"]),
            ),
        )
    }

    #[test]
    fn test_paths_follow_tree_position() {
        let root = sample();
        let home = root.descendant("hst:pages/home").unwrap();
        assert_eq!(home.path().as_str(), "/demo/hst:pages/home");
    }

    #[test]
    fn test_typed_accessors() {
        let root = sample();
        let home = root.descendant("hst:pages/home").unwrap();
        assert_eq!(home.boolean_property("hst:async"), Some(true));
        assert_eq!(home.string_property("hst:template"), Some("home.ftl"));
        assert_eq!(home.strings_property("hst:parameternames").unwrap().len(), 2);
        assert_eq!(home.string_property("hst:async"), None);
        assert!(home.boolean_or("hst:cacheable", true));
    }

    #[test]
    fn test_date_property() {
        let node = HstNode::new("c", NodeType::Component)
            .with_property("hst:lockedon", "2024-03-01T10:00:00Z")
            .with_property("hst:lastmodified", "yesterday");
        let date = node.date_property("hst:lockedon").unwrap().unwrap();
        assert_eq!(date.to_rfc3339(), "2024-03-01T10:00:00+00:00");
        assert!(node.date_property("hst:lastmodified").is_err());
        assert!(node.date_property("missing").unwrap().is_none());
    }

    #[test]
    fn test_required_string_reports_path() {
        let node = HstNode::new("c", NodeType::Template);
        let err = node.required_string("hst:renderpath").unwrap_err();
        assert!(err.to_string().contains("/c"));
    }

    #[test]
    fn test_node_type_parsing() {
        let node = HstNode::new("x", "nt:unstructured");
        assert_eq!(node.node_type(), None);
        assert_eq!(sample().node_type(), Some(NodeType::Configuration));
    }
}

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

/// Type tag of a leaf value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Bool,
    Null,
}

/// Scalar carried by a leaf. Non-integer numbers are kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Int(i64),
    Bool(bool),
    Null,
}

impl Scalar {
    pub fn value_type(&self) -> ValueType {
        match self {
            Scalar::String(_) => ValueType::String,
            Scalar::Int(_) => ValueType::Int,
            Scalar::Bool(_) => ValueType::Bool,
            Scalar::Null => ValueType::Null,
        }
    }

    /// Textual form as it would typically appear in a source file
    pub fn render(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null => "null".to_string(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::String(s) => serde_json::Value::String(s.clone()),
            Scalar::Int(i) => serde_json::Value::from(*i),
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Null => serde_json::Value::Null,
        }
    }
}

/// A node of the unified tree.
///
/// Leaves carry a `value`; containers carry `children` in source order.
/// List elements have no key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnifiedNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Scalar>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<UnifiedNode>,
    /// Source line (1-indexed)
    pub line: usize,
}

impl UnifiedNode {
    pub fn leaf(key: Option<String>, value: Scalar, line: usize) -> Self {
        Self {
            key,
            value: Some(value),
            children: Vec::new(),
            line,
        }
    }

    pub fn container(key: Option<String>, children: Vec<UnifiedNode>, line: usize) -> Self {
        Self {
            key,
            value: None,
            children,
            line,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    pub fn value_type(&self) -> Option<ValueType> {
        self.value.as_ref().map(Scalar::value_type)
    }

    /// Whether children are keyless list elements
    #[must_use]
    pub fn is_list(&self) -> bool {
        !self.children.is_empty() && self.children.iter().all(|c| c.key.is_none())
    }

    /// Find a child by key
    pub fn child(&self, key: &str) -> Option<&UnifiedNode> {
        self.children
            .iter()
            .find(|c| c.key.as_deref() == Some(key))
    }

    /// Total number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Number of leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Self::leaf_count).sum()
        }
    }

    /// Render the subtree as plain JSON values
    pub fn to_json(&self) -> serde_json::Value {
        if let Some(value) = &self.value {
            return value.to_json();
        }
        if self.is_list() {
            return serde_json::Value::Array(self.children.iter().map(Self::to_json).collect());
        }
        let mut map = serde_json::Map::new();
        for (idx, child) in self.children.iter().enumerate() {
            let key = child.key.clone().unwrap_or_else(|| format!("[{idx}]"));
            map.insert(key, child.to_json());
        }
        serde_json::Value::Object(map)
    }

    /// Visit every non-root node with its path in pre-order
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&str, &'a UnifiedNode)) {
        for (idx, child) in self.children.iter().enumerate() {
            let path = child_path("", child.key.as_deref(), idx);
            child.walk_at(&path, visit);
        }
    }

    fn walk_at<'a>(&'a self, path: &str, visit: &mut dyn FnMut(&str, &'a UnifiedNode)) {
        visit(path, self);
        for (idx, child) in self.children.iter().enumerate() {
            let nested = child_path(path, child.key.as_deref(), idx);
            child.walk_at(&nested, visit);
        }
    }
}

/// Build the path of a child from its parent's path
pub fn child_path(parent: &str, key: Option<&str>, index: usize) -> String {
    match key {
        None => format!("{parent}[{index}]"),
        Some(key) if key.is_empty() || key.contains(['.', '[', ']']) => {
            format!("{parent}[\"{}\"]", key.replace('"', "\\\""))
        }
        Some(key) if parent.is_empty() => key.to_string(),
        Some(key) => format!("{parent}.{key}"),
    }
}

/// Path to source-line index with unique, insertion-ordered keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMap {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl LineMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for every non-root node of a tree
    pub fn from_tree(root: &UnifiedNode) -> Self {
        let mut map = Self::new();
        root.walk(&mut |path, node| {
            map.insert(path.to_string(), node.line);
        });
        map
    }

    /// Insert an entry; returns false if the path was already present
    pub fn insert(&mut self, path: String, line: usize) -> bool {
        if self.index.contains_key(&path) {
            return false;
        }
        self.index.insert(path.clone(), self.entries.len());
        self.entries.push((path, line));
        true
    }

    pub fn get(&self, path: &str) -> Option<usize> {
        self.index.get(path).map(|&idx| self.entries[idx].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(path, line)| (path.as_str(), *line))
    }
}

impl Serialize for LineMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (path, line) in &self.entries {
            map.serialize_entry(path, line)?;
        }
        map.end()
    }
}

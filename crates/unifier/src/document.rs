use crate::error::{Result, UnifyError};
use crate::format::FormatTag;
use crate::input::line_count;
use crate::node::{child_path, LineMap, UnifiedNode, ValueType};
use crate::strategy::{strategy_for, TextStrategy};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Format-independent representation of one configuration file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedDocument {
    /// Format the document was detected as
    pub format: FormatTag,
    /// True when structured parsing failed and the text fallback was used
    pub degraded: bool,
    pub line_count: usize,
    pub root: UnifiedNode,
    pub line_map: LineMap,
}

impl UnifiedDocument {
    fn new(format: FormatTag, degraded: bool, text: &str, mut root: UnifiedNode) -> Self {
        let line_count = line_count(text);
        clamp_lines(&mut root, line_count.max(1));
        let line_map = LineMap::from_tree(&root);
        Self {
            format,
            degraded,
            line_count,
            root,
            line_map,
        }
    }

    /// Format the tree was actually built with
    pub fn parsed_as(&self) -> FormatTag {
        if self.degraded {
            FormatTag::Text
        } else {
            self.format
        }
    }

    /// Keys (or list indexes) of the root's children
    pub fn root_keys(&self) -> Vec<String> {
        self.root
            .children
            .iter()
            .enumerate()
            .map(|(idx, child)| child_path("", child.key.as_deref(), idx))
            .collect()
    }
}

fn clamp_lines(node: &mut UnifiedNode, max_line: usize) {
    node.line = node.line.clamp(1, max_line);
    for child in &mut node.children {
        clamp_lines(child, max_line);
    }
}

/// Parse `text` as `format` into a unified document
pub fn unify(text: &str, format: FormatTag) -> Result<UnifiedDocument> {
    let root = strategy_for(format).unify(text)?;
    Ok(UnifiedDocument::new(format, false, text, root))
}

/// Like [`unify`], but a parse failure degrades to the opaque text form.
///
/// The returned error, if any, is the non-fatal parse diagnostic.
pub fn unify_or_fallback(text: &str, format: FormatTag) -> (UnifiedDocument, Option<UnifyError>) {
    match unify(text, format) {
        Ok(document) => (document, None),
        Err(err) => {
            log::warn!("Unification as {format} failed, using text fallback: {err}");
            let root = TextStrategy::wrap(text);
            (UnifiedDocument::new(format, true, text, root), Some(err))
        }
    }
}

#[derive(Serialize)]
struct DocumentView<'a> {
    metadata: DocumentMetadata,
    config: serde_json::Value,
    hierarchy: Hierarchy,
    line_mapping: &'a LineMap,
}

#[derive(Serialize)]
struct DocumentMetadata {
    original_format: FormatTag,
    parsed_as: FormatTag,
    degraded: bool,
    line_count: usize,
    root_keys: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    root_element: Option<String>,
}

#[derive(Serialize)]
struct HierarchyEntry {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value_type: Option<ValueType>,
    line: usize,
    children: Vec<String>,
}

struct Hierarchy(Vec<(String, HierarchyEntry)>);

impl Hierarchy {
    fn from_tree(root: &UnifiedNode) -> Self {
        let mut entries = Vec::new();
        root.walk(&mut |path, node| {
            let children = node
                .children
                .iter()
                .enumerate()
                .map(|(idx, child)| child_path(path, child.key.as_deref(), idx))
                .collect();
            entries.push((
                path.to_string(),
                HierarchyEntry {
                    kind: if node.is_leaf() { "leaf" } else { "container" },
                    value_type: node.value_type(),
                    line: node.line,
                    children,
                },
            ));
        });
        Self(entries)
    }
}

impl Serialize for Hierarchy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, entry) in &self.0 {
            map.serialize_entry(path, entry)?;
        }
        map.end()
    }
}

impl Serialize for UnifiedDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let root_element = (self.parsed_as() == FormatTag::Xml)
            .then(|| self.root.children.first().and_then(|c| c.key.clone()))
            .flatten();
        DocumentView {
            metadata: DocumentMetadata {
                original_format: self.format,
                parsed_as: self.parsed_as(),
                degraded: self.degraded,
                line_count: self.line_count,
                root_keys: self.root_keys(),
                root_element,
            },
            config: self.root.to_json(),
            hierarchy: Hierarchy::from_tree(&self.root),
            line_mapping: &self.line_map,
        }
        .serialize(serializer)
    }
}

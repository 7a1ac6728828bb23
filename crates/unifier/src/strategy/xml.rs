use super::UnifyStrategy;
use crate::error::{Result, UnifyError};
use crate::format::FormatTag;
use crate::node::{Scalar, UnifiedNode};
use roxmltree::{Document, Node, ParsingOptions};

/// XML strategy; line numbers come straight from parser byte positions
pub struct XmlStrategy;

impl UnifyStrategy for XmlStrategy {
    fn format(&self) -> FormatTag {
        FormatTag::Xml
    }

    fn unify(&self, text: &str) -> Result<UnifiedNode> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options)
            .map_err(|e| UnifyError::parse(FormatTag::Xml, e.to_string()))?;
        let root = doc.root_element();
        let child = element(&doc, root, Some(root.tag_name().name().to_string()));
        Ok(UnifiedNode::container(None, vec![child], 1))
    }
}

fn line_at(doc: &Document<'_>, pos: usize) -> usize {
    doc.text_pos_at(pos).row as usize
}

fn element(doc: &Document<'_>, node: Node<'_, '_>, key: Option<String>) -> UnifiedNode {
    let line = line_at(doc, node.range().start);

    let mut groups: Vec<(&str, Vec<Node<'_, '_>>)> = Vec::new();
    for child in node.children().filter(Node::is_element) {
        let name = child.tag_name().name();
        match groups.iter_mut().find(|(tag, _)| *tag == name) {
            Some((_, members)) => members.push(child),
            None => groups.push((name, vec![child])),
        }
    }

    let text_nodes: Vec<_> = node
        .children()
        .filter(|c| c.is_text() && c.text().is_some_and(|t| !t.trim().is_empty()))
        .collect();
    let text: String = text_nodes
        .iter()
        .filter_map(|c| c.text())
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");

    if groups.is_empty() && node.attributes().next().is_none() {
        let value = if text.is_empty() {
            Scalar::Null
        } else {
            Scalar::String(text)
        };
        return UnifiedNode::leaf(key, value, line);
    }

    let mut children: Vec<UnifiedNode> = node
        .attributes()
        .map(|attr| {
            UnifiedNode::leaf(
                Some(format!("@{}", attr.name())),
                Scalar::String(attr.value().to_string()),
                line,
            )
        })
        .collect();

    for (tag, members) in groups {
        if let [single] = members.as_slice() {
            children.push(element(doc, *single, Some(tag.to_string())));
        } else {
            let items: Vec<_> = members.iter().map(|m| element(doc, *m, None)).collect();
            let group_line = items.first().map_or(line, |item| item.line);
            children.push(UnifiedNode::container(Some(tag.to_string()), items, group_line));
        }
    }

    if let Some(first) = text_nodes.first() {
        let raw = first.text().unwrap_or_default();
        let lead = raw.len() - raw.trim_start().len();
        children.push(UnifiedNode::leaf(
            Some("#text".to_string()),
            Scalar::String(text),
            line_at(doc, first.range().start + lead),
        ));
    }

    children.sort_by_key(|child| child.line);
    UnifiedNode::container(key, children, line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LineMap;
    use pretty_assertions::assert_eq;

    const NRF_XML: &str = r#"<?xml version="1.0"?>
<nrf id="nrf01">
  <plmn>46001</plmn>
  <service name="nudm"/>
  <service name="namf">
    <port>8080</port>
  </service>
  <empty/>
</nrf>
"#;

    #[test]
    fn maps_attributes_groups_and_lines() {
        let root = XmlStrategy.unify(NRF_XML).unwrap();
        let map = LineMap::from_tree(&root);
        assert_eq!(map.get("nrf"), Some(2));
        assert_eq!(map.get("nrf.@id"), Some(2));
        assert_eq!(map.get("nrf.plmn"), Some(3));
        assert_eq!(map.get("nrf.service"), Some(4));
        assert_eq!(map.get("nrf.service[0].@name"), Some(4));
        assert_eq!(map.get("nrf.service[1].port"), Some(6));
        assert_eq!(map.get("nrf.empty"), Some(8));

        let nrf = root.child("nrf").unwrap();
        assert_eq!(
            nrf.child("plmn").unwrap().value,
            Some(Scalar::String("46001".into()))
        );
        assert_eq!(nrf.child("empty").unwrap().value, Some(Scalar::Null));
    }

    #[test]
    fn mixed_text_becomes_text_leaf() {
        let root = XmlStrategy.unify("<a>\n  hello\n  <b>1</b>\n</a>").unwrap();
        let map = LineMap::from_tree(&root);
        assert_eq!(map.get("a.#text"), Some(2));
        assert_eq!(map.get("a.b"), Some(3));
    }

    #[test]
    fn unclosed_tags_are_parse_errors() {
        let err = XmlStrategy.unify("<config><amf>\n</config>").unwrap_err();
        assert!(matches!(err, UnifyError::Parse { format: FormatTag::Xml, .. }));
    }
}

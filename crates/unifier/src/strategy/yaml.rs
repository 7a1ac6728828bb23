use super::{wrap_scalar_root, UnifyStrategy};
use crate::error::{Result, UnifyError};
use crate::format::FormatTag;
use crate::locate::{value_text, yaml_key, LineLocator};
use crate::node::{Scalar, UnifiedNode};
use serde::Deserialize;
use serde_yaml::Value;

pub struct YamlStrategy;

impl UnifyStrategy for YamlStrategy {
    fn format(&self) -> FormatTag {
        FormatTag::Yaml
    }

    fn unify(&self, text: &str) -> Result<UnifiedNode> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document)
                .map_err(|e| UnifyError::parse(FormatTag::Yaml, e.to_string()))?;
            documents.push(value);
        }

        let mut locator = LineLocator::new(text);
        let root = match documents.as_slice() {
            [] => UnifiedNode::container(None, Vec::new(), 1),
            [single] => {
                let node = build(None, single, &mut locator);
                if node.is_leaf() {
                    wrap_scalar_root(node)
                } else {
                    UnifiedNode { line: 1, ..node }
                }
            }
            many => {
                log::debug!("YAML stream holds {} documents", many.len());
                let children = many.iter().map(|doc| build(None, doc, &mut locator)).collect();
                UnifiedNode::container(None, children, 1)
            }
        };
        Ok(root)
    }
}

fn build(key: Option<String>, value: &Value, locator: &mut LineLocator<'_>) -> UnifiedNode {
    let key_line = key
        .as_deref()
        .map(|k| locator.find(|slice| yaml_key(slice, k)));

    match value {
        Value::Tagged(tagged) => build(key, &tagged.value, locator),
        Value::Mapping(map) => {
            let children: Vec<_> = map
                .iter()
                .map(|(k, v)| build(Some(key_text(k)), v, locator))
                .collect();
            let line = key_line.unwrap_or_else(|| first_line(&children, locator));
            UnifiedNode::container(key, children, line)
        }
        Value::Sequence(items) => {
            let children: Vec<_> = items.iter().map(|v| build(None, v, locator)).collect();
            let line = key_line.unwrap_or_else(|| first_line(&children, locator));
            UnifiedNode::container(key, children, line)
        }
        scalar => {
            let value = to_scalar(scalar);
            let line = key_line.unwrap_or_else(|| {
                let rendered = value.render();
                locator.find(|slice| value_text(slice, &rendered))
            });
            UnifiedNode::leaf(key, value, line)
        }
    }
}

fn first_line(children: &[UnifiedNode], locator: &LineLocator<'_>) -> usize {
    children
        .first()
        .map_or_else(|| locator.current(), |child| child.line)
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn to_scalar(value: &Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| Scalar::String(n.to_string()), Scalar::Int),
        Value::String(s) => Scalar::String(s.clone()),
        other => Scalar::String(key_text(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::LineMap;
    use pretty_assertions::assert_eq;

    const SMF_YAML: &str = "\
smf:
  name: smf01
  sessions: 20000
  dnn:
    - name: internet
    - name: ims
  slice:
    smf: nested
debug: false
";

    #[test]
    fn attributes_lines_to_keys() {
        let root = YamlStrategy.unify(SMF_YAML).unwrap();
        let map = LineMap::from_tree(&root);
        assert_eq!(map.get("smf"), Some(1));
        assert_eq!(map.get("smf.sessions"), Some(3));
        assert_eq!(map.get("smf.dnn[0].name"), Some(5));
        assert_eq!(map.get("smf.dnn[1].name"), Some(6));
        assert_eq!(map.get("smf.dnn[1]"), Some(6));
        assert_eq!(map.get("smf.slice.smf"), Some(8));
        assert_eq!(map.get("debug"), Some(9));
        assert_eq!(
            root.child("smf").unwrap().child("sessions").unwrap().value,
            Some(Scalar::Int(20000))
        );
    }

    #[test]
    fn multi_document_streams_become_a_list() {
        let root = YamlStrategy.unify("a: 1\n---\nb: 2\n").unwrap();
        assert!(root.is_list());
        let map = LineMap::from_tree(&root);
        assert_eq!(map.get("[0].a"), Some(1));
        assert_eq!(map.get("[1].b"), Some(3));
    }

    #[test]
    fn reports_syntax_errors() {
        let err = YamlStrategy.unify("a: [1, 2\nb: }").unwrap_err();
        assert!(matches!(err, UnifyError::Parse { format: FormatTag::Yaml, .. }));
    }
}

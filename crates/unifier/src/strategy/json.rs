use super::{wrap_scalar_root, UnifyStrategy};
use crate::error::{Result, UnifyError};
use crate::format::FormatTag;
use crate::locate::{json_key, value_text, LineLocator};
use crate::node::{Scalar, UnifiedNode};
use serde_json::Value;

pub struct JsonStrategy;

impl UnifyStrategy for JsonStrategy {
    fn format(&self) -> FormatTag {
        FormatTag::Json
    }

    fn unify(&self, text: &str) -> Result<UnifiedNode> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| UnifyError::parse(FormatTag::Json, e.to_string()))?;
        let mut locator = LineLocator::new(text);
        let node = build(None, &value, &mut locator);
        Ok(if node.is_leaf() {
            wrap_scalar_root(node)
        } else {
            UnifiedNode { line: 1, ..node }
        })
    }
}

fn build(key: Option<String>, value: &Value, locator: &mut LineLocator<'_>) -> UnifiedNode {
    let key_line = key
        .as_deref()
        .map(|k| locator.find(|slice| json_key(slice, k)));

    match value {
        Value::Object(map) => {
            let children: Vec<_> = map
                .iter()
                .map(|(k, v)| build(Some(k.clone()), v, locator))
                .collect();
            let line = key_line.unwrap_or_else(|| first_line(&children, locator));
            UnifiedNode::container(key, children, line)
        }
        Value::Array(items) => {
            let children: Vec<_> = items.iter().map(|v| build(None, v, locator)).collect();
            let line = key_line.unwrap_or_else(|| first_line(&children, locator));
            UnifiedNode::container(key, children, line)
        }
        scalar => {
            let line = key_line.unwrap_or_else(|| {
                let rendered = scalar.to_string();
                locator.find(|slice| value_text(slice, &rendered))
            });
            UnifiedNode::leaf(key, to_scalar(scalar), line)
        }
    }
}

fn first_line(children: &[UnifiedNode], locator: &LineLocator<'_>) -> usize {
    children
        .first()
        .map_or_else(|| locator.current(), |child| child.line)
}

fn to_scalar(value: &Value) -> Scalar {
    match value {
        Value::Null => Scalar::Null,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => n
            .as_i64()
            .map_or_else(|| Scalar::String(n.to_string()), Scalar::Int),
        Value::String(s) => Scalar::String(s.clone()),
        other => Scalar::String(other.to_string()),
    }
}

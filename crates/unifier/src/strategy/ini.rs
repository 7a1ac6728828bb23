use super::UnifyStrategy;
use crate::error::{Result, UnifyError};
use crate::format::{is_ini_header, FormatTag};
use crate::node::{Scalar, UnifiedNode};
use std::collections::HashSet;

/// INI parser with exact line attribution
pub struct IniStrategy;

struct Section {
    node: UnifiedNode,
    keys: HashSet<String>,
}

impl UnifyStrategy for IniStrategy {
    fn format(&self) -> FormatTag {
        FormatTag::Ini
    }

    fn unify(&self, text: &str) -> Result<UnifiedNode> {
        let mut top: Vec<UnifiedNode> = Vec::new();
        let mut top_names: HashSet<String> = HashSet::new();
        let mut current: Option<Section> = None;
        let mut in_entry = false;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                in_entry = false;
                continue;
            }

            if in_entry && raw.starts_with([' ', '\t']) {
                let children = match current.as_mut() {
                    Some(section) => &mut section.node.children,
                    None => &mut top,
                };
                if let Some(Scalar::String(value)) =
                    children.last_mut().and_then(|leaf| leaf.value.as_mut())
                {
                    value.push('\n');
                    value.push_str(trimmed);
                }
                continue;
            }

            if is_ini_header(trimmed) {
                let name = trimmed[1..trimmed.len() - 1].trim().to_string();
                if !top_names.insert(name.clone()) {
                    return Err(UnifyError::parse(
                        FormatTag::Ini,
                        format!("line {line_no}: duplicate section or key `{name}`"),
                    ));
                }
                if let Some(section) = current.take() {
                    top.push(section.node);
                }
                current = Some(Section {
                    node: UnifiedNode::container(Some(name), Vec::new(), line_no),
                    keys: HashSet::new(),
                });
                in_entry = false;
                continue;
            }

            let Some((key, value)) = split_entry(trimmed) else {
                return Err(UnifyError::parse(
                    FormatTag::Ini,
                    format!("line {line_no}: expected `key = value`, found `{trimmed}`"),
                ));
            };
            let (keys, children) = match current.as_mut() {
                Some(section) => (&mut section.keys, &mut section.node.children),
                None => (&mut top_names, &mut top),
            };
            if !keys.insert(key.to_string()) {
                return Err(UnifyError::parse(
                    FormatTag::Ini,
                    format!("line {line_no}: duplicate key `{key}`"),
                ));
            }
            children.push(UnifiedNode::leaf(
                Some(key.to_string()),
                Scalar::String(value.to_string()),
                line_no,
            ));
            in_entry = true;
        }

        if let Some(section) = current.take() {
            top.push(section.node);
        }
        Ok(UnifiedNode::container(None, top, 1))
    }
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(['=', ':'])?;
    let key = line[..idx].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[idx + 1..].trim()))
}

use super::UnifyStrategy;
use crate::error::Result;
use crate::format::FormatTag;
use crate::node::{Scalar, UnifiedNode};

/// Opaque fallback: the whole text as one leaf
pub struct TextStrategy;

impl TextStrategy {
    pub fn wrap(text: &str) -> UnifiedNode {
        let content = UnifiedNode::leaf(
            Some("content".to_string()),
            Scalar::String(text.to_string()),
            1,
        );
        UnifiedNode::container(None, vec![content], 1)
    }
}

impl UnifyStrategy for TextStrategy {
    fn format(&self) -> FormatTag {
        FormatTag::Text
    }

    fn unify(&self, text: &str) -> Result<UnifiedNode> {
        Ok(Self::wrap(text))
    }
}

//! One unification strategy per format, dispatched on [`FormatTag`].

mod ini;
mod json;
mod text;
mod xml;
mod yaml;

use crate::error::Result;
use crate::format::FormatTag;
use crate::node::UnifiedNode;

pub use ini::IniStrategy;
pub use json::JsonStrategy;
pub use text::TextStrategy;
pub use xml::XmlStrategy;
pub use yaml::YamlStrategy;

/// Parses text of one format into a keyless root container
pub trait UnifyStrategy: Send + Sync {
    fn format(&self) -> FormatTag;

    fn unify(&self, text: &str) -> Result<UnifiedNode>;
}

/// Strategy implementing the given format
pub fn strategy_for(format: FormatTag) -> &'static dyn UnifyStrategy {
    match format {
        FormatTag::Xml => &XmlStrategy,
        FormatTag::Json => &JsonStrategy,
        FormatTag::Yaml => &YamlStrategy,
        FormatTag::Ini => &IniStrategy,
        FormatTag::Text => &TextStrategy,
    }
}

/// Root wrapper for documents whose top level is a bare scalar
pub(crate) fn wrap_scalar_root(leaf: UnifiedNode) -> UnifiedNode {
    let line = leaf.line;
    let leaf = UnifiedNode {
        key: Some("value".to_string()),
        ..leaf
    };
    UnifiedNode::container(None, vec![leaf], line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_is_exhaustive() {
        for format in [
            FormatTag::Xml,
            FormatTag::Json,
            FormatTag::Yaml,
            FormatTag::Ini,
            FormatTag::Text,
        ] {
            assert_eq!(strategy_for(format).format(), format);
        }
    }
}

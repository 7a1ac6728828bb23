use crate::error::{DesensitizeError, Result};
use crate::strategy::MaskStrategy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../patterns/builtin.toml");

/// One catalog entry as written in TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDef {
    /// Category name, e.g. `ip_addresses`
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Regular expression (mutually exclusive with `keywords`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Literal keywords (mutually exclusive with `pattern`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Match keywords case-insensitively
    #[serde(default)]
    pub case_insensitive: bool,

    pub strategy: MaskStrategy,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    patterns: Vec<PatternDef>,
}

/// A compiled, immutable catalog entry
#[derive(Debug, Clone)]
pub struct SensitivePattern {
    name: String,
    description: Option<String>,
    regex: Regex,
    strategy: MaskStrategy,
}

impl SensitivePattern {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn strategy(&self) -> &MaskStrategy {
        &self.strategy
    }

    fn compile(def: PatternDef) -> Result<Self> {
        let source = match (def.pattern.as_deref(), def.keywords.is_empty()) {
            (Some(_), false) => {
                return Err(DesensitizeError::invalid(
                    &def.name,
                    "set either `pattern` or `keywords`, not both",
                ))
            }
            (None, true) => {
                return Err(DesensitizeError::invalid(
                    &def.name,
                    "one of `pattern` or `keywords` is required",
                ))
            }
            (Some(pattern), true) => pattern.to_string(),
            (None, false) => keyword_pattern(&def.keywords, def.case_insensitive),
        };

        let regex = Regex::new(&source).map_err(|source| DesensitizeError::PatternCompilation {
            name: def.name.clone(),
            source,
        })?;

        validate_strategy(&def.name, &def.strategy, &regex)?;

        Ok(Self {
            name: def.name,
            description: def.description,
            regex,
            strategy: def.strategy,
        })
    }
}

fn keyword_pattern(keywords: &[String], case_insensitive: bool) -> String {
    let mut sorted: Vec<&String> = keywords.iter().filter(|k| !k.is_empty()).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = sorted
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    if case_insensitive {
        format!("(?i)(?:{alternation})")
    } else {
        format!("(?:{alternation})")
    }
}

fn validate_strategy(name: &str, strategy: &MaskStrategy, regex: &Regex) -> Result<()> {
    if strategy.literals().iter().any(|lit| lit.contains(['\n', '\r'])) {
        return Err(DesensitizeError::invalid(
            name,
            "mask text must not contain line breaks",
        ));
    }
    match strategy {
        MaskStrategy::KeyValue { .. } if regex.captures_len() < 2 => Err(
            DesensitizeError::invalid(name, "key_value needs a capture group for the key"),
        ),
        MaskStrategy::Segment { separator, .. } if separator.is_empty() => {
            Err(DesensitizeError::invalid(name, "segment separator is empty"))
        }
        MaskStrategy::Hashed { label: text } | MaskStrategy::Sequential { prefix: text }
            if text.is_empty() =>
        {
            Err(DesensitizeError::invalid(name, "label/prefix is empty"))
        }
        _ => Ok(()),
    }
}

/// Ordered list of sensitive-value patterns.
///
/// Order is priority: earlier entries claim text first. Built once, then
/// shared read-only across invocations.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    patterns: Vec<SensitivePattern>,
}

impl PatternCatalog {
    /// Catalog with no patterns; desensitization becomes the identity
    pub fn empty() -> Self {
        Self::default()
    }

    /// Entries of the catalog shipped with the crate
    pub fn builtin_defs() -> Result<Vec<PatternDef>> {
        Self::parse_defs(BUILTIN_CATALOG)
    }

    /// Compile the catalog shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::compile(Self::builtin_defs()?)
    }

    /// Parse `[[patterns]]` entries from a TOML document
    pub fn parse_defs(toml_text: &str) -> Result<Vec<PatternDef>> {
        let file: CatalogFile = toml::from_str(toml_text)?;
        Ok(file.patterns)
    }

    pub fn from_toml_str(toml_text: &str) -> Result<Self> {
        Self::compile(Self::parse_defs(toml_text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Compile entries in the given order
    pub fn compile(defs: Vec<PatternDef>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(defs.len());
        for def in defs {
            if def.name.trim().is_empty() {
                return Err(DesensitizeError::invalid("<unnamed>", "name is empty"));
            }
            if !seen.insert(def.name.clone()) {
                return Err(DesensitizeError::invalid(&def.name, "duplicate category name"));
            }
            patterns.push(SensitivePattern::compile(def)?);
        }
        log::debug!("Compiled {} sensitive patterns", patterns.len());
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[SensitivePattern] {
        &self.patterns
    }

    /// Category names in priority order
    pub fn names(&self) -> Vec<&str> {
        self.patterns.iter().map(SensitivePattern::name).collect()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_order_is_pinned() {
        let catalog = PatternCatalog::builtin().unwrap();
        assert_eq!(
            catalog.names(),
            vec![
                "passwords",
                "imsi",
                "imei",
                "phone_numbers",
                "urls",
                "ip_addresses",
                "customers"
            ]
        );
        let kinds: Vec<_> = catalog
            .patterns()
            .iter()
            .map(|p| p.strategy().kind())
            .collect();
        assert_eq!(
            kinds,
            vec!["key_value", "partial", "partial", "partial", "url", "segment", "sequential"]
        );
    }

    #[test]
    fn keywords_prefer_longest_alternative() {
        let re = Regex::new(&keyword_pattern(
            &["China".into(), "China Mobile".into()],
            false,
        ))
        .unwrap();
        assert_eq!(re.find("China Mobile core").unwrap().as_str(), "China Mobile");
    }

    #[test]
    fn invalid_regex_is_a_compilation_error() {
        let err = PatternCatalog::from_toml_str(
            r#"
[[patterns]]
name = "broken"
pattern = "(unclosed"
strategy = { kind = "full" }
"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DesensitizeError::PatternCompilation { ref name, .. } if name == "broken"
        ));
    }

    #[test]
    fn rejects_structural_mistakes() {
        let both = r#"
[[patterns]]
name = "x"
pattern = "a"
keywords = ["b"]
strategy = { kind = "full" }
"#;
        assert!(matches!(
            PatternCatalog::from_toml_str(both),
            Err(DesensitizeError::InvalidPattern { .. })
        ));

        let no_group = r#"
[[patterns]]
name = "kv"
pattern = "pwd=\\S+"
strategy = { kind = "key_value" }
"#;
        assert!(PatternCatalog::from_toml_str(no_group).is_err());

        let newline_mask = r#"
[[patterns]]
name = "nl"
pattern = "a"
strategy = { kind = "full", mask = "x\ny" }
"#;
        assert!(PatternCatalog::from_toml_str(newline_mask).is_err());

        let dup = r#"
[[patterns]]
name = "a"
pattern = "a"
strategy = { kind = "full" }

[[patterns]]
name = "a"
pattern = "b"
strategy = { kind = "full" }
"#;
        assert!(PatternCatalog::from_toml_str(dup).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.toml");
        std::fs::write(
            &path,
            "[[patterns]]\nname = \"tokens\"\npattern = 'tok_\\w+'\nstrategy = { kind = \"hashed\", label = \"TOKEN\" }\n",
        )
        .unwrap();
        let catalog = PatternCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.names(), vec!["tokens"]);
    }
}

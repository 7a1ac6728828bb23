use crate::catalog::{nf_alternation, FEATURE_GROUPS};
use crate::complexity::assess;
use crate::network::{network_info, NetworkLimits};
use crate::stats::file_statistics;
use crate::tagger::FeatureTagger;
use crate::types::{Metadata, NetworkFunctionStats, ProjectInfo};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

static NF_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})", nf_alternation()))
        .expect("network function regex should compile")
});

static INTERFACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:N1[0-5]|N[1-9]|SBI|Namf|Nsmf|Nudm|Nnrf|Npcf|Nausf|Nchf)\b")
        .expect("interface regex should compile")
});

static IDENTIFIERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("PLMN", r#"(?i)\bPLMN(?:[_-]?id)?["']?(?:\s*[:=]\s*|\s+)["']?(\d{5,6})\b"#),
        ("TAC", r#"(?i)\bTAC["']?\s*[:=]\s*["']?((?:0x)?[0-9A-Fa-f]+)\b"#),
        (
            "DNN",
            r#"(?i)\b(?:DNN|APN)["']?\s*[:=]\s*["']?([A-Za-z0-9][\w.\-]*(?:,[A-Za-z0-9][\w.\-]*)*)"#,
        ),
        ("SST", r#"(?i)\bSST["']?(?:\s*[:=]\s*|\s+)["']?(\d{1,3})\b"#),
    ]
    .into_iter()
    .map(|(name, pattern)| {
        (
            name,
            Regex::new(pattern).expect("identifier regex should compile"),
        )
    })
    .collect()
});

static PROJECT_FIELDS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    ["customer", "site", "region", "project"]
        .into_iter()
        .map(|field| {
            let pattern = format!(r#"(?im)\b{field}(?:[_ ]?name)?["']?\s*[:=]\s*["']?([^"'\r\n]+?)["']?\s*$"#);
            (
                field,
                Regex::new(&pattern).expect("project regex should compile"),
            )
        })
        .collect()
});

static VERSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:version|release|build|revision)\b["']?(?:\s*[:=]\s*|\s+)["']?([^\s,"']+)"#)
        .expect("version regex should compile")
});

static TIMESTAMPS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}",
        r"\d{2}/\d{2}/\d{4}\s+\d{2}:\d{2}:\d{2}",
        r"\d{2}\.\d{2}\.\d{4}\s+\d{2}:\d{2}:\d{2}",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("timestamp regex should compile"))
    .collect()
});

/// Sample limits for the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Distinct instance names kept per network function
    pub max_instance_samples: usize,
    pub max_ip_samples: usize,
    pub max_domains: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            max_instance_samples: 5,
            max_ip_samples: 10,
            max_domains: 20,
        }
    }
}

/// Scans configuration text for 5GC domain entities
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    config: MetadataConfig,
}

impl MetadataExtractor {
    pub fn new(config: MetadataConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetadataConfig {
        &self.config
    }

    /// Extract metadata from `text`. Deterministic and free of side effects.
    pub fn extract(&self, text: &str) -> Metadata {
        let statistics = file_statistics(text);
        let features = features(text);
        let complexity = assess(statistics.config_items, statistics.max_depth, features.len());

        let metadata = Metadata {
            project: project_info(text),
            version: first_capture(&VERSION, text),
            timestamp: TIMESTAMPS
                .iter()
                .find_map(|re| re.find(text))
                .map(|m| m.as_str().to_string()),
            network_functions: network_functions(text, self.config.max_instance_samples),
            features,
            interfaces: interfaces(text),
            identifiers: identifiers(text),
            network: network_info(
                text,
                NetworkLimits {
                    ip_samples: self.config.max_ip_samples,
                    domains: self.config.max_domains,
                },
            ),
            statistics,
            complexity,
        };
        log::debug!(
            "Extracted metadata: {} network functions, {} features, complexity {}",
            metadata.network_functions.len(),
            metadata.features.len(),
            metadata.complexity.level
        );
        metadata
    }
}

/// Extract with the default limits
pub fn extract(text: &str) -> Metadata {
    MetadataExtractor::default().extract(text)
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn network_functions(text: &str, max_samples: usize) -> BTreeMap<String, NetworkFunctionStats> {
    let mut out: BTreeMap<String, NetworkFunctionStats> = BTreeMap::new();
    for found in NF_NAME.find_iter(text) {
        let suffix_len = text[found.end()..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(text.len() - found.end());
        let suffix = &text[found.end()..found.end() + suffix_len];
        if suffix.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }

        let instance = text[found.start()..found.end() + suffix_len].trim_end_matches(['-', '_']);
        let entry = out.entry(found.as_str().to_ascii_uppercase()).or_default();
        entry.count += 1;
        if entry.instances.len() < max_samples && !entry.instances.iter().any(|i| i == instance) {
            entry.instances.push(instance.to_string());
        }
    }
    out
}

fn features(text: &str) -> BTreeSet<String> {
    let groups: Vec<&str> = FEATURE_GROUPS.iter().map(|(label, _)| *label).collect();
    FeatureTagger::shared()
        .tag_text(text)
        .into_iter()
        .filter(|label| groups.contains(&label.as_str()))
        .collect()
}

fn canonical_interface(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    if lower == "sbi" || lower.chars().skip(1).all(|c| c.is_ascii_digit()) {
        return lower.to_ascii_uppercase();
    }
    let mut chars = lower.chars();
    chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default()
}

fn interfaces(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for found in INTERFACE.find_iter(text) {
        let name = canonical_interface(found.as_str());
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

fn identifiers(text: &str) -> BTreeMap<String, Vec<String>> {
    let mut out = BTreeMap::new();
    for (name, re) in IDENTIFIERS.iter() {
        let mut values: Vec<String> = Vec::new();
        for caps in re.captures_iter(text) {
            let Some(raw) = caps.get(1) else {
                continue;
            };
            for value in raw.as_str().split(',') {
                if !value.is_empty() && !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
        }
        if !values.is_empty() {
            out.insert(name.to_string(), values);
        }
    }
    out
}

fn project_info(text: &str) -> ProjectInfo {
    let mut info = ProjectInfo::default();
    for (field, re) in PROJECT_FIELDS.iter() {
        let value = first_capture(re, text);
        match *field {
            "customer" => info.customer = value,
            "site" => info.site = value,
            "region" => info.region = value,
            _ => info.project = value,
        }
    }
    info
}

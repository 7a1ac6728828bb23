use regex::Captures;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const DEFAULT_MASK: &str = "********";

fn default_mask() -> String {
    DEFAULT_MASK.to_string()
}

/// How a matched value is turned into its masked form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskStrategy {
    /// Replace the whole match with a fixed mask
    Full {
        #[serde(default = "default_mask")]
        mask: String,
    },

    /// Keep a prefix and suffix (in characters), fill the middle
    Partial {
        keep_prefix: usize,
        keep_suffix: usize,
        #[serde(default = "default_mask")]
        fill: String,
    },

    /// Keep the first `keep` separator-delimited segments, mask the rest
    Segment {
        separator: String,
        keep: usize,
        mask: String,
    },

    /// `key=mask`, where the key is capture group 1
    KeyValue {
        #[serde(default = "default_mask")]
        mask: String,
    },

    /// `label_` plus the first 8 hex digits of the value's SHA-256
    Hashed { label: String },

    /// Mask a URL's host, keeping scheme, top-level domain and path
    Url,

    /// `prefix_NNN` numbered by first appearance within the call
    Sequential { prefix: String },
}

impl MaskStrategy {
    /// Short name of the strategy, as written in catalogs
    pub fn kind(&self) -> &'static str {
        match self {
            MaskStrategy::Full { .. } => "full",
            MaskStrategy::Partial { .. } => "partial",
            MaskStrategy::Segment { .. } => "segment",
            MaskStrategy::KeyValue { .. } => "key_value",
            MaskStrategy::Hashed { .. } => "hashed",
            MaskStrategy::Url => "url",
            MaskStrategy::Sequential { .. } => "sequential",
        }
    }

    /// Literal fragments this strategy inserts into the output
    pub(crate) fn literals(&self) -> Vec<&str> {
        match self {
            MaskStrategy::Full { mask } | MaskStrategy::KeyValue { mask } => vec![mask.as_str()],
            MaskStrategy::Partial { fill, .. } => vec![fill.as_str()],
            MaskStrategy::Segment {
                separator, mask, ..
            } => vec![separator.as_str(), mask.as_str()],
            MaskStrategy::Hashed { label } => vec![label.as_str()],
            MaskStrategy::Sequential { prefix } => vec![prefix.as_str()],
            MaskStrategy::Url => Vec::new(),
        }
    }

    /// Mask one match. `ordinal` is the 1-based number the value would get
    /// as a new distinct entry of its category.
    pub fn apply(&self, caps: &Captures<'_>, ordinal: usize) -> String {
        let original = caps.get(0).map_or("", |m| m.as_str());
        match self {
            MaskStrategy::Full { mask } => mask.clone(),
            MaskStrategy::Partial {
                keep_prefix,
                keep_suffix,
                fill,
            } => partial(original, *keep_prefix, *keep_suffix, fill),
            MaskStrategy::Segment {
                separator,
                keep,
                mask,
            } => segment(original, separator, *keep, mask),
            MaskStrategy::KeyValue { mask } => {
                let key = caps.get(1).map_or(original, |m| m.as_str());
                format!("{key}={mask}")
            }
            MaskStrategy::Hashed { label } => format!("{label}_{}", short_digest(original)),
            MaskStrategy::Url => mask_url(original),
            MaskStrategy::Sequential { prefix } => format!("{prefix}_{ordinal:03}"),
        }
    }
}

fn partial(original: &str, keep_prefix: usize, keep_suffix: usize, fill: &str) -> String {
    let chars: Vec<char> = original.chars().collect();
    if chars.len() <= keep_prefix + keep_suffix {
        return fill.to_string();
    }
    let head: String = chars[..keep_prefix].iter().collect();
    let tail: String = chars[chars.len() - keep_suffix..].iter().collect();
    format!("{head}{fill}{tail}")
}

fn segment(original: &str, separator: &str, keep: usize, mask: &str) -> String {
    original
        .split(separator)
        .enumerate()
        .map(|(idx, part)| if idx < keep { part } else { mask })
        .collect::<Vec<_>>()
        .join(separator)
}

fn short_digest(value: &str) -> String {
    Sha256::digest(value.as_bytes())
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

fn mask_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return "masked.domain".to_string();
    };
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = if host_port.starts_with('[') {
        host_port
    } else {
        host_port.split(':').next().unwrap_or(host_port)
    };

    let tld = host
        .rsplit_once('.')
        .map(|(_, tld)| tld)
        .filter(|tld| !tld.is_empty() && tld.chars().all(|c| c.is_ascii_alphabetic()));
    let masked_host = match tld {
        Some(tld) => format!("masked.{tld}"),
        None => "masked.domain".to_string(),
    };
    format!("{scheme}://{masked_host}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn apply(strategy: &MaskStrategy, pattern: &str, text: &str) -> String {
        let re = Regex::new(pattern).unwrap();
        let caps = re.captures(text).unwrap();
        strategy.apply(&caps, 1)
    }

    #[test]
    fn partial_keeps_prefix_and_suffix() {
        let s = MaskStrategy::Partial {
            keep_prefix: 3,
            keep_suffix: 2,
            fill: "****".into(),
        };
        assert_eq!(apply(&s, r"\d+", "13812345678"), "138****78");
        assert_eq!(apply(&s, r"\d+", "1234"), "****");
    }

    #[test]
    fn segment_masks_trailing_octets() {
        let s = MaskStrategy::Segment {
            separator: ".".into(),
            keep: 2,
            mask: "xxx".into(),
        };
        assert_eq!(apply(&s, r"[\d.]+", "10.1.2.3"), "10.1.xxx.xxx");
    }

    #[test]
    fn key_value_uses_first_group() {
        let s = MaskStrategy::KeyValue {
            mask: "********".into(),
        };
        assert_eq!(
            apply(&s, r"(password)\s*[=:]\s*(\S+)", "password: secret123"),
            "password=********"
        );
    }

    #[test]
    fn hashed_is_stable_and_short() {
        let s = MaskStrategy::Hashed {
            label: "IMSI".into(),
        };
        let first = apply(&s, r"\d+", "460001234567890");
        assert_eq!(first, apply(&s, r"\d+", "460001234567890"));
        assert_eq!(first.len(), "IMSI_".len() + 8);
    }

    #[test]
    fn url_keeps_scheme_tld_and_path() {
        assert_eq!(
            mask_url("https://nrf.operator.com:8443/nnrf-nfm/v1?x=1"),
            "https://masked.com/nnrf-nfm/v1?x=1"
        );
        assert_eq!(mask_url("http://10.0.0.1/api"), "http://masked.domain/api");
        assert_eq!(mask_url("http://user@localhost"), "http://masked.domain");
        assert_eq!(mask_url("https://masked.com/x"), "https://masked.com/x");
    }

    #[test]
    fn sequential_numbers_by_ordinal() {
        let s = MaskStrategy::Sequential {
            prefix: "CUSTOMER".into(),
        };
        let re = Regex::new("Vodafone").unwrap();
        let caps = re.captures("Vodafone").unwrap();
        assert_eq!(s.apply(&caps, 12), "CUSTOMER_012");
    }

    #[test]
    fn deserializes_tagged_kinds() {
        let s: MaskStrategy = toml::from_str("kind = \"full\"").unwrap();
        assert_eq!(
            s,
            MaskStrategy::Full {
                mask: "********".into()
            }
        );
        let s: MaskStrategy = toml::from_str("kind = \"url\"").unwrap();
        assert_eq!(s.kind(), "url");
    }
}

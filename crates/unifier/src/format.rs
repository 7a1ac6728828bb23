use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Number of leading bytes inspected by content sniffing
pub const SNIFF_BYTES: usize = 1024;

/// Configuration format recognised by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Xml,
    Json,
    Yaml,
    Ini,
    Text,
}

impl FormatTag {
    /// Map a file extension to a format, if recognised
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xml" => Some(FormatTag::Xml),
            "json" => Some(FormatTag::Json),
            "yaml" | "yml" => Some(FormatTag::Yaml),
            "ini" | "cfg" => Some(FormatTag::Ini),
            "txt" | "text" | "log" | "conf" | "config" => Some(FormatTag::Text),
            _ => None,
        }
    }

    /// Map a file path to a format by its extension
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Get format name as string
    pub fn as_str(self) -> &'static str {
        match self {
            FormatTag::Xml => "xml",
            FormatTag::Json => "json",
            FormatTag::Yaml => "yaml",
            FormatTag::Ini => "ini",
            FormatTag::Text => "text",
        }
    }

    /// Whether the format carries a parseable structure
    pub fn is_structured(self) -> bool {
        !matches!(self, FormatTag::Text)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a format was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Extension,
    Content,
    Fallback,
}

/// Outcome of format detection. Detection never fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub format: FormatTag,
    pub method: DetectionMethod,
    /// Set when content carried conflicting format signals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ambiguity: Option<String>,
}

impl Detection {
    const fn new(format: FormatTag, method: DetectionMethod) -> Self {
        Self {
            format,
            method,
            ambiguity: None,
        }
    }
}

/// Classify raw bytes using the filename extension, then content sniffing
pub fn detect(bytes: &[u8], filename: &str) -> Detection {
    if let Some(format) = FormatTag::from_path(filename) {
        return Detection::new(format, DetectionMethod::Extension);
    }
    let head = &bytes[..bytes.len().min(SNIFF_BYTES)];
    sniff(&String::from_utf8_lossy(head))
}

/// Classify already-decoded text using the filename extension, then content sniffing
pub fn detect_text(text: &str, filename: &str) -> Detection {
    if let Some(format) = FormatTag::from_path(filename) {
        return Detection::new(format, DetectionMethod::Extension);
    }
    sniff(head_of(text))
}

fn head_of(text: &str) -> &str {
    if text.len() <= SNIFF_BYTES {
        return text;
    }
    let mut end = SNIFF_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn sniff(head: &str) -> Detection {
    let body = head.trim_start_matches('\u{feff}').trim_start();
    let Some(first) = body.chars().next() else {
        return Detection::new(FormatTag::Text, DetectionMethod::Fallback);
    };

    match first {
        '<' => return Detection::new(FormatTag::Xml, DetectionMethod::Content),
        '{' => return Detection::new(FormatTag::Json, DetectionMethod::Content),
        '[' => {
            let first_line = body.lines().next().unwrap_or_default();
            let format = if is_ini_header(first_line) {
                FormatTag::Ini
            } else {
                FormatTag::Json
            };
            return Detection::new(format, DetectionMethod::Content);
        }
        _ => {}
    }

    let mut yaml_signals = 0usize;
    let mut ini_signals = 0usize;
    for line in body.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }
        if is_ini_header(trimmed) || is_ini_entry(trimmed) {
            ini_signals += 1;
        } else if is_yaml_entry(trimmed) {
            yaml_signals += 1;
        }
    }

    match (yaml_signals > 0, ini_signals > 0) {
        (true, false) => Detection::new(FormatTag::Yaml, DetectionMethod::Content),
        (false, true) => Detection::new(FormatTag::Ini, DetectionMethod::Content),
        (false, false) => Detection::new(FormatTag::Text, DetectionMethod::Fallback),
        (true, true) => Detection {
            format: FormatTag::Text,
            method: DetectionMethod::Fallback,
            ambiguity: Some(format!(
                "content mixes yaml ({yaml_signals} lines) and ini ({ini_signals} lines) structure"
            )),
        },
    }
}

fn key_len(line: &str) -> usize {
    line.char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.')))
        .map_or(line.len(), |(idx, _)| idx)
}

pub(crate) fn is_ini_header(line: &str) -> bool {
    let line = line.trim();
    let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) else {
        return false;
    };
    let inner = inner.trim();
    inner
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && !inner.contains(['"', ',', '{', '}', '[', ']'])
}

fn is_ini_entry(line: &str) -> bool {
    let len = key_len(line);
    len > 0 && line[len..].trim_start().starts_with('=')
}

fn is_yaml_entry(line: &str) -> bool {
    if line == "-" || line.starts_with("- ") {
        return true;
    }
    let len = key_len(line);
    if len == 0 {
        return false;
    }
    let Some(rest) = line[len..].trim_start_matches([' ', '\t']).strip_prefix(':') else {
        return false;
    };
    rest.is_empty() || rest.starts_with([' ', '\t'])
}

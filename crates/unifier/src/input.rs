use crate::error::{Result, UnifyError};
use crate::format::{detect_text, Detection, FormatTag};
use encoding_rs::{Encoding, GBK};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text encoding a document was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "utf-16be")]
    Utf16Be,
    #[serde(rename = "gbk")]
    Gbk,
}

impl TextEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Gbk => "gbk",
        }
    }

    fn from_encoding(encoding: &'static Encoding) -> Option<Self> {
        if encoding == encoding_rs::UTF_8 {
            Some(TextEncoding::Utf8)
        } else if encoding == encoding_rs::UTF_16LE {
            Some(TextEncoding::Utf16Le)
        } else if encoding == encoding_rs::UTF_16BE {
            Some(TextEncoding::Utf16Be)
        } else {
            None
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode raw bytes, trying BOM-declared encodings, then UTF-8, then GBK.
pub fn decode(bytes: &[u8]) -> Result<(String, TextEncoding)> {
    let (text, encoding) = if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let label = TextEncoding::from_encoding(encoding)
            .ok_or_else(|| UnifyError::unreadable(format!("unsupported BOM {}", encoding.name())))?;
        let text = encoding
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            .ok_or_else(|| {
                UnifyError::unreadable(format!("invalid {label} byte sequence after BOM"))
            })?;
        (text.into_owned(), label)
    } else if let Ok(text) = std::str::from_utf8(bytes) {
        (text.to_string(), TextEncoding::Utf8)
    } else if let Some(text) = GBK.decode_without_bom_handling_and_without_replacement(bytes) {
        log::debug!("Input is not valid UTF-8, decoded as GBK");
        (text.into_owned(), TextEncoding::Gbk)
    } else {
        return Err(UnifyError::unreadable(
            "bytes are neither UTF-8, UTF-16 (with BOM) nor GBK",
        ));
    };

    if text.contains('\0') {
        return Err(UnifyError::unreadable("input contains NUL characters"));
    }
    Ok((text, encoding))
}

/// Number of lines as seen by line iteration; a trailing newline adds none
#[must_use]
pub fn line_count(text: &str) -> usize {
    text.lines().count()
}

/// An immutable, decoded input document
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    filename: String,
    text: String,
    encoding: TextEncoding,
    detection: Detection,
    line_count: usize,
    size_bytes: usize,
}

impl ConfigDocument {
    /// Decode and classify raw bytes
    pub fn load(bytes: &[u8], filename: &str) -> Result<Self> {
        let (text, encoding) = decode(bytes)?;
        let detection = detect_text(&text, filename);
        let line_count = line_count(&text);
        Ok(Self {
            filename: filename.to_string(),
            text,
            encoding,
            detection,
            line_count,
            size_bytes: bytes.len(),
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    pub fn format(&self) -> FormatTag {
        self.detection.format
    }

    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Size of the raw input in bytes
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

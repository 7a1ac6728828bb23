use crate::error::{ErrorKind, Stage, StageError};
use crate::options::ProcessOptions;
use nfprep_chunker::{Chunk, Chunker};
use nfprep_desensitizer::{desensitize, DesensitizeStats, ReplacementMapping};
use nfprep_metadata::{Metadata, MetadataExtractor};
use nfprep_unifier::{
    unify_or_fallback, ConfigDocument, DetectionMethod, FormatTag, TextEncoding, UnifiedDocument,
};
use serde::Serialize;
use std::time::Instant;

/// Decoded-input facts recorded in the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    pub format: FormatTag,
    pub detection_method: DetectionMethod,
    pub encoding: TextEncoding,
    pub line_count: usize,
    pub size_bytes: usize,
}

impl DocumentInfo {
    fn from_document(document: &ConfigDocument) -> Self {
        Self {
            format: document.format(),
            detection_method: document.detection().method,
            encoding: document.encoding(),
            line_count: document.line_count(),
            size_bytes: document.size_bytes(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub file_size: usize,
    pub line_count: usize,
    pub chunk_count: usize,
    /// Masked occurrences per category
    pub desensitization_counts: DesensitizeStats,
    pub total_desensitized: usize,
}

/// Everything one `process` call produced.
///
/// A requested output is `None` only when a fatal error stopped the
/// invocation before its stage ran.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessResult {
    pub filename: String,
    pub success: bool,
    pub errors: Vec<StageError>,
    pub document: Option<DocumentInfo>,
    pub unified: Option<UnifiedDocument>,
    pub desensitized_text: Option<String>,
    pub desensitize_mapping: Option<ReplacementMapping>,
    pub metadata: Option<Metadata>,
    pub chunks: Option<Vec<Chunk>>,
    pub statistics: Statistics,
    pub processing_time_ms: u64,
}

impl ProcessResult {
    fn new(filename: &str, file_size: usize) -> Self {
        Self {
            filename: filename.to_string(),
            success: true,
            errors: Vec::new(),
            document: None,
            unified: None,
            desensitized_text: None,
            desensitize_mapping: None,
            metadata: None,
            chunks: None,
            statistics: Statistics {
                file_size,
                ..Statistics::default()
            },
            processing_time_ms: 0,
        }
    }

    /// Result for a file that could not be read at all
    pub fn unreadable(filename: &str, message: impl Into<String>) -> Self {
        let mut result = Self::new(filename, 0);
        result.record(StageError::new(
            Stage::Read,
            ErrorKind::UnreadableInputError,
            message,
        ));
        result
    }

    fn record(&mut self, error: StageError) {
        if error.is_fatal() {
            log::error!("{}: {error}", self.filename);
            self.success = false;
        } else {
            log::warn!("{}: {error}", self.filename);
        }
        self.errors.push(error);
    }

    fn finish(mut self, started: Instant) -> Self {
        self.processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if self.success {
            log::info!(
                "Processed {} in {} ms ({} chunks, {} values masked)",
                self.filename,
                self.processing_time_ms,
                self.statistics.chunk_count,
                self.statistics.total_desensitized
            );
        }
        self
    }

    /// Fatal error that stopped the invocation, if any
    pub fn fatal_error(&self) -> Option<&StageError> {
        self.errors.iter().find(|e| e.is_fatal())
    }
}

/// Run the pipeline over one file's raw bytes.
///
/// Unification, desensitization and metadata extraction each read the
/// original text; chunking reads the desensitized text when desensitization
/// ran. Fatal errors (undecodable input, invalid chunk limits) end the
/// invocation with `success == false`; parse errors and ambiguous detection
/// are recorded and the affected stage degrades.
pub fn process(raw: &[u8], filename: &str, options: &ProcessOptions) -> ProcessResult {
    let started = Instant::now();
    let mut result = ProcessResult::new(filename, raw.len());

    let document = match ConfigDocument::load(raw, filename) {
        Ok(document) => document,
        Err(err) => {
            result.record(StageError::new(
                Stage::Decode,
                ErrorKind::UnreadableInputError,
                err.to_string(),
            ));
            return result.finish(started);
        }
    };
    log::debug!(
        "{filename}: {} via {:?}, {} lines, {}",
        document.format(),
        document.detection().method,
        document.line_count(),
        document.encoding()
    );
    result.document = Some(DocumentInfo::from_document(&document));
    result.statistics.line_count = document.line_count();

    if let Some(note) = &document.detection().ambiguity {
        result.record(StageError::new(
            Stage::Detect,
            ErrorKind::FormatDetectionAmbiguous,
            note.clone(),
        ));
    }

    let chunker = if options.chunk {
        match Chunker::new(options.chunking) {
            Ok(chunker) => Some(chunker),
            Err(err) => {
                result.record(StageError::new(
                    Stage::Chunk,
                    ErrorKind::ChunkingConfigError,
                    err.to_string(),
                ));
                return result.finish(started);
            }
        }
    } else {
        None
    };

    let text = document.text();

    if options.unify_format {
        let (unified, parse_error) = unify_or_fallback(text, document.format());
        if let Some(err) = parse_error {
            result.record(StageError::new(
                Stage::Unify,
                ErrorKind::ParseError,
                err.to_string(),
            ));
        }
        result.unified = Some(unified);
    }

    if options.desensitize {
        let masked = desensitize(text, &options.catalog);
        result.statistics.total_desensitized = masked.stats.total();
        result.statistics.desensitization_counts = masked.stats;
        result.desensitize_mapping = Some(masked.mapping);
        result.desensitized_text = Some(masked.text);
    }

    if options.extract_metadata {
        result.metadata = Some(MetadataExtractor::new(options.metadata).extract(text));
    }

    if let Some(chunker) = chunker {
        let source = result.desensitized_text.as_deref().unwrap_or(text);
        let chunks = chunker.chunk(source);
        log::debug!("{filename}: {}", Chunker::get_stats(&chunks));
        result.statistics.chunk_count = chunks.len();
        result.chunks = Some(chunks);
    }

    result.finish(started)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfprep_chunker::ChunkerConfig;
    use pretty_assertions::assert_eq;

    fn options() -> ProcessOptions {
        ProcessOptions::with_builtin_catalog().unwrap()
    }

    #[test]
    fn all_stages_run() {
        let raw = b"amf:\n  name: amf01\n  password: secret123\n  sbi: 10.1.2.3\n";
        let result = process(raw, "amf.yaml", &options());

        assert!(result.success);
        assert!(result.errors.is_empty());
        let document = result.document.as_ref().unwrap();
        assert_eq!(document.format, FormatTag::Yaml);
        assert_eq!(document.line_count, 4);
        assert_eq!(
            result.unified.as_ref().unwrap().line_map.get("amf.sbi"),
            Some(4)
        );
        assert_eq!(
            result.desensitized_text.as_deref(),
            Some("amf:\n  name: amf01\n  password=********\n  sbi: 10.1.xxx.xxx\n")
        );
        assert_eq!(result.statistics.total_desensitized, 2);
        assert_eq!(result.statistics.desensitization_counts.get("passwords"), 1);
        assert_eq!(result.metadata.as_ref().unwrap().network_functions["AMF"].count, 2);

        let chunks = result.chunks.as_ref().unwrap();
        assert_eq!(chunks.len(), 1);
        assert!(!chunks[0].content.contains("secret123"));
        assert_eq!(result.statistics.chunk_count, 1);
        assert_eq!(result.statistics.file_size, raw.len());
    }

    #[test]
    fn disabled_stages_stay_empty() {
        let result = process(b"password=1\n", "a.ini", &options().only_desensitize());
        assert!(result.success);
        assert!(result.unified.is_none());
        assert!(result.metadata.is_none());
        assert!(result.chunks.is_none());
        assert_eq!(result.desensitized_text.as_deref(), Some("password=********\n"));
    }

    #[test]
    fn chunks_original_text_when_not_desensitizing() {
        let mut opts = options();
        opts.desensitize = false;
        let result = process(b"password=1\n", "a.ini", &opts);
        assert_eq!(result.chunks.unwrap()[0].content, "password=1");
        assert!(result.desensitize_mapping.is_none());
    }

    #[test]
    fn undecodable_input_is_fatal() {
        let result = process(&[0x00, 0xff, 0xfe, 0x00, 0x81], "blob.bin", &options());
        assert!(!result.success);
        let fatal = result.fatal_error().unwrap();
        assert_eq!(fatal.stage, Stage::Decode);
        assert_eq!(fatal.kind, ErrorKind::UnreadableInputError);
        assert!(result.desensitized_text.is_none());
    }

    #[test]
    fn invalid_chunk_limits_fail_fast() {
        let opts = options().chunking(ChunkerConfig::new(5, 1024, 5));
        let result = process(b"a: 1\n", "a.yaml", &opts);
        assert!(!result.success);
        assert_eq!(result.errors[0].kind, ErrorKind::ChunkingConfigError);
        assert_eq!(result.errors[0].stage, Stage::Chunk);
        assert!(result.unified.is_none());
    }

    #[test]
    fn ambiguous_detection_is_recorded_but_not_fatal() {
        let result = process(b"name: amf01\nport = 8080\n", "notes", &options());
        assert!(result.success);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ErrorKind::FormatDetectionAmbiguous);
        assert_eq!(result.document.unwrap().format, FormatTag::Text);
    }
}

use anyhow::{Context, Result};
use nfprep_chunker::ChunkIndex;
use nfprep_pipeline::{BatchSummary, ProcessResult, Report};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

pub const SUMMARY_FILE: &str = "processing_summary.json";

fn stem_of(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "input".to_string())
}

/// `a/amf.yaml` under `root` becomes `a__amf_yaml`
fn qualified_stem(root: &Path, filename: &str) -> String {
    let path = Path::new(filename);
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().replace('.', "_")),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("__")
}

/// Artifact name prefix per result, in order. Plain stems are kept unless
/// two inputs share one; those are named by their path under `root`.
fn artifact_stems(root: &Path, results: &[ProcessResult]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for result in results {
        *counts.entry(stem_of(&result.filename)).or_default() += 1;
    }

    let mut taken = HashSet::new();
    results
        .iter()
        .map(|result| {
            let stem = stem_of(&result.filename);
            let base = if counts.get(&stem).copied().unwrap_or(0) > 1 {
                qualified_stem(root, &result.filename)
            } else {
                stem
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

fn reset_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to clear {}", dir.display()));
        }
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

/// Write every output one file produced under `stem`; returns the paths written
pub fn write_file_artifacts(
    out_dir: &Path,
    stem: &str,
    result: &ProcessResult,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if let Some(unified) = &result.unified {
        let path = out_dir.join(format!("{stem}_unified.json"));
        write_json(&path, unified)?;
        written.push(path);
    }

    if let Some(text) = &result.desensitized_text {
        let path = out_dir.join(format!("{stem}_desensitized.txt"));
        write_text(&path, text)?;
        written.push(path);
    }

    if let Some(mapping) = &result.desensitize_mapping {
        let path = out_dir.join(format!("{stem}_desensitize_mapping.json"));
        write_json(&path, mapping)?;
        written.push(path);
    }

    if let Some(metadata) = &result.metadata {
        let path = out_dir.join(format!("{stem}_metadata.json"));
        write_json(&path, metadata)?;
        written.push(path);
    }

    if let Some(chunks) = &result.chunks {
        let chunk_dir = out_dir.join(format!("{stem}_chunks"));
        reset_dir(&chunk_dir)?;
        for chunk in chunks {
            let path = chunk_dir.join(format!("chunk_{:04}.txt", chunk.id));
            write_text(&path, &chunk.content)?;
            written.push(path);
        }
        let index_path = chunk_dir.join("chunks_index.yaml");
        let index = serde_yaml::to_string(&ChunkIndex::build(chunks))?;
        write_text(&index_path, &index)?;
        written.push(index_path);
    }

    let report_path = out_dir.join(format!("{stem}_report.json"));
    write_json(&report_path, &Report::from_result(result))?;
    written.push(report_path);

    log::debug!("{}: wrote {} artifacts", result.filename, written.len());
    Ok(written)
}

/// Write all artifacts of a run over `input_root`, plus the summary
pub fn write_batch_artifacts(
    out_dir: &Path,
    input_root: &Path,
    summary: &BatchSummary,
) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let stems = artifact_stems(input_root, &summary.results);
    for (stem, result) in stems.iter().zip(&summary.results) {
        write_file_artifacts(out_dir, stem, result)?;
    }
    write_json(&out_dir.join(SUMMARY_FILE), summary)
}

use crate::error::{PipelineError, Result};
use crate::options::ProcessOptions;
use crate::process::{process, ProcessResult};
use crate::report::Report;
use globset::GlobBuilder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use walkdir::WalkDir;

/// Files under `root` whose name matches `pattern`, sorted by path.
///
/// A `root` that is itself a file is returned as the only input.
pub fn collect_inputs(root: &Path, pattern: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let meta = std::fs::metadata(root).map_err(|err| PipelineError::io(root, err))?;
    if meta.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher();

    let mut walker = WalkDir::new(root).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable entry: {err}");
                continue;
            }
        };
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    log::info!(
        "Found {} input files under {} matching '{pattern}'",
        files.len(),
        root.display()
    );
    Ok(files)
}

/// Outcome of a batch run, in input order
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total_files: usize,
    pub successful: usize,
    pub failed: usize,
    pub reports: Vec<Report>,
    #[serde(skip)]
    pub results: Vec<ProcessResult>,
}

impl BatchSummary {
    pub fn from_results(results: Vec<ProcessResult>) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        Self {
            total_files: results.len(),
            successful,
            failed: results.len() - successful,
            reports: results.iter().map(Report::from_result).collect(),
            results,
        }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

async fn process_path(path: PathBuf, options: Arc<ProcessOptions>) -> ProcessResult {
    let filename = path.display().to_string();
    let raw = match tokio::fs::read(&path).await {
        Ok(raw) => raw,
        Err(err) => return ProcessResult::unreadable(&filename, err.to_string()),
    };

    let label = filename.clone();
    match tokio::task::spawn_blocking(move || process(&raw, &label, &options)).await {
        Ok(result) => result,
        Err(err) => ProcessResult::unreadable(&filename, format!("worker failed: {err}")),
    }
}

/// Run `process` over every path with at most `concurrency` files in flight
pub async fn process_batch(
    paths: Vec<PathBuf>,
    options: Arc<ProcessOptions>,
    concurrency: usize,
) -> BatchSummary {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    log::info!(
        "Processing {} files with concurrency {}",
        paths.len(),
        concurrency.max(1)
    );

    let mut handles = Vec::with_capacity(paths.len());
    for path in paths {
        let semaphore = Arc::clone(&semaphore);
        let options = Arc::clone(&options);
        let filename = path.display().to_string();
        let handle = tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok();
            process_path(path, options).await
        });
        handles.push((filename, handle));
    }

    let mut results = Vec::with_capacity(handles.len());
    for (filename, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(err) => ProcessResult::unreadable(&filename, format!("worker failed: {err}")),
        };
        results.push(result);
    }

    let summary = BatchSummary::from_results(results);
    log::info!(
        "Batch finished: {} succeeded, {} failed",
        summary.successful,
        summary.failed
    );
    summary
}

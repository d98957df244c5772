//! Batch validation command implementation

use super::read_drafts;
use anyhow::{bail, Context, Result};
use catalog_core::{BookSchema, Validator};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Validate every `.json` file in a directory
pub fn batch(input_dir: &str, jobs: usize, schema: BookSchema) -> Result<()> {
    let input_path = Path::new(input_dir);

    // Find all record files
    let mut files: Vec<_> = fs::read_dir(input_path)
        .with_context(|| format!("Failed to read directory: {}", input_dir))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No record files found in {}", input_dir);
        return Ok(());
    }

    println!("Found {} files to validate", files.len());

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let validator = Validator::new(schema);
    let valid_records = AtomicUsize::new(0);
    let invalid_records = AtomicUsize::new(0);
    let failed_files = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;

    // Process files in parallel
    pool.install(|| {
        files.par_iter().for_each(|file_path| {
            match process_file(file_path, &validator) {
                Ok((valid, invalid)) => {
                    valid_records.fetch_add(valid, Ordering::Relaxed);
                    invalid_records.fetch_add(invalid, Ordering::Relaxed);
                    if invalid > 0 {
                        failed_files.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(e) => {
                    failed_files.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Failed to read {:?}: {:#}", file_path, e);
                }
            }

            progress.inc(1);
        });
    });

    progress.finish();

    let valid = valid_records.load(Ordering::Relaxed);
    let invalid = invalid_records.load(Ordering::Relaxed);
    let failed = failed_files.load(Ordering::Relaxed);

    println!("\nBatch validation complete:");
    println!("  Valid records:   {}", valid);
    println!("  Invalid records: {}", invalid);
    println!("  Failed files:    {}", failed);

    if failed > 0 {
        bail!("Batch validation found problems in {} files", failed);
    }

    Ok(())
}

/// Count valid and invalid records in one file
fn process_file(path: &Path, validator: &Validator) -> Result<(usize, usize)> {
    let drafts = read_drafts(path)?;
    let mut invalid = 0;

    for (i, draft) in drafts.iter().enumerate() {
        if let Err(e) = validator.validate(draft) {
            invalid += 1;
            tracing::warn!("{:?} record {}: {}", path, i + 1, e);
        }
    }

    Ok((drafts.len() - invalid, invalid))
}

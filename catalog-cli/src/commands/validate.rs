//! Validate command implementation

use super::read_drafts;
use anyhow::{bail, Result};
use catalog_core::{BookSchema, Validator, Violation};
use serde::Serialize;
use std::path::Path;

/// Per-record outcome for JSON output
#[derive(Serialize)]
struct RecordReport {
    record: usize,
    valid: bool,
    violations: Vec<Violation>,
}

/// Validate every record in a file
pub fn validate(input: &str, json: bool, schema: BookSchema) -> Result<()> {
    let drafts = read_drafts(Path::new(input))?;
    let validator = Validator::new(schema);

    let reports: Vec<RecordReport> = drafts
        .iter()
        .enumerate()
        .map(|(i, draft)| match validator.validate(draft) {
            Ok(_) => RecordReport {
                record: i + 1,
                valid: true,
                violations: Vec::new(),
            },
            Err(e) => RecordReport {
                record: i + 1,
                valid: false,
                violations: e.violations().to_vec(),
            },
        })
        .collect();

    let invalid = reports.iter().filter(|r| !r.valid).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            if report.valid {
                println!("Record {}: OK", report.record);
            } else {
                let reasons: Vec<String> =
                    report.violations.iter().map(|v| v.to_string()).collect();
                println!("Record {}: INVALID: {}", report.record, reasons.join("; "));
            }
        }
    }

    if invalid > 0 {
        bail!("{} of {} records in {} are invalid", invalid, reports.len(), input);
    }

    Ok(())
}

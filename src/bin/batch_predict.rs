//! Batch crop recommendation over a CSV file
//!
//! Reads the seven feature columns (and an optional `label` column) as text,
//! runs every row through the same pipeline the web form uses, and reports
//! accuracy when labels are present.
//!
//! Usage:
//!   cargo run --features batch --bin batch_predict -- <model.json> <input.csv>

use anyhow::Context;
use crop_advisor::{
    CropProfileRegistry, InferencePipeline, InferenceResult, ModelAdapter, RawInput, TreeEnsemble,
    FEATURE_NAMES,
};
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: batch_predict <model.json> <input.csv>");
        std::process::exit(2);
    }
    let (model_path, csv_path) = (&args[1], &args[2]);

    println!("\n{}", "=".repeat(70));
    println!("Batch Crop Recommendation");
    println!("{}", "=".repeat(70));
    println!("  Model: {}", model_path);
    println!("  CSV:   {}", csv_path);
    println!();

    let model = TreeEnsemble::from_path(model_path)
        .with_context(|| format!("Failed to load model: {}", model_path))?;
    let pipeline = InferencePipeline::new(
        Arc::new(ModelAdapter::new(model)?),
        Arc::new(CropProfileRegistry::builtin()),
    );

    // Schema inference disabled: every column arrives as text, like form input
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(csv_path.into()))
        .with_context(|| format!("Failed to create CSV reader: {}", csv_path))?
        .finish()
        .with_context(|| format!("Failed to load CSV: {}", csv_path))?;

    // Missing columns surface as per-row validation errors
    let mut columns = Vec::with_capacity(FEATURE_NAMES.len());
    for name in FEATURE_NAMES {
        let values = match df.column(name) {
            Ok(column) => Some(
                column
                    .str()
                    .with_context(|| format!("Column '{}' is not string type", name))?,
            ),
            Err(_) => None,
        };
        columns.push((name, values));
    }

    let labels = match df.column("label") {
        Ok(column) => Some(column.str().context("Column 'label' is not string type")?),
        Err(_) => None,
    };

    let inputs: Vec<RawInput> = (0..df.height())
        .map(|idx| {
            let mut raw = RawInput::new();
            for &(name, values) in &columns {
                if let Some(value) = values.and_then(|v| v.get(idx)) {
                    raw.insert(name, value);
                }
            }
            raw
        })
        .collect();

    let start = Instant::now();
    let results = pipeline.run_batch(&inputs);
    let elapsed = start.elapsed();

    let mut failed = 0;
    let mut labelled = 0;
    let mut correct = 0;

    for (idx, result) in results.iter().enumerate() {
        let expected = labels.and_then(|l| l.get(idx));
        match result {
            InferenceResult::Success(rec) => {
                println!(
                    "  row {:>5}: {:<12} temp {:<9} pH {:<8} rain {}",
                    idx, rec.label, rec.profile.temperature, rec.profile.ph, rec.profile.rainfall
                );
                if let Some(expected) = expected {
                    labelled += 1;
                    if rec.label.eq_ignore_ascii_case(expected.trim()) {
                        correct += 1;
                    }
                }
            }
            InferenceResult::Failure(_) => {
                failed += 1;
                println!("  row {:>5}: {}", idx, result.message());
            }
        }
    }

    println!();
    println!(
        "Rows: {} ({} failed) in {:.3} ms",
        results.len(),
        failed,
        elapsed.as_secs_f64() * 1000.0
    );
    if labelled > 0 {
        println!(
            "Accuracy: {}/{} ({:.2}%)",
            correct,
            labelled,
            100.0 * correct as f64 / labelled as f64
        );
    }

    Ok(())
}

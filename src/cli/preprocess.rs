//! `preprocess` command: fit the pipeline and write the cleaned table

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use super::args::{preprocessed_path, PipelineArgs};
use crate::pipeline::{dataset_stats, load_dataset, save_dataset, PreprocessPipeline};
use crate::report::PreprocessSummary;
use crate::utils::{
    create_spinner, finish_with_success, path_row, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success,
};

pub fn run_preprocess(
    input: &Path,
    output: Option<&Path>,
    state: Option<&Path>,
    args: &PipelineArgs,
) -> Result<()> {
    let config = args.resolve_config()?;
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| preprocessed_path(input));

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&[
        path_row("Input", input),
        path_row("Output", &output_path),
        ("Missing threshold", format!("{:.1}%", config.missing_threshold * 100.0)),
        ("Redundant threshold", format!("{:.1}%", config.redundant_threshold * 100.0)),
        ("Rare threshold", format!("{:.1}%", config.rare_threshold * 100.0)),
    ]);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let raw = load_dataset(input, args.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");
    let (rows, cols, memory_mb) = dataset_stats(&raw);
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Step 2: Fit
    print_step_header(2, "Fit Pipeline");
    let step_start = Instant::now();
    let spinner = create_spinner("Learning pipeline state...");
    let (fitted, matrix) = PreprocessPipeline::new(config.clone())
        .fit_transform(&raw)
        .context("Failed to fit the preprocessing pipeline")?;
    finish_with_success(&spinner, "Pipeline fitted");
    if let Some(missing) = fitted.missing_columns() {
        print_count(
            "columns with too many missing values",
            missing.columns_to_drop.len(),
            Some(format!("(> {:.1}%)", config.missing_threshold * 100.0).as_str()),
        );
    }
    if let Some(redundant) = fitted.redundant_columns() {
        print_count(
            "near-constant columns",
            redundant.columns_to_remove.len(),
            Some(format!("(> {:.1}%)", config.redundant_threshold * 100.0).as_str()),
        );
    }
    print_info(&format!(
        "Feature matrix: {} rows x {} features",
        matrix.nrows(),
        matrix.ncols()
    ));
    print_step_time(step_start.elapsed());

    // Step 3: Save
    print_step_header(3, "Save Results");
    let step_start = Instant::now();
    let mut table = fitted.transform_table(&raw)?;
    save_dataset(&mut table, &output_path)?;
    print_success(&format!("Saved to {}", output_path.display()));
    if let Some(state_path) = state {
        fitted
            .save(state_path)
            .with_context(|| format!("Failed to write pipeline state: {}", state_path.display()))?;
        print_success(&format!("Pipeline state saved to {}", state_path.display()));
    }
    print_step_time(step_start.elapsed());

    PreprocessSummary::from_fitted(&raw, &fitted, table.width()).display();
    print_completion("Preprocessing");
    Ok(())
}

//! `predict` command: score rows with a saved model artifact

use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{predict, records_from_str, ModelArtifact};
use crate::pipeline::load_dataset;

/// Prints the prediction JSON to stdout unless `output` is given.
pub fn run_predict(
    model: &Path,
    input: &Path,
    output: Option<&Path>,
    infer_schema_length: usize,
) -> Result<()> {
    let artifact = ModelArtifact::load(model)?;

    let is_json = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let table = if is_json {
        let text = std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read records: {}", input.display()))?;
        records_from_str(&text)
            .with_context(|| format!("Failed to parse records: {}", input.display()))?
    } else {
        load_dataset(input, infer_schema_length)?
    };

    let result = predict(&artifact, &table).context("Prediction failed")?;
    let json = serde_json::to_string_pretty(&result)?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write predictions: {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

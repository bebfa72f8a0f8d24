//! `train` command: fit and evaluate a Lasso, save the model artifact

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;

use super::args::PipelineArgs;
use crate::model::{train, TrainOptions};
use crate::pipeline::load_dataset;
use crate::report::TrainingSummary;
use crate::utils::{
    create_spinner, finish_with_success, finish_with_warning, path_row, print_banner,
    print_completion, print_config, print_step_header, print_step_time, print_success,
};

pub fn run_train(
    input: &Path,
    model_dir: &Path,
    options: &TrainOptions,
    args: &PipelineArgs,
) -> Result<PathBuf> {
    let config = args.resolve_config()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&[
        path_row("Input", input),
        ("Target", options.target.clone()),
        path_row("Model directory", model_dir),
        ("Alpha", options.alpha.to_string()),
        ("Train size", format!("{:.0}%", options.train_size * 100.0)),
        ("Rare threshold", format!("{:.1}%", config.rare_threshold * 100.0)),
    ]);

    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Reading dataset...");
    let df = load_dataset(input, args.infer_schema_length)?;
    finish_with_success(&spinner, &format!("Loaded {} rows", df.height()));
    print_step_time(step_start.elapsed());

    print_step_header(2, "Train Lasso");
    let step_start = Instant::now();
    let spinner = create_spinner("Fitting pipeline and model...");
    let artifact = train(&df, &config, options)?;
    if artifact.model.n_selected() == 0 {
        finish_with_warning(&spinner, "Model trained, but every coefficient is zero");
    } else {
        finish_with_success(&spinner, "Model trained");
    }
    print_step_time(step_start.elapsed());

    print_step_header(3, "Save Model");
    let path = artifact.save(model_dir)?;
    print_success(&format!("Saved to {}", path.display()));

    TrainingSummary::from_artifact(&artifact).display();
    print_completion("Training");
    Ok(path)
}

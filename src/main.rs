//! housefit: house-price preprocessing, Lasso training and serving CLI

use anyhow::Result;
use clap::Parser;

use housefit::cli::{run_predict, run_preprocess, run_train, Cli, Commands};
use housefit::model::TrainOptions;
use housefit::utils::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Preprocess {
            input,
            output,
            state,
            pipeline,
        } => run_preprocess(&input, output.as_deref(), state.as_deref(), &pipeline),
        Commands::Train {
            input,
            model_dir,
            target,
            drop,
            alpha,
            train_size,
            split_seed,
            max_iter,
            tol,
            pipeline,
        } => {
            let options = TrainOptions {
                target,
                drop,
                train_size,
                split_seed,
                alpha,
                max_iter,
                tol,
            };
            run_train(&input, &model_dir, &options, &pipeline).map(|_| ())
        }
        Commands::Predict {
            model,
            input,
            output,
            infer_schema_length,
        } => run_predict(&model, &input, output.as_deref(), infer_schema_length),
    }
}

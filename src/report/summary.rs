//! Preprocessing and training summary tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use polars::prelude::DataFrame;

use crate::model::{ModelArtifact, RegressionMetrics};
use crate::pipeline::{FittedPipeline, FittedTableStep};

/// What the table steps removed and what the router produced
#[derive(Debug, Default)]
pub struct PreprocessSummary {
    pub rows: usize,
    pub initial_columns: usize,
    pub dropped_useless: Vec<String>,
    pub dropped_missing: Vec<String>,
    pub dropped_redundant: Vec<String>,
    pub remaining_columns: usize,
    pub features: usize,
}

fn present(raw: &DataFrame, names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| raw.column(name.as_str()).is_ok())
        .cloned()
        .collect()
}

impl PreprocessSummary {
    /// Summarise a fitted pipeline against the raw table it was fit on.
    pub fn from_fitted(raw: &DataFrame, fitted: &FittedPipeline, remaining_columns: usize) -> Self {
        let mut summary = Self {
            rows: raw.height(),
            initial_columns: raw.width(),
            remaining_columns,
            features: fitted.feature_names().len(),
            ..Default::default()
        };
        for step in &fitted.steps {
            match step {
                FittedTableStep::DropColumns(drop) => {
                    summary.dropped_useless = present(raw, &drop.columns);
                }
                FittedTableStep::MissingColumns(missing) => {
                    summary.dropped_missing = missing.columns_to_drop.clone();
                }
                FittedTableStep::RedundantColumns(redundant) => {
                    summary.dropped_redundant = present(raw, &redundant.drop_set())
                        .into_iter()
                        .filter(|name| !summary.dropped_useless.contains(name))
                        .filter(|name| !summary.dropped_missing.contains(name))
                        .collect();
                }
                FittedTableStep::ImputeCategories(_) => {}
            }
        }
        summary
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("PREPROCESSING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("Rows"), Cell::new(self.rows)]);
        table.add_row(vec![Cell::new("📁 Initial Columns"), Cell::new(self.initial_columns)]);
        for (label, dropped) in [
            ("🗑️  Dropped (Configured)", &self.dropped_useless),
            ("🕳️  Dropped (Missing)", &self.dropped_missing),
            ("🔁 Dropped (Redundant)", &self.dropped_redundant),
        ] {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(dropped.len()).fg(if dropped.is_empty() {
                    Color::White
                } else {
                    Color::Red
                }),
            ]);
        }
        table.add_row(vec![
            Cell::new("Remaining Columns"),
            Cell::new(self.remaining_columns),
        ]);
        table.add_row(vec![
            Cell::new("✅ Model Features"),
            Cell::new(self.features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        for (title, dropped) in [
            ("Configured", &self.dropped_useless),
            ("High Missing Values", &self.dropped_missing),
            ("Near-Constant or Listed", &self.dropped_redundant),
        ] {
            if dropped.is_empty() {
                continue;
            }
            println!();
            println!(
                "      {} {}:",
                style(title).yellow(),
                style(format!("({})", dropped.len())).dim()
            );
            for feature in dropped {
                println!("        {} {}", style("•").dim(), feature);
            }
        }
    }
}

/// Scores and model size of a training run
#[derive(Debug)]
pub struct TrainingSummary {
    pub version: String,
    pub features: usize,
    pub selected: usize,
    pub alpha: f64,
    pub train: Option<RegressionMetrics>,
    pub test: Option<RegressionMetrics>,
}

impl TrainingSummary {
    pub fn from_artifact(artifact: &ModelArtifact) -> Self {
        Self {
            version: artifact.version.clone(),
            features: artifact.pipeline.feature_names().len(),
            selected: artifact.model.n_selected(),
            alpha: artifact.model.alpha,
            train: artifact.train_metrics,
            test: artifact.test_metrics,
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("TRAINING SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Split").add_attribute(Attribute::Bold),
            Cell::new("Rows").add_attribute(Attribute::Bold),
            Cell::new("R²").add_attribute(Attribute::Bold),
            Cell::new("RMSE").add_attribute(Attribute::Bold),
            Cell::new("MAE").add_attribute(Attribute::Bold),
        ]);
        for (name, metrics) in [("train", &self.train), ("test", &self.test)] {
            if let Some(m) = metrics {
                let r2_color = if m.r2 > 0.8 {
                    Color::Green
                } else if m.r2 > 0.5 {
                    Color::Yellow
                } else {
                    Color::Red
                };
                table.add_row(vec![
                    Cell::new(name),
                    Cell::new(m.n_samples),
                    Cell::new(format!("{:.4}", m.r2)).fg(r2_color),
                    Cell::new(format!("{:.2}", m.rmse)),
                    Cell::new(format!("{:.2}", m.mae)),
                ]);
            }
        }

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
        println!();
        println!(
            "      Version {}  alpha {}  selected {} of {} features",
            style(&self.version).cyan(),
            style(self.alpha).yellow(),
            style(self.selected).green().bold(),
            self.features
        );
    }
}

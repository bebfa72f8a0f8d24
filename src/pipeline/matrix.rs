//! Dense numeric feature matrix handed to the regressor

use faer::Mat;
use polars::prelude::*;

use super::error::{PipelineError, PipelineResult};
use super::frame::float_values;
use super::resolution::column_names;

/// Named columns over a dense `faer` matrix. Never contains missing values.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    values: Mat<f64>,
}

impl FeatureMatrix {
    pub fn new(columns: Vec<String>, values: Mat<f64>) -> PipelineResult<Self> {
        if columns.len() != values.ncols() {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{} columns", columns.len()),
                actual: format!("{} columns", values.ncols()),
            });
        }
        Ok(Self { columns, values })
    }

    /// Build from a table whose columns are all numeric and complete.
    pub fn from_dataframe(df: &DataFrame) -> PipelineResult<Self> {
        let columns = column_names(df);
        let mut values = Mat::<f64>::zeros(df.height(), columns.len());
        for (j, name) in columns.iter().enumerate() {
            for (i, v) in float_values(df, name)?.into_iter().enumerate() {
                match v {
                    Some(x) if !x.is_nan() => values[(i, j)] = x,
                    _ => {
                        return Err(PipelineError::MissingValues {
                            column: name.clone(),
                        })
                    }
                }
            }
        }
        Ok(Self { columns, values })
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &Mat<f64> {
        &self.values
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    pub fn row(&self, row: usize) -> Vec<f64> {
        (0..self.ncols()).map(|j| self.values[(row, j)]).collect()
    }

    /// Values of a named column, if present.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.columns.iter().position(|c| c == name)?;
        Some((0..self.nrows()).map(|i| self.values[(i, j)]).collect())
    }

    /// Exact equality of names, shape and every value's bit pattern.
    pub fn bit_identical(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.nrows() == other.nrows()
            && (0..self.nrows()).all(|i| {
                (0..self.ncols()).all(|j| self.get(i, j).to_bits() == other.get(i, j).to_bits())
            })
    }

    pub fn to_dataframe(&self) -> PipelineResult<DataFrame> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let values: Vec<f64> = (0..self.nrows()).map(|i| self.values[(i, j)]).collect();
                Column::new(name.as_str().into(), values)
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

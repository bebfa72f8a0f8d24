//! Two-phase transformer protocol
//!
//! A [`Transformer`] carries hyperparameters only. Fitting it produces a separate
//! [`FittedTransformer`] value holding the learned statistics, and only that value
//! can transform data. Serving code therefore never holds anything that could relearn.

use polars::prelude::*;

use super::error::{PipelineError, PipelineResult};

/// An unfitted stage: hyperparameters plus a way to learn state from a table.
pub trait Transformer {
    /// The learned state produced by [`Transformer::fit`].
    type Fitted: FittedTransformer;

    /// Stage name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Learn state from `df` without modifying it.
    fn fit(&self, df: &DataFrame) -> PipelineResult<Self::Fitted>;

    /// Fit on `df` and apply the learned state to the same table.
    fn fit_transform(&self, df: &DataFrame) -> PipelineResult<(Self::Fitted, DataFrame)> {
        let fitted = self.fit(df)?;
        let out = fitted.transform(df)?;
        Ok((fitted, out))
    }
}

/// Learned state that can be replayed against any compatible table.
pub trait FittedTransformer {
    /// Apply the learned state. Never mutates `self` or `df`.
    fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame>;
}

/// Holder pairing a transformer with its (optional) fitted state.
///
/// This is the shape callers use when they want a single object that starts
/// unfitted: `transform` before `fit` fails with [`PipelineError::NotFitted`].
#[derive(Debug, Clone)]
pub struct Stage<T: Transformer> {
    transformer: T,
    fitted: Option<T::Fitted>,
}

impl<T: Transformer> Stage<T> {
    pub fn new(transformer: T) -> Self {
        Self {
            transformer,
            fitted: None,
        }
    }

    /// Fit the stage, replacing any previously learned state wholesale.
    pub fn fit(&mut self, df: &DataFrame) -> PipelineResult<&T::Fitted> {
        let fitted = self.transformer.fit(df)?;
        Ok(self.fitted.insert(fitted))
    }

    pub fn transform(&self, df: &DataFrame) -> PipelineResult<DataFrame> {
        match &self.fitted {
            Some(fitted) => fitted.transform(df),
            None => Err(PipelineError::not_fitted(self.transformer.name())),
        }
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> PipelineResult<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fitted(&self) -> Option<&T::Fitted> {
        self.fitted.as_ref()
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }
}

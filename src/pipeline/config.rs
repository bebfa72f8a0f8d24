//! Pipeline configuration and the house-price column defaults

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{PipelineError, PipelineResult};
use super::impute::DEFAULT_MISSING_CATEGORY;
use super::missing::DEFAULT_MISSING_THRESHOLD;
use super::ordinal::{default_quality_ordering, DEFAULT_UNKNOWN_ORDINAL};
use super::rare::{DEFAULT_RARE_KEYWORD, DEFAULT_RARE_THRESHOLD};
use super::redundant::DEFAULT_REDUNDANT_THRESHOLD;
use super::resolution::Resolution;
use super::router::NumericBranch;

/// Columns removed before anything is learned
pub const DROP_COLUMNS: &[&str] = &["Id", "GarageYrBlt", "YrSold", "Exterior2nd", "PoolQC"];

/// Columns always removed by the redundant-columns step
pub const REDUNDANT_ADDITIONAL: &[&str] = &["GarageYrBlt", "Exterior2nd"];

pub const ORDINAL_COLUMNS: &[&str] =
    &["BsmtQual", "ExterQual", "ExterCond", "FireplaceQu", "KitchenQual"];

pub const CATEGORICAL_COLUMNS: &[&str] = &[
    "GarageQual", "GarageCond", "PoolQC", "BsmtCond", "Alley", "Fence", "RoofStyle",
    "MiscFeature", "Heating", "CentralAir", "Electrical", "Functional", "PavedDrive", "Street",
    "Utilities", "LandSlope", "Condition1", "Condition2", "RoofMatl", "MSZoning", "LotShape",
    "LandContour", "LotConfig", "Neighborhood", "BldgType", "HouseStyle", "Exterior1st",
    "Exterior2nd", "Foundation", "BsmtExposure", "BsmtFinType1", "BsmtFinType2", "HeatingQC",
    "GarageType", "GarageFinish", "SaleType", "SaleCondition", "MasVnrType",
];

pub const NUMERIC_COLUMNS: &[&str] = &[
    "BsmtFinSF2", "BsmtUnfSF", "TotalBsmtSF", "1stFlrSF", "2ndFlrSF", "GrLivArea",
    "BsmtFullBath", "FullBath", "HalfBath", "BedroomAbvGr", "TotRmsAbvGrd", "MiscVal",
    "GarageArea", "WoodDeckSF", "OpenPorchSF", "EnclosedPorch", "GarageCars", "MoSold",
    "LotFrontage", "LotArea", "MSSubClass", "MasVnrArea", "BsmtFinSF1", "LowQualFinSF",
    "3SsnPorch", "ScreenPorch",
];

/// Response column of the house-price dataset
pub const TARGET_COLUMN: &str = "SalePrice";

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Every hyperparameter and column list of the preprocessing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub drop_columns: Vec<String>,
    pub missing_threshold: f64,
    pub redundant_threshold: f64,
    pub redundant_additional: Vec<String>,
    pub rare_threshold: f64,
    pub rare_keyword: String,
    pub missing_category: String,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub ordinal_columns: Vec<String>,
    pub ordinal_ordering: Vec<String>,
    pub unknown_ordinal: i64,
    pub numeric: NumericBranch,
    pub resolution: Resolution,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drop_columns: owned(DROP_COLUMNS),
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
            redundant_threshold: DEFAULT_REDUNDANT_THRESHOLD,
            redundant_additional: owned(REDUNDANT_ADDITIONAL),
            rare_threshold: DEFAULT_RARE_THRESHOLD,
            rare_keyword: DEFAULT_RARE_KEYWORD.to_string(),
            missing_category: DEFAULT_MISSING_CATEGORY.to_string(),
            numeric_columns: owned(NUMERIC_COLUMNS),
            categorical_columns: owned(CATEGORICAL_COLUMNS),
            ordinal_columns: owned(ORDINAL_COLUMNS),
            ordinal_ordering: default_quality_ordering(),
            unknown_ordinal: DEFAULT_UNKNOWN_ORDINAL,
            numeric: NumericBranch::default(),
            resolution: Resolution::Lenient,
        }
    }
}

impl PipelineConfig {
    /// Load a config file; fields it omits keep their defaults.
    pub fn from_json_file(path: &Path) -> PipelineResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        for (name, value) in [
            ("missing_threshold", self.missing_threshold),
            ("redundant_threshold", self.redundant_threshold),
            ("rare_threshold", self.rare_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PipelineError::InvalidParameter(format!(
                    "{name} must be between 0.0 and 1.0, got {value}"
                )));
            }
        }

        if self.rare_keyword.is_empty() {
            return Err(PipelineError::InvalidParameter(
                "rare_keyword must not be empty".to_string(),
            ));
        }

        let mut owner: HashMap<&str, &str> = HashMap::new();
        let sets = [
            ("numeric", &self.numeric_columns),
            ("categorical", &self.categorical_columns),
            ("ordinal", &self.ordinal_columns),
        ];
        for (set, columns) in sets {
            for column in columns {
                match owner.insert(column.as_str(), set) {
                    Some(other) if other != set => {
                        return Err(PipelineError::InvalidParameter(format!(
                            "column '{column}' is listed as both {other} and {set}"
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Categorical and ordinal columns, deduplicated, in that order.
    pub fn category_columns(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        for name in self.categorical_columns.iter().chain(&self.ordinal_columns) {
            if !all.contains(name) {
                all.push(name.clone());
            }
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = PipelineConfig {
            rare_threshold: -0.1,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::InvalidParameter(_))));
    }

    #[test]
    fn test_overlapping_sets_rejected() {
        let mut config = PipelineConfig::default();
        config.ordinal_columns.push("LotArea".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LotArea"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "rare_threshold": 0.1, "numeric": { "scale": false, "power": true } }"#)
                .unwrap();
        assert_eq!(config.rare_threshold, 0.1);
        assert!(!config.numeric.scale);
        assert_eq!(config.missing_threshold, DEFAULT_MISSING_THRESHOLD);
        assert_eq!(config.ordinal_columns, owned(ORDINAL_COLUMNS));
    }

    #[test]
    fn test_category_columns_union() {
        let config = PipelineConfig {
            categorical_columns: owned(&["Alley", "Street", "Alley"]),
            ordinal_columns: owned(&["ExterQual"]),
            ..PipelineConfig::default()
        };
        assert_eq!(config.category_columns(), owned(&["Alley", "Street", "ExterQual"]));
    }
}

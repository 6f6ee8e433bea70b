//
// This file is part of smallcnn.
//
// smallcnn is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// smallcnn is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with smallcnn. If not, see <http://www.gnu.org/licenses/>.
//
// Copyright 2017 Chris Foster
//

//! Network topology and training parameters.
//!
//! Loaded from JSON, where any omitted field takes its default:
//!
//! ```json
//! {
//!   "input_size": 28,
//!   "subimage_size": 5,
//!   "max_pool_size": 2,
//!   "learning_rate": 0.0015,
//!   "feature_activation": "relu",
//!   "hidden_activation": "relu"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activation_function::ActivationFunction;
use crate::error::{self, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CnnConfig {
    /// Side of the square input grid.
    pub input_size: usize,
    /// Side of each convolution kernel.
    pub subimage_size: usize,
    /// Side of each pooling window, which is also its stride.
    pub max_pool_size: usize,
    pub learning_rate: f32,
    pub feature_activation: ActivationFunction,
    pub hidden_activation: ActivationFunction,
}

impl CnnConfig {
    /// Side of every feature map.
    pub fn feature_size(&self) -> usize {
        self.input_size + 1 - self.subimage_size
    }

    /// Side of every pooled grid.  Feature map cells past the last full window are dropped.
    pub fn pooled_size(&self) -> usize {
        self.feature_size() / self.max_pool_size
    }

    /// Number of cells in one pooled grid, i.e. the width of each pool->hidden matrix.
    pub fn pooled_cells(&self) -> usize {
        self.pooled_size() * self.pooled_size()
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_size == 0 || self.subimage_size == 0 || self.max_pool_size == 0 {
            return error::config_error("Sizes must be nonzero");
        }

        if self.subimage_size > self.input_size {
            return error::config_error(&format!(
                "Subimage size {} exceeds input size {}",
                self.subimage_size,
                self.input_size,
            ));
        }

        if self.feature_size() < self.max_pool_size {
            return error::config_error(&format!(
                "Feature maps of size {} are smaller than one {}x{} pooling window",
                self.feature_size(),
                self.max_pool_size,
                self.max_pool_size,
            ));
        }

        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return error::config_error(&format!("Learning rate {} must be finite and positive", self.learning_rate));
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<CnnConfig> {
        let config: CnnConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P>(path: P) -> Result<CnnConfig> where P: AsRef<Path> {
        CnnConfig::from_json_str(&fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for CnnConfig {
    fn default() -> CnnConfig {
        CnnConfig {
            input_size: 28,
            subimage_size: 5,
            max_pool_size: 2,
            learning_rate: 0.0015,
            feature_activation: ActivationFunction::ReLu,
            hidden_activation: ActivationFunction::ReLu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::Error;

    #[test]
    fn test_default_sizes() {
        let config = CnnConfig::default();
        assert_eq!(config.feature_size(), 24);
        assert_eq!(config.pooled_size(), 12);
        assert_eq!(config.pooled_cells(), 144);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pooled_size_drops_remainder() {
        let config = CnnConfig {
            input_size: 9,
            subimage_size: 3,
            max_pool_size: 2,
            ..CnnConfig::default()
        };
        assert_eq!(config.feature_size(), 7);
        assert_eq!(config.pooled_size(), 3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = CnnConfig::from_json_str(r#"{ "input_size": 12, "hidden_activation": "tanh" }"#).unwrap();
        assert_eq!(config.input_size, 12);
        assert_eq!(config.hidden_activation, ActivationFunction::TanH);
        assert_eq!(config.subimage_size, 5);
        assert_eq!(config.feature_activation, ActivationFunction::ReLu);
    }

    #[test]
    fn test_json_round_trip() {
        let config = CnnConfig {
            learning_rate: 0.25,
            feature_activation: ActivationFunction::Sigmoid,
            ..CnnConfig::default()
        };
        assert_eq!(CnnConfig::from_json_str(&config.to_json_string().unwrap()).unwrap(), config);
    }

    #[test]
    fn test_invalid_configurations() {
        let invalid = vec![
            CnnConfig { input_size: 0, ..CnnConfig::default() },
            CnnConfig { subimage_size: 0, ..CnnConfig::default() },
            CnnConfig { max_pool_size: 0, ..CnnConfig::default() },
            CnnConfig { subimage_size: 29, ..CnnConfig::default() },
            CnnConfig { input_size: 6, max_pool_size: 3, ..CnnConfig::default() },
            CnnConfig { learning_rate: 0.0, ..CnnConfig::default() },
            CnnConfig { learning_rate: std::f32::NAN, ..CnnConfig::default() },
        ];

        for config in invalid {
            match config.validate() {
                Err(Error::Config(_)) => (),
                other => panic!("{:?} should be invalid, got {:?}", config, other),
            }
        }
    }

    #[test]
    fn test_bad_json() {
        match CnnConfig::from_json_str(r#"{ "feature_activation": "softsign" }"#) {
            Err(Error::Json(_)) => (),
            other => panic!("Expected a JSON error, got {:?}", other),
        }
    }
}

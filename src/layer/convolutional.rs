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

use smallmath::Vector;

use crate::activation_function::ActivationFunction;
use crate::error::{self, Error, Result};
use crate::layer::{FeatureMap, Grid, MaxPool, PoolView, Signal};
use crate::weight_matrix::{Gradients, WeightMatrix};

/// One channel of the convolutional stage: a feature map, the pool over it, the pooled values as a
/// flat signal and the deltas of those pooled values.
#[derive(Clone, Debug)]
pub struct ConvolutionalLayer {
    feature_map: FeatureMap,
    max_pool: MaxPool,
    pooled: Vector,
    deltas: Vector,
}

impl ConvolutionalLayer {
    pub fn new(feature_size: usize, max_pool_size: usize, activation: ActivationFunction) -> ConvolutionalLayer {
        let max_pool = MaxPool::new(feature_size, feature_size, max_pool_size);
        let cells = max_pool.cells();

        ConvolutionalLayer {
            feature_map: FeatureMap::new(feature_size, feature_size, activation),
            max_pool: max_pool,
            pooled: Vector::zeros(cells),
            deltas: Vector::zeros(cells),
        }
    }

    pub fn feature_map(&self) -> &FeatureMap {
        &self.feature_map
    }

    pub fn feature_map_mut(&mut self) -> &mut FeatureMap {
        &mut self.feature_map
    }

    pub fn max_pool(&self) -> &MaxPool {
        &self.max_pool
    }

    pub fn pool_view(&self) -> PoolView {
        self.max_pool.view(&self.feature_map)
    }

    /// Pooled values from the last [`feed_forward`](#method.feed_forward), row-major.
    pub fn pooled(&self) -> &[f32] {
        &self.pooled
    }

    pub fn deltas(&self) -> &[f32] {
        &self.deltas
    }

    /// Convolves `input` with `kernel`, then pools the result.
    pub fn feed_forward<G>(&mut self, kernel: &WeightMatrix, input: &G) -> Result<()> where G: Grid + ?Sized {
        self.feature_map.populate(kernel, input)?;
        self.max_pool.compute(&self.feature_map)?;
        self.max_pool.view(&self.feature_map).gather(&mut self.pooled);
        Ok(())
    }

    /// `deltas = (pool_weights^T * hidden_deltas) .* f'(pooled)`, where `pool_weights` maps this channel's
    /// pooled values into the hidden layer.
    pub fn compute_deltas(&mut self, pool_weights: &WeightMatrix, hidden_deltas: &[f32]) -> Result<()> {
        error::check_dimension(self.pooled.len(), pool_weights.width())?;
        error::check_dimension(pool_weights.height(), hidden_deltas.len())?;

        let activation = self.feature_map.activation();
        let weights = pool_weights.weights();
        for (i, delta) in self.deltas.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (j, hidden_delta) in hidden_deltas.iter().enumerate() {
                sum += hidden_delta * weights[(j, i)];
            }
            *delta = sum * activation.f_prime_output(self.pooled[i]);
        }

        Ok(())
    }

    /// Adds the kernel gradients implied by the current deltas.  Each pooled cell only routes its delta
    /// back to the input patch under the feature map cell it was taken from; every other cell
    /// contributes nothing.
    pub fn accumulate_kernel_gradients<G>(&self, input: &G, gradients: &mut Gradients) -> Result<()> where G: Grid + ?Sized {
        let size = gradients.weights.rows();
        error::check_dimension(size, gradients.weights.columns())?;
        error::check_dimension(1, gradients.biases.len())?;

        let rows_needed = self.feature_map.rows() + size - 1;
        if input.rows() < rows_needed {
            return Err(Error::DimensionMismatch { expected: rows_needed, found: input.rows() });
        }

        let columns_needed = self.feature_map.columns() + size - 1;
        if input.columns() < columns_needed {
            return Err(Error::DimensionMismatch { expected: columns_needed, found: input.columns() });
        }

        for (&(sx, sy), &delta) in self.max_pool.sources().iter().zip(self.deltas.iter()) {
            for a in 0..size {
                for b in 0..size {
                    gradients.weights[(a, b)] += delta * input.cell(sy + a, sx + b);
                }
            }
            gradients.biases[0] += delta;
        }

        Ok(())
    }
}

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

use smallmath::Matrix;

use crate::activation_function::ActivationFunction;
use crate::error::{Error, Result};
use crate::layer::Grid;
use crate::weight_matrix::WeightMatrix;

/// The result of sliding a square kernel over a grid.
#[derive(Clone, Debug)]
pub struct FeatureMap {
    dendrites: Matrix,
    axons: Matrix,
    activation: ActivationFunction,
    feedback: f32,
}

impl FeatureMap {
    pub fn new(rows: usize, columns: usize, activation: ActivationFunction) -> FeatureMap {
        FeatureMap {
            dendrites: Matrix::zeros(rows, columns),
            axons: Matrix::zeros(rows, columns),
            activation: activation,
            feedback: 0.0,
        }
    }

    pub fn rows(&self) -> usize {
        self.dendrites.rows()
    }

    pub fn columns(&self) -> usize {
        self.dendrites.columns()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Sets the external value an `AdaReLu` map keys off of.  Other activations ignore it.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn dendrite(&self, row: usize, column: usize) -> f32 {
        self.dendrites[(row, column)]
    }

    pub fn axon(&self, row: usize, column: usize) -> f32 {
        self.axons[(row, column)]
    }

    pub fn dendrites(&self) -> &Matrix {
        &self.dendrites
    }

    pub fn axons(&self) -> &Matrix {
        &self.axons
    }

    /// `dendrite[i, j] = sum(kernel[k, l] * input[i + k, j + l]) + bias` for every cell, then the activation.
    ///
    /// `input` needs at least `rows + size - 1` rows and `columns + size - 1` columns; extra trailing rows
    /// and columns are never read.
    pub fn populate<G>(&mut self, kernel: &WeightMatrix, input: &G) -> Result<()> where G: Grid + ?Sized {
        let size = kernel.width();
        if kernel.height() != size {
            return Err(Error::DimensionMismatch { expected: size, found: kernel.height() });
        }

        let rows_needed = self.rows() + size - 1;
        if input.rows() < rows_needed {
            return Err(Error::DimensionMismatch { expected: rows_needed, found: input.rows() });
        }

        let columns_needed = self.columns() + size - 1;
        if input.columns() < columns_needed {
            return Err(Error::DimensionMismatch { expected: columns_needed, found: input.columns() });
        }

        let bias = kernel.bias(0);
        for i in 0..self.rows() {
            for j in 0..self.columns() {
                let mut sum = bias;
                for k in 0..size {
                    for l in 0..size {
                        sum += kernel.weight(k, l) * input.cell(i + k, j + l);
                    }
                }

                self.dendrites[(i, j)] = sum;
                self.axons[(i, j)] = self.activation.f_feedback(sum, self.feedback);
            }
        }

        Ok(())
    }
}

impl Grid for FeatureMap {
    fn rows(&self) -> usize {
        FeatureMap::rows(self)
    }

    fn columns(&self) -> usize {
        FeatureMap::columns(self)
    }

    fn cell(&self, row: usize, column: usize) -> f32 {
        self.axon(row, column)
    }
}

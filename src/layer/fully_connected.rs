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

use smallmath::{matrix, vector, Vector};

use crate::activation_function::ActivationFunction;
use crate::error::{self, Result};
use crate::layer::Signal;
use crate::weight_matrix::{Gradients, WeightMatrix};

/// A fully connected layer's state: pre-activation dendrites, post-activation axons, and the deltas
/// computed for it during back propagation.
#[derive(Clone, Debug)]
pub struct Layer {
    dendrites: Vector,
    axons: Vector,
    deltas: Vector,
    derivatives: Vector,
    activation: ActivationFunction,
    constant: bool,
}

impl Layer {
    pub fn new(size: usize, activation: ActivationFunction) -> Layer {
        Layer {
            dendrites: Vector::zeros(size),
            axons: Vector::zeros(size),
            deltas: Vector::zeros(size),
            derivatives: Vector::zeros(size),
            activation: activation,
            constant: false,
        }
    }

    pub fn size(&self) -> usize {
        self.dendrites.len()
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    /// Turns this into an identity layer whose axons are its dendrites.
    pub fn make_constant(&mut self) {
        self.activation = ActivationFunction::None;
        self.constant = true;
    }

    pub fn is_constant(&self) -> bool {
        self.constant
    }

    pub fn dendrites(&self) -> &[f32] {
        &self.dendrites
    }

    pub fn axons(&self) -> &[f32] {
        if self.constant {
            &self.dendrites
        } else {
            &self.axons
        }
    }

    pub fn deltas(&self) -> &[f32] {
        &self.deltas
    }

    pub fn deltas_mut(&mut self) -> &mut [f32] {
        &mut self.deltas
    }

    /// Resets dendrites and deltas without reallocating.
    pub fn zero(&mut self) {
        self.dendrites.zero();
        self.deltas.zero();
    }

    /// `dendrites = matrix * source + biases`, then `axons = f(dendrites)`.
    pub fn populate<S>(&mut self, matrix: &WeightMatrix, source: &S) -> Result<()> where S: Signal + ?Sized {
        self.check_projection(matrix, source)?;
        self.dendrites.zero();
        self.accumulate(matrix, source)?;
        self.apply_activation_function();
        Ok(())
    }

    /// `dendrites += matrix * source + biases`.  Leaves the axons alone so several sources can be summed
    /// before a single [`apply_activation_function`](#method.apply_activation_function).
    pub fn accumulate<S>(&mut self, matrix: &WeightMatrix, source: &S) -> Result<()> where S: Signal + ?Sized {
        self.check_projection(matrix, source)?;

        match source.as_slice() {
            Some(input) => matrix.apply_accumulate(input, &mut self.dendrites)?,
            None => {
                for (row, dendrite) in self.dendrites.iter_mut().enumerate() {
                    let weights = &matrix.weights()[row];
                    let mut sum = matrix.bias(row);
                    for (column, weight) in weights.iter().enumerate() {
                        sum += weight * source.signal(column);
                    }
                    *dendrite += sum;
                }
            },
        }
        Ok(())
    }

    pub fn apply_activation_function(&mut self) {
        if !self.constant {
            self.activation.f_vector(&self.dendrites, &mut self.axons);
        }
    }

    /// Back propagates `downstream_deltas` through `matrix` (the weights this layer feeds):
    /// `deltas = (matrix^T * downstream_deltas) .* f'(axons)`.
    pub fn compute_deltas(&mut self, matrix: &WeightMatrix, downstream_deltas: &[f32]) -> Result<()> {
        error::check_dimension(self.size(), matrix.width())?;
        error::check_dimension(matrix.height(), downstream_deltas.len())?;

        self.deltas.zero();
        matrix::ops::transpose_multiply_vector(matrix.weights(), downstream_deltas, &mut self.deltas);

        let axons = if self.constant { &self.dendrites } else { &self.axons };
        self.activation.f_prime_output_vector(axons, &mut self.derivatives);
        vector::ops::multiply_assign(&mut self.deltas, &self.derivatives);
        Ok(())
    }

    /// Adds the gradients of the weights that produced this layer from `input`:
    /// `weights += deltas * input^T`, `biases += deltas`.
    pub fn accumulate_gradients(&self, input: &[f32], gradients: &mut Gradients) -> Result<()> {
        error::check_dimension(self.size(), gradients.weights.rows())?;
        error::check_dimension(gradients.weights.columns(), input.len())?;
        error::check_dimension(self.size(), gradients.biases.len())?;

        matrix::ops::outer_product(&self.deltas, input, &mut gradients.weights);
        vector::ops::add_assign(&mut gradients.biases, &self.deltas);
        Ok(())
    }

    fn check_projection<S>(&self, matrix: &WeightMatrix, source: &S) -> Result<()> where S: Signal + ?Sized {
        error::check_dimension(matrix.width(), source.len())?;
        error::check_dimension(self.size(), matrix.height())?;
        error::check_dimension(matrix.height(), matrix.bias_count())
    }
}

impl Signal for Layer {
    fn len(&self) -> usize {
        self.size()
    }

    fn signal(&self, index: usize) -> f32 {
        self.axons()[index]
    }

    fn as_slice(&self) -> Option<&[f32]> {
        Some(self.axons())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use smallmath::Matrix;

    use crate::error::Error;

    fn matrix() -> WeightMatrix {
        WeightMatrix::from_parts(
            Matrix::from_vec(2, 3, vec![
                1.0, -1.0, 0.5,
                0.0, 2.0, -3.0,
            ]),
            Vector::from_vec(vec![0.25, -0.5]),
        ).unwrap()
    }

    struct Doubled<'a>(&'a [f32]);

    impl<'a> Signal for Doubled<'a> {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn signal(&self, index: usize) -> f32 {
            2.0 * self.0[index]
        }
    }

    #[test]
    fn test_populate() {
        let mut layer = Layer::new(2, ActivationFunction::ReLu);
        layer.populate(&matrix(), &[1.0f32, 2.0, 4.0][..]).unwrap();

        assert_eq!(layer.dendrites(), &[1.25, -8.5]);
        assert_eq!(layer.axons(), &[1.25, 0.0]);
    }

    #[test]
    fn test_populate_through_signal() {
        let mut direct = Layer::new(2, ActivationFunction::TanH);
        direct.populate(&matrix(), &[2.0f32, 4.0, 8.0][..]).unwrap();

        let mut indirect = Layer::new(2, ActivationFunction::TanH);
        indirect.populate(&matrix(), &Doubled(&[1.0, 2.0, 4.0])).unwrap();

        assert_eq!(direct.axons(), indirect.axons());
    }

    #[test]
    fn test_populate_from_layer() {
        let mut first = Layer::new(3, ActivationFunction::None);
        first.make_constant();
        first.populate(
            &WeightMatrix::from_parts(Matrix::from_vec(3, 1, vec![1.0, 2.0, 4.0]), Vector::zeros(3)).unwrap(),
            &[1.0f32][..],
        ).unwrap();

        let mut second = Layer::new(2, ActivationFunction::ReLu);
        second.populate(&matrix(), &first).unwrap();
        assert_eq!(second.axons(), &[1.25, 0.0]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut layer = Layer::new(2, ActivationFunction::ReLu);

        match layer.populate(&matrix(), &[1.0f32, 2.0][..]) {
            Err(Error::DimensionMismatch { expected: 3, found: 2 }) => (),
            other => panic!("Expected a dimension mismatch, got {:?}", other),
        }

        let mut wrong_size = Layer::new(3, ActivationFunction::ReLu);
        assert!(wrong_size.populate(&matrix(), &[1.0f32, 2.0, 3.0][..]).is_err());
        assert_eq!(wrong_size.dendrites(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_accumulate_then_activate() {
        let mut layer = Layer::new(2, ActivationFunction::ReLu);
        layer.accumulate(&matrix(), &[1.0f32, 2.0, 4.0][..]).unwrap();
        layer.accumulate(&matrix(), &Doubled(&[0.0, 0.0, 1.0])).unwrap();
        assert_eq!(layer.axons(), &[0.0, 0.0]);

        layer.apply_activation_function();
        assert_eq!(layer.dendrites(), &[2.5, -15.0]);
        assert_eq!(layer.axons(), &[2.5, 0.0]);
    }

    #[test]
    fn test_make_constant_aliases_axons() {
        let mut layer = Layer::new(2, ActivationFunction::Sigmoid);
        layer.make_constant();
        layer.populate(&matrix(), &[1.0f32, 2.0, 4.0][..]).unwrap();

        assert_eq!(layer.activation(), ActivationFunction::None);
        assert_eq!(layer.axons(), layer.dendrites());
        assert_eq!(layer.axons(), &[1.25, -8.5]);
    }

    #[test]
    fn test_zero() {
        let mut layer = Layer::new(2, ActivationFunction::ReLu);
        layer.populate(&matrix(), &[1.0f32, 2.0, 4.0][..]).unwrap();
        layer.deltas_mut()[0] = 3.0;
        layer.zero();

        assert_eq!(layer.dendrites(), &[0.0, 0.0]);
        assert_eq!(layer.deltas(), &[0.0, 0.0]);
        assert_eq!(layer.size(), 2);
    }

    #[test]
    fn test_compute_deltas() {
        // Layer of 3 feeding `matrix()`.
        let mut layer = Layer::new(3, ActivationFunction::Sigmoid);
        layer.populate(
            &WeightMatrix::from_parts(Matrix::from_vec(3, 1, vec![0.0, 1.0, -1.0]), Vector::zeros(3)).unwrap(),
            &[1.0f32][..],
        ).unwrap();

        layer.compute_deltas(&matrix(), &[1.0, 0.5]).unwrap();

        let axons = layer.axons().to_vec();
        let expected = [
            1.0 * axons[0] * (1.0 - axons[0]),
            (-1.0 + 1.0) * axons[1] * (1.0 - axons[1]),
            (0.5 - 1.5) * axons[2] * (1.0 - axons[2]),
        ];
        for (delta, expected) in layer.deltas().iter().zip(expected.iter()) {
            assert_relative_eq!(*delta, *expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_accumulate_gradients() {
        let mut layer = Layer::new(2, ActivationFunction::ReLu);
        layer.deltas_mut().copy_from_slice(&[1.0, -2.0]);

        let mut gradients = matrix().gradients();
        layer.accumulate_gradients(&[3.0, 0.0, 1.0], &mut gradients).unwrap();
        layer.accumulate_gradients(&[3.0, 0.0, 1.0], &mut gradients).unwrap();

        assert_eq!(&gradients.weights[0], &[6.0, 0.0, 2.0]);
        assert_eq!(&gradients.weights[1], &[-12.0, 0.0, -4.0]);
        assert_eq!(&gradients.biases[..], &[2.0, -4.0]);
    }
}

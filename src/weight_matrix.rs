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

use rand::Rng;

use smallmath::{matrix, vector, Matrix, Vector};

use crate::error::{self, Error, Result};

/// Dense weights (`height` rows of outputs by `width` columns of inputs) plus biases.
///
/// A dense matrix has one bias per output row.  A convolution kernel is a square matrix with a single
/// bias shared by every position the kernel is applied at.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMatrix {
    pub(crate) weights: Matrix,
    pub(crate) biases: Vector,
}

impl WeightMatrix {
    /// Weights and biases are drawn independently from [-0.5, 0.5).
    pub fn new<R>(inputs: usize, outputs: usize, rng: &mut R) -> WeightMatrix where R: Rng {
        WeightMatrix {
            weights: Matrix::from_vec(outputs, inputs, random_values(inputs * outputs, rng)),
            biases: Vector::from_vec(random_values(outputs, rng)),
        }
    }

    /// A `size` x `size` kernel with one shared bias.
    pub fn convolution<R>(size: usize, rng: &mut R) -> WeightMatrix where R: Rng {
        WeightMatrix {
            weights: Matrix::from_vec(size, size, random_values(size * size, rng)),
            biases: Vector::from_vec(random_values(1, rng)),
        }
    }

    /// Builds a matrix from explicit values.  `biases` must hold either one value per row or a single
    /// shared value.
    pub fn from_parts(weights: Matrix, biases: Vector) -> Result<WeightMatrix> {
        if weights.rows() == 0 || weights.columns() == 0 {
            return error::config_error("Weight matrices need at least one row and one column");
        }

        if biases.len() != weights.rows() && biases.len() != 1 {
            return Err(Error::DimensionMismatch { expected: weights.rows(), found: biases.len() });
        }

        Ok(WeightMatrix {
            weights: weights,
            biases: biases,
        })
    }

    /// Number of inputs.
    pub fn width(&self) -> usize {
        self.weights.columns()
    }

    /// Number of outputs.
    pub fn height(&self) -> usize {
        self.weights.rows()
    }

    pub fn bias_count(&self) -> usize {
        self.biases.len()
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Vector {
        &self.biases
    }

    pub fn weight(&self, row: usize, column: usize) -> f32 {
        self.weights[(row, column)]
    }

    pub fn bias(&self, row: usize) -> f32 {
        self.biases[row]
    }

    /// `weights * input + biases`.
    pub fn apply(&self, input: &[f32]) -> Result<Vector> {
        let mut output = Vector::zeros(self.height());
        self.apply_accumulate(input, &mut output)?;
        Ok(output)
    }

    /// Adds `weights * input + biases` onto `output` without allocating.
    pub fn apply_accumulate(&self, input: &[f32], output: &mut [f32]) -> Result<()> {
        error::check_dimension(self.width(), input.len())?;
        error::check_dimension(self.height(), output.len())?;
        error::check_dimension(self.height(), self.bias_count())?;

        vector::ops::add_assign(output, &self.biases);
        matrix::ops::multiply_vector(&self.weights, input, output);
        Ok(())
    }

    /// A zeroed gradient buffer shaped like this matrix.
    pub fn gradients(&self) -> Gradients {
        Gradients {
            weights: Matrix::zeros(self.height(), self.width()),
            biases: Vector::zeros(self.bias_count()),
        }
    }

    /// Plain gradient descent: `weights -= rate * weight_gradients`, `biases -= rate * bias_gradients`.
    pub fn descend(&mut self, gradients: &Gradients, rate: f32) {
        debug_assert!(gradients.weights.rows() == self.height() && gradients.weights.columns() == self.width(), "Gradient dimensions don't match!");
        debug_assert!(gradients.biases.len() == self.bias_count(), "Gradient bias count doesn't match!");

        vector::ops::scaled_subtract_assign(self.weights.as_vector_mut(), gradients.weights.as_vector(), rate);
        vector::ops::scaled_subtract_assign(&mut self.biases, &gradients.biases, rate);
    }
}

/// Accumulated loss gradients for one [`WeightMatrix`](struct.WeightMatrix.html).
#[derive(Clone, Debug, PartialEq)]
pub struct Gradients {
    pub weights: Matrix,
    pub biases: Vector,
}

impl Gradients {
    pub fn zero(&mut self) {
        self.weights.zero();
        self.biases.zero();
    }
}

fn random_values<R>(count: usize, rng: &mut R) -> Vec<f32> where R: Rng {
    (0..count).map(|_| rng.gen::<f32>() - 0.5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed() -> WeightMatrix {
        WeightMatrix::from_parts(
            Matrix::from_vec(2, 3, vec![
                1.0, 2.0, 3.0,
                -1.0, 0.5, 0.0,
            ]),
            Vector::from_vec(vec![0.5, -1.0]),
        ).unwrap()
    }

    #[test]
    fn test_new_is_uniform_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let matrix = WeightMatrix::new(30, 20, &mut rng);

        assert_eq!(matrix.width(), 30);
        assert_eq!(matrix.height(), 20);
        assert_eq!(matrix.bias_count(), 20);
        assert!(matrix.weights().iter().chain(matrix.biases().iter()).all(|&w| w >= -0.5 && w < 0.5));
        assert!(matrix.weights().iter().any(|&w| w < 0.0));
        assert!(matrix.weights().iter().any(|&w| w > 0.0));
    }

    #[test]
    fn test_convolution_has_one_bias() {
        let mut rng = StdRng::seed_from_u64(7);
        let kernel = WeightMatrix::convolution(5, &mut rng);

        assert_eq!((kernel.width(), kernel.height(), kernel.bias_count()), (5, 5, 1));
    }

    #[test]
    fn test_apply() {
        let output = fixed().apply(&[1.0, 1.0, 2.0]).unwrap();
        assert_eq!(&output[..], &[9.5, -1.5]);
    }

    #[test]
    fn test_apply_wrong_length() {
        match fixed().apply(&[1.0, 1.0]) {
            Err(Error::DimensionMismatch { expected: 3, found: 2 }) => (),
            other => panic!("Unexpected result: {:?}", other),
        }

        assert!(fixed().apply(&[1.0; 4]).is_err());
    }

    #[test]
    fn test_apply_accumulate_adds_onto_output() {
        let mut output = vec![1.0, 1.0];
        fixed().apply_accumulate(&[1.0, 1.0, 2.0], &mut output).unwrap();
        assert_eq!(output, vec![10.5, -0.5]);
    }

    #[test]
    fn test_from_parts_rejects_bias_mismatch() {
        let result = WeightMatrix::from_parts(Matrix::zeros(3, 2), Vector::zeros(2));
        assert!(result.is_err());

        let kernel = WeightMatrix::from_parts(Matrix::zeros(3, 3), Vector::zeros(1));
        assert!(kernel.is_ok());
    }

    #[test]
    fn test_descend() {
        let mut matrix = fixed();
        let mut gradients = matrix.gradients();
        gradients.weights[(0, 1)] = 2.0;
        gradients.biases[1] = -4.0;

        matrix.descend(&gradients, 0.5);

        assert_eq!(matrix.weight(0, 1), 1.0);
        assert_eq!(matrix.bias(1), 1.0);
        assert_eq!(matrix.weight(1, 0), -1.0);

        gradients.zero();
        assert!(gradients.weights.iter().chain(gradients.biases.iter()).all(|&g| g == 0.0));
    }
}

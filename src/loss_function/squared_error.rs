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

use smallmath::vector;

use crate::loss_function::LossFunction;

/// `0.5 * (predicted - actual)^2`
pub struct SquaredErrorLossFunction;

impl LossFunction for SquaredErrorLossFunction {
    fn l(predicted: f32, actual: f32) -> f32 {
        let difference = predicted - actual;
        0.5 * difference * difference
    }

    fn l_prime(predicted: f32, actual: f32) -> f32 {
        predicted - actual
    }

    fn l_prime_vector(outputs: &[f32], targets: &[f32], loss_prime: &mut [f32]) {
        vector::ops::subtract(outputs, targets, loss_prime);
    }
}

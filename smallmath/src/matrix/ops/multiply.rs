//
// This file is part of smallmath.
//
// smallmath is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// smallmath is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with smallmath. If not, see <http://www.gnu.org/licenses/>.
//
// Copyright 2017 Chris Foster
//

use crate::matrix::Matrix;
use crate::vector;

/// y += a * x, treating `x` and `y` as column vectors.
pub fn multiply_vector(a: &Matrix, x: &[f32], y: &mut [f32]) {
    debug_assert!(a.columns() == x.len(), "Matrix columns don't match the input length!");
    debug_assert!(a.rows() == y.len(), "Matrix rows don't match the output length!");

    for (row, output) in y.iter_mut().enumerate() {
        *output += vector::ops::dot(&a[row], x);
    }
}

/// y += a.transpose() * x, without forming the transpose.
pub fn transpose_multiply_vector(a: &Matrix, x: &[f32], y: &mut [f32]) {
    debug_assert!(a.rows() == x.len(), "Matrix rows don't match the input length!");
    debug_assert!(a.columns() == y.len(), "Matrix columns don't match the output length!");

    for column in 0..a.columns() {
        let mut sum = 0.0;
        for row in 0..a.rows() {
            sum += x[row] * a[(row, column)];
        }
        y[column] += sum;
    }
}

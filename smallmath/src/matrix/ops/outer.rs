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

/// c += x * y.transpose()
pub fn outer_product(x: &[f32], y: &[f32], c: &mut Matrix) {
    debug_assert!(c.rows() == x.len() && c.columns() == y.len(), "Outer product dimensions don't match!");

    for (row, x) in x.iter().enumerate() {
        for (value, y) in c[row].iter_mut().zip(y) {
            *value += x * y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_product() {
        let mut c = Matrix::zeros(2, 2);
        outer_product(&[1.0, 2.0], &[3.0, -1.0], &mut c);
        outer_product(&[1.0, 0.0], &[1.0, 1.0], &mut c);
        assert_eq!(Vec::from(c), vec![4.0, 0.0, 6.0, -2.0]);
    }
}

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

use std::ops::{Deref, DerefMut};

/// A vector.  `Deref`s into `&[f32]`, and can be converted into a `Vec<f32>` via `into()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector {
    values: Vec<f32>,
}

impl Vector {
    /// Constructs a vector from a `Vec<f32>`.
    pub fn from_vec(values: Vec<f32>) -> Vector {
        Vector {
            values: values,
        }
    }

    pub fn zeros(size: usize) -> Vector {
        Vector::from_vec(vec![0.0; size])
    }

    /// Clears the vector to all zeros.
    pub fn zero(&mut self) {
        for value in self.values.iter_mut() {
            *value = 0.0;
        }
    }

    /// Overwrites the vector with the contents of `values`.  The lengths must match.
    pub fn copy_from(&mut self, values: &[f32]) {
        self.values.copy_from_slice(values);
    }
}

impl Deref for Vector {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.values
    }
}

impl DerefMut for Vector {
    fn deref_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }
}

impl From<Vec<f32>> for Vector {
    fn from(values: Vec<f32>) -> Vector {
        Vector::from_vec(values)
    }
}

impl From<Vector> for Vec<f32> {
    fn from(vector: Vector) -> Vec<f32> {
        vector.values
    }
}

pub mod ops;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_keeps_length() {
        let mut a = Vector::from_vec(vec![1.0, -2.0, 3.0]);
        a.zero();
        assert_eq!(&a[..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_copy_from() {
        let mut a = Vector::zeros(2);
        a.copy_from(&[4.0, 5.0]);
        assert_eq!(Vec::from(a), vec![4.0, 5.0]);
    }
}

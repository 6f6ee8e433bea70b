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

use std::ops::{Deref, DerefMut, Index, IndexMut};

use crate::vector::Vector;

/// A row-major matrix.  `Deref`s into a [`&Vector`](../vector/struct.Vector.html), and can be converted into a `Vec<f32>` via `into()`.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    values: Vector,
}

impl Matrix {
    /// Constructs a matrix from a `Vec<f32>`.
    ///
    /// # Panics
    /// Panics if the length of `values` isn't equal to `rows` times `columns`.
    pub fn from_vec(rows: usize, columns: usize, values: Vec<f32>) -> Matrix {
        assert!(values.len() == rows * columns, "Incorrect number of values for matrix!");

        Matrix {
            rows: rows,
            columns: columns,
            values: Vector::from_vec(values),
        }
    }

    pub fn zeros(rows: usize, columns: usize) -> Matrix {
        Matrix::from_vec(rows, columns, vec![0.0; rows * columns])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Borrows the matrix as a vector of length `self.rows()` * `self.columns()`.
    pub fn as_vector(&self) -> &Vector {
        &self.values
    }

    /// Mutably borrows the matrix as a vector of length `self.rows()` * `self.columns()`.
    pub fn as_vector_mut(&mut self) -> &mut Vector {
        &mut self.values
    }
}

impl Deref for Matrix {
    type Target = Vector;

    fn deref(&self) -> &Vector {
        &self.values
    }
}

impl DerefMut for Matrix {
    fn deref_mut(&mut self) -> &mut Vector {
        &mut self.values
    }
}

impl From<Matrix> for Vec<f32> {
    fn from(matrix: Matrix) -> Vec<f32> {
        matrix.values.into()
    }
}

impl Index<usize> for Matrix {
    type Output = [f32];

    /// Returns the specified row of the matrix.
    fn index(&self, index: usize) -> &[f32] {
        &self.values[index * self.columns..(index + 1) * self.columns]
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f32;

    /// Returns the specified element of the matrix.
    fn index(&self, (row, column): (usize, usize)) -> &f32 {
        debug_assert!(column < self.columns, "Column out of bounds!");
        &self.values[row * self.columns + column]
    }
}

impl IndexMut<usize> for Matrix {
    /// Returns the specified row of the matrix.
    fn index_mut(&mut self, index: usize) -> &mut [f32] {
        let columns = self.columns;
        &mut self.values[index * columns..(index + 1) * columns]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    /// Returns the specified element of the matrix.
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut f32 {
        debug_assert!(column < self.columns, "Column out of bounds!");
        let columns = self.columns;
        &mut self.values[row * columns + column]
    }
}

pub mod ops;

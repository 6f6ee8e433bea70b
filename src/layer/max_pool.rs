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

use crate::error::{self, Result};
use crate::layer::{FeatureMap, Grid, Signal};

/// Non-overlapping max pooling over a [`FeatureMap`](struct.FeatureMap.html).
///
/// Only the location of each window's maximum is stored.  Values are read back through a
/// [`PoolView`](struct.PoolView.html) of the map the pool was computed from, and gradients are routed to
/// exactly those locations.
#[derive(Clone, Debug)]
pub struct MaxPool {
    window: usize,
    rows: usize,
    columns: usize,
    /// `(x, y)` in the feature map, per pooled cell, row-major.
    sources: Vec<(usize, usize)>,
}

impl MaxPool {
    /// A pool over a `map_rows` x `map_columns` feature map.  Rows and columns past the last full window
    /// are dropped.
    ///
    /// # Panics
    /// Panics if `window` is zero.
    pub fn new(map_rows: usize, map_columns: usize, window: usize) -> MaxPool {
        assert!(window > 0, "Pooling window must be nonzero!");

        let rows = map_rows / window;
        let columns = map_columns / window;
        MaxPool {
            window: window,
            rows: rows,
            columns: columns,
            sources: vec![(0, 0); rows * columns],
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> usize {
        self.sources.len()
    }

    /// Finds the maximum axon of every window, scanning each window row by row.  A later cell only
    /// replaces the current maximum if it's strictly greater, so ties go to the first one scanned.
    pub fn compute(&mut self, map: &FeatureMap) -> Result<()> {
        error::check_dimension(self.rows, map.rows() / self.window)?;
        error::check_dimension(self.columns, map.columns() / self.window)?;

        let window = self.window;
        for py in 0..self.rows {
            for px in 0..self.columns {
                let mut source = (px * window, py * window);
                let mut maximum = map.axon(source.1, source.0);

                for y in py * window..(py + 1) * window {
                    for x in px * window..(px + 1) * window {
                        let value = map.axon(y, x);
                        if value > maximum {
                            maximum = value;
                            source = (x, y);
                        }
                    }
                }

                self.sources[py * self.columns + px] = source;
            }
        }

        Ok(())
    }

    /// The `(x, y)` feature map coordinate pooled cell `(x, y)` was taken from.
    pub fn source(&self, x: usize, y: usize) -> (usize, usize) {
        self.sources[y * self.columns + x]
    }

    /// Sources of every pooled cell, row-major.
    pub fn sources(&self) -> &[(usize, usize)] {
        &self.sources
    }

    /// Reads this pool's values out of `map`, which should be the map it was last computed from.
    pub fn view<'a>(&'a self, map: &'a FeatureMap) -> PoolView<'a> {
        debug_assert!(map.rows() / self.window == self.rows && map.columns() / self.window == self.columns, "Feature map doesn't match pool!");

        PoolView {
            pool: self,
            map: map,
        }
    }
}

/// A pooled grid, virtualized over the feature map it was pooled from.
#[derive(Clone, Copy, Debug)]
pub struct PoolView<'a> {
    pool: &'a MaxPool,
    map: &'a FeatureMap,
}

impl<'a> PoolView<'a> {
    pub fn value(&self, x: usize, y: usize) -> f32 {
        let (sx, sy) = self.pool.source(x, y);
        self.map.axon(sy, sx)
    }
}

impl<'a> Grid for PoolView<'a> {
    fn rows(&self) -> usize {
        self.pool.rows
    }

    fn columns(&self) -> usize {
        self.pool.columns
    }

    fn cell(&self, row: usize, column: usize) -> f32 {
        self.value(column, row)
    }
}

impl<'a> Signal for PoolView<'a> {
    fn len(&self) -> usize {
        self.pool.cells()
    }

    fn signal(&self, index: usize) -> f32 {
        let (sx, sy) = self.pool.sources[index];
        self.map.axon(sy, sx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use smallmath::{Matrix, Vector};

    use crate::activation_function::ActivationFunction;
    use crate::weight_matrix::WeightMatrix;

    /// A feature map whose axons are exactly `values`.
    fn map(rows: usize, columns: usize, values: Vec<f32>) -> FeatureMap {
        let identity = WeightMatrix::from_parts(Matrix::from_vec(1, 1, vec![1.0]), Vector::from_vec(vec![0.0])).unwrap();
        let mut map = FeatureMap::new(rows, columns, ActivationFunction::None);
        map.populate(&identity, &Matrix::from_vec(rows, columns, values)).unwrap();
        map
    }

    #[test]
    fn test_selects_maximum() {
        let map = map(2, 2, vec![
            1.0, 3.0,
            2.0, 0.0,
        ]);
        let mut pool = MaxPool::new(2, 2, 2);
        pool.compute(&map).unwrap();

        assert_eq!(pool.source(0, 0), (1, 0));
        assert_eq!(pool.view(&map).value(0, 0), 3.0);
    }

    #[test]
    fn test_ties_go_to_first_scanned() {
        let map = map(2, 2, vec![
            5.0, 5.0,
            1.0, 2.0,
        ]);
        let mut pool = MaxPool::new(2, 2, 2);
        pool.compute(&map).unwrap();

        assert_eq!(pool.source(0, 0), (0, 0));
    }

    #[test]
    fn test_remainder_is_never_pooled() {
        let map = map(3, 5, vec![
            0.0, 1.0, 2.0, 3.0, 9.0,
            4.0, 0.0, 0.0, 7.0, 9.0,
            9.0, 9.0, 9.0, 9.0, 9.0,
        ]);
        let mut pool = MaxPool::new(3, 5, 2);
        assert_eq!((pool.rows(), pool.columns(), pool.cells()), (1, 2, 2));

        pool.compute(&map).unwrap();
        assert_eq!(pool.sources(), &[(0, 1), (3, 1)]);

        let view = pool.view(&map);
        assert_eq!(view.cell(0, 1), 7.0);

        let mut pooled = [0.0; 2];
        view.gather(&mut pooled);
        assert_eq!(pooled, [4.0, 7.0]);
    }

    #[test]
    fn test_recomputes_every_pass() {
        let mut pool = MaxPool::new(2, 2, 2);

        let first = map(2, 2, vec![9.0, 0.0, 0.0, 0.0]);
        pool.compute(&first).unwrap();
        assert_eq!(pool.source(0, 0), (0, 0));

        let second = map(2, 2, vec![0.0, 0.0, 0.0, 9.0]);
        pool.compute(&second).unwrap();
        assert_eq!(pool.source(0, 0), (1, 1));
    }

    #[test]
    #[should_panic(expected = "Pooling window must be nonzero!")]
    fn test_zero_window() {
        MaxPool::new(4, 4, 0);
    }

    #[test]
    fn test_mismatched_map() {
        let mut pool = MaxPool::new(4, 4, 2);
        assert!(pool.compute(&map(2, 2, vec![0.0; 4])).is_err());
    }

    #[test]
    fn test_view_feeds_convolution() {
        let map = map(4, 4, vec![
            1.0, 0.0, 0.0, 2.0,
            0.0, 0.0, 0.0, 0.0,
            0.0, 0.0, 0.0, 0.0,
            3.0, 0.0, 0.0, 4.0,
        ]);
        let mut pool = MaxPool::new(4, 4, 2);
        pool.compute(&map).unwrap();

        let sum = WeightMatrix::from_parts(Matrix::from_vec(2, 2, vec![1.0; 4]), Vector::from_vec(vec![0.0])).unwrap();
        let mut stacked = FeatureMap::new(1, 1, ActivationFunction::None);
        stacked.populate(&sum, &pool.view(&map)).unwrap();
        assert_eq!(stacked.axon(0, 0), 10.0);
    }
}

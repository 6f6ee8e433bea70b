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

//! The building blocks a [`Cnn`](../struct.Cnn.html) is composed of.
//!
//! Layers don't own weights.  They hold the per-sample state (pre-activation dendrites, post-activation
//! axons, deltas) and are driven by a [`WeightMatrix`](../struct.WeightMatrix.html) passed in on each call.
//! Anything a layer can read from is exposed through [`Grid`] (2D, for convolution) or [`Signal`] (1D, for
//! dense projection), so pooled grids can be fed into either without being copied.

use smallmath::Matrix;

pub use self::convolutional::ConvolutionalLayer;
pub use self::feature_map::FeatureMap;
pub use self::fully_connected::Layer;
pub use self::max_pool::{MaxPool, PoolView};

/// A readable, row-major 2D grid of values.
pub trait Grid {
    fn rows(&self) -> usize;
    fn columns(&self) -> usize;
    fn cell(&self, row: usize, column: usize) -> f32;
}

/// A readable sequence of values.
pub trait Signal {
    fn len(&self) -> usize;
    fn signal(&self, index: usize) -> f32;

    /// The values as one contiguous slice, if they're stored that way.
    fn as_slice(&self) -> Option<&[f32]> {
        None
    }

    /// Copies every value into `buffer`, which must be exactly `self.len()` long.
    fn gather(&self, buffer: &mut [f32]) {
        debug_assert!(buffer.len() == self.len(), "Buffer length doesn't match signal length!");
        match self.as_slice() {
            Some(values) => buffer.copy_from_slice(values),
            None => {
                for (i, value) in buffer.iter_mut().enumerate() {
                    *value = self.signal(i);
                }
            },
        }
    }
}

impl Grid for Matrix {
    fn rows(&self) -> usize {
        Matrix::rows(self)
    }

    fn columns(&self) -> usize {
        Matrix::columns(self)
    }

    fn cell(&self, row: usize, column: usize) -> f32 {
        self[(row, column)]
    }
}

impl Signal for [f32] {
    fn len(&self) -> usize {
        <[f32]>::len(self)
    }

    fn signal(&self, index: usize) -> f32 {
        self[index]
    }

    fn as_slice(&self) -> Option<&[f32]> {
        Some(self)
    }
}

mod convolutional;
mod feature_map;
mod fully_connected;
mod max_pool;

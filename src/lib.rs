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

//! A small convolutional neural network trainer with hand-derived backpropagation.
//!
//! A [`Cnn`](struct.Cnn.html) convolves a square input grid with one kernel per channel, max pools each
//! feature map, projects every pooled grid into a shared hidden layer and classifies through a softmax
//! output layer.  Training is plain stochastic gradient descent, one [`Sample`](struct.Sample.html) at a
//! time.
//!
//! # Usage
//!
//! ```toml
//! [dependencies]
//! smallcnn = "0.1"
//! ```
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use smallcnn::{Cnn, Sample, SquaredErrorLossFunction};
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let mut cnn = Cnn::new(16, 12, 3, 2, &mut rng).unwrap();
//! let mut workspace = cnn.workspace();
//!
//! let sample = Sample::new(12, 12, vec![0.5; 144], vec![0.0, 1.0, 0.0]).unwrap();
//! cnn.train::<SquaredErrorLossFunction>(&sample, &mut workspace).unwrap();
//!
//! let probabilities = cnn.feed_forward(&sample, &mut workspace).unwrap();
//! assert_eq!(probabilities.len(), 3);
//! ```
//!
//! # Features
//!
//! `parallel` runs the per-channel convolution, pooling and kernel gradient work on rayon's thread pool.
//! Channels are still summed in order, so results don't depend on it.  The integration tests check
//! multi-channel steps against hand-computed values; run them with `cargo test --features parallel` to
//! cover the rayon path.

pub use smallmath::{matrix, vector, Matrix, Vector};

pub use crate::activation_function::ActivationFunction;
pub use crate::cnn::{Cnn, Sample, Workspace};
pub use crate::config::CnnConfig;
pub use crate::error::{Error, Result};
pub use crate::loss_function::{LossFunction, SquaredErrorLossFunction};
pub use crate::weight_matrix::{Gradients, WeightMatrix};

pub mod activation_function;
mod cnn;
mod config;
mod error;
pub mod layer;
pub mod loss_function;
mod serialization;
mod weight_matrix;

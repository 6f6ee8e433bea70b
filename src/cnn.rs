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

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use smallmath::{vector, Matrix, Vector};

use crate::activation_function::{self, ActivationFunction};
use crate::config::CnnConfig;
use crate::error::{self, Error, Result};
use crate::layer::{ConvolutionalLayer, Layer};
use crate::loss_function::LossFunction;
use crate::serialization::{Reader, Serializable};
use crate::weight_matrix::{Gradients, WeightMatrix};

/// One training example: a 2D input grid and the output vector it should produce.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    input: Matrix,
    expected: Vector,
}

impl Sample {
    pub fn new(rows: usize, columns: usize, input: Vec<f32>, expected: Vec<f32>) -> Result<Sample> {
        error::check_dimension(rows * columns, input.len())?;

        Ok(Sample {
            input: Matrix::from_vec(rows, columns, input),
            expected: Vector::from_vec(expected),
        })
    }

    pub fn input(&self) -> &Matrix {
        &self.input
    }

    pub fn expected(&self) -> &[f32] {
        &self.expected
    }
}

/// A single-stage convolutional network: `map_count` channels of convolution and max pooling, each
/// projected into one shared hidden layer, followed by a softmax output layer.
///
/// A `Cnn` only holds weights.  Everything that changes from sample to sample lives in a
/// [`Workspace`](struct.Workspace.html) created by [`workspace`](#method.workspace).
#[derive(Clone, Debug, PartialEq)]
pub struct Cnn {
    config: CnnConfig,
    hidden_nodes: usize,
    output_width: usize,
    kernels: Vec<WeightMatrix>,
    pool_weights: Vec<WeightMatrix>,
    output_weights: WeightMatrix,
}

impl Cnn {
    /// A randomly initialized network over `input_size` x `input_size` inputs, otherwise using the default
    /// [`CnnConfig`](struct.CnnConfig.html).
    pub fn new<R>(
        hidden_nodes: usize,
        input_size: usize,
        output_width: usize,
        map_count: usize,
        rng: &mut R,
    ) -> Result<Cnn> where R: Rng {
        let config = CnnConfig {
            input_size: input_size,
            ..CnnConfig::default()
        };

        Cnn::with_config(config, hidden_nodes, output_width, map_count, rng)
    }

    pub fn with_config<R>(
        config: CnnConfig,
        hidden_nodes: usize,
        output_width: usize,
        map_count: usize,
        rng: &mut R,
    ) -> Result<Cnn> where R: Rng {
        config.validate()?;
        check_topology(hidden_nodes, map_count)?;
        if output_width == 0 {
            return error::config_error("Output width must be nonzero");
        }

        let kernels = (0..map_count).map(|_| WeightMatrix::convolution(config.subimage_size, rng)).collect::<Vec<_>>();
        let pool_weights = (0..map_count).map(|_| WeightMatrix::new(config.pooled_cells(), hidden_nodes, rng)).collect::<Vec<_>>();
        let output_weights = WeightMatrix::new(hidden_nodes, output_width, rng);

        let cnn = Cnn {
            config: config,
            hidden_nodes: hidden_nodes,
            output_width: output_width,
            kernels: kernels,
            pool_weights: pool_weights,
            output_weights: output_weights,
        };
        cnn.log_topology("Initialized network");
        Ok(cnn)
    }

    /// Loads a network over the default [`CnnConfig`](struct.CnnConfig.html) from the text weight format.
    pub fn from_weights(hidden_nodes: usize, map_count: usize, text: &str) -> Result<Cnn> {
        Cnn::from_weights_with_config(CnnConfig::default(), hidden_nodes, map_count, text)
    }

    /// Loads a network from `map_count` kernel blocks, `map_count` pool->hidden blocks and one
    /// hidden->output block, in that order.  Every block's shape is checked against `config`; the output
    /// width is taken from the last block.
    pub fn from_weights_with_config(config: CnnConfig, hidden_nodes: usize, map_count: usize, text: &str) -> Result<Cnn> {
        config.validate()?;
        check_topology(hidden_nodes, map_count)?;

        let mut reader = Reader::new(text);

        let mut kernels = Vec::with_capacity(map_count);
        for _ in 0..map_count {
            kernels.push(read_matrix(&mut reader, "kernel", config.subimage_size, Some(config.subimage_size), Some(1))?);
        }

        let mut pool_weights = Vec::with_capacity(map_count);
        for _ in 0..map_count {
            pool_weights.push(read_matrix(&mut reader, "pool weights", config.pooled_cells(), Some(hidden_nodes), None)?);
        }

        let output_weights = read_matrix(&mut reader, "output weights", hidden_nodes, None, None)?;

        reader.finish()?;

        let cnn = Cnn {
            config: config,
            hidden_nodes: hidden_nodes,
            output_width: output_weights.height(),
            kernels: kernels,
            pool_weights: pool_weights,
            output_weights: output_weights,
        };
        cnn.log_topology("Loaded network weights");
        Ok(cnn)
    }

    pub fn read_weights<R>(config: CnnConfig, hidden_nodes: usize, map_count: usize, reader: &mut R) -> Result<Cnn> where R: Read {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Cnn::from_weights_with_config(config, hidden_nodes, map_count, &text)
    }

    pub fn from_file<P>(config: CnnConfig, hidden_nodes: usize, map_count: usize, path: P) -> Result<Cnn> where P: AsRef<Path> {
        Cnn::from_weights_with_config(config, hidden_nodes, map_count, &fs::read_to_string(path)?)
    }

    pub fn serialize_weights(&self) -> String {
        let mut output = String::new();
        for kernel in &self.kernels {
            kernel.write_to(&mut output);
        }
        for weights in &self.pool_weights {
            weights.write_to(&mut output);
        }
        self.output_weights.write_to(&mut output);
        output
    }

    pub fn write_weights<W>(&self, writer: &mut W) -> Result<()> where W: Write {
        writer.write_all(self.serialize_weights().as_bytes())?;
        Ok(())
    }

    pub fn to_file<P>(&self, path: P) -> Result<()> where P: AsRef<Path> {
        fs::write(path, self.serialize_weights())?;
        Ok(())
    }

    pub fn config(&self) -> &CnnConfig {
        &self.config
    }

    pub fn hidden_nodes(&self) -> usize {
        self.hidden_nodes
    }

    pub fn output_width(&self) -> usize {
        self.output_width
    }

    pub fn map_count(&self) -> usize {
        self.kernels.len()
    }

    pub fn kernels(&self) -> &[WeightMatrix] {
        &self.kernels
    }

    pub fn pool_weights(&self) -> &[WeightMatrix] {
        &self.pool_weights
    }

    pub fn output_weights(&self) -> &WeightMatrix {
        &self.output_weights
    }

    /// Allocates every buffer a forward and backward pass through this network needs.
    pub fn workspace(&self) -> Workspace {
        let config = &self.config;

        let mut output = Layer::new(self.output_width, ActivationFunction::None);
        output.make_constant();

        Workspace {
            input: Matrix::zeros(config.input_size, config.input_size),
            expected: Vector::zeros(self.output_width),
            channels: (0..self.map_count())
                .map(|_| ConvolutionalLayer::new(config.feature_size(), config.max_pool_size, config.feature_activation))
                .collect(),
            hidden: Layer::new(self.hidden_nodes, config.hidden_activation),
            output: output,
            probabilities: Vector::zeros(self.output_width),
            softmax_derivatives: Vector::zeros(self.output_width),
            kernel_gradients: self.kernels.iter().map(WeightMatrix::gradients).collect(),
            pool_gradients: self.pool_weights.iter().map(WeightMatrix::gradients).collect(),
            output_gradients: self.output_weights.gradients(),
        }
    }

    /// Runs `sample` through the network and returns the softmax output.  Every intermediate value, along
    /// with the sample itself, stays in `workspace` for a following
    /// [`back_propagate`](#method.back_propagate).
    pub fn feed_forward<'w>(&self, sample: &Sample, workspace: &'w mut Workspace) -> Result<&'w [f32]> {
        self.check_workspace(workspace)?;
        error::check_dimension(self.config.input_size, sample.input.rows())?;
        error::check_dimension(self.config.input_size, sample.input.columns())?;
        error::check_dimension(self.output_width, sample.expected.len())?;

        workspace.input.as_vector_mut().copy_from(&sample.input);
        workspace.expected.copy_from(&sample.expected);

        self.convolve(workspace)?;

        workspace.hidden.zero();
        for (channel, weights) in workspace.channels.iter().zip(&self.pool_weights) {
            workspace.hidden.accumulate(weights, channel.pooled())?;
        }
        workspace.hidden.apply_activation_function();

        workspace.output.populate(&self.output_weights, &workspace.hidden)?;
        activation_function::softmax(workspace.output.axons(), &mut workspace.probabilities);

        Ok(&workspace.probabilities)
    }

    /// Computes every delta from the state the last [`feed_forward`](#method.feed_forward) left in
    /// `workspace`, then takes one gradient descent step on all weights.
    ///
    /// The workspace isn't consumed, so calling this twice in a row applies the same step twice.
    pub fn back_propagate<L>(&mut self, workspace: &mut Workspace) -> Result<()> where L: LossFunction {
        self.check_workspace(workspace)?;

        // Output deltas: L'(z, expected) * z(1 - z)
        L::l_prime_vector(&workspace.probabilities, &workspace.expected, workspace.output.deltas_mut());
        activation_function::softmax_prime_output(&workspace.probabilities, &mut workspace.softmax_derivatives);
        vector::ops::multiply_assign(workspace.output.deltas_mut(), &workspace.softmax_derivatives);

        workspace.hidden.compute_deltas(&self.output_weights, workspace.output.deltas())?;

        self.channel_gradients(workspace)?;

        for (channel, gradients) in workspace.channels.iter().zip(workspace.pool_gradients.iter_mut()) {
            gradients.zero();
            workspace.hidden.accumulate_gradients(channel.pooled(), gradients)?;
        }

        workspace.output_gradients.zero();
        workspace.output.accumulate_gradients(workspace.hidden.axons(), &mut workspace.output_gradients)?;

        let rate = self.config.learning_rate;
        for (kernel, gradients) in self.kernels.iter_mut().zip(&workspace.kernel_gradients) {
            kernel.descend(gradients, rate);
        }
        for (weights, gradients) in self.pool_weights.iter_mut().zip(&workspace.pool_gradients) {
            weights.descend(gradients, rate);
        }
        self.output_weights.descend(&workspace.output_gradients, rate);

        trace!(loss = L::total(&workspace.probabilities, &workspace.expected), "Back propagated sample");
        Ok(())
    }

    /// [`feed_forward`](#method.feed_forward) followed by [`back_propagate`](#method.back_propagate).
    pub fn train<L>(&mut self, sample: &Sample, workspace: &mut Workspace) -> Result<()> where L: LossFunction {
        self.feed_forward(sample, workspace)?;
        self.back_propagate::<L>(workspace)
    }

    /// Total loss of the last output in `workspace` against its sample's expected output.
    pub fn loss<L>(&self, workspace: &Workspace) -> f32 where L: LossFunction {
        L::total(&workspace.probabilities, &workspace.expected)
    }

    /// Per-output loss of the last output in `workspace`, written into `errors`.
    pub fn errors<L>(&self, workspace: &Workspace, errors: &mut [f32]) -> Result<()> where L: LossFunction {
        error::check_dimension(self.output_width, errors.len())?;
        error::check_dimension(self.output_width, workspace.probabilities.len())?;

        L::l_vector(&workspace.probabilities, &workspace.expected, errors);
        Ok(())
    }

    #[cfg(not(feature = "parallel"))]
    fn convolve(&self, workspace: &mut Workspace) -> Result<()> {
        let input = &workspace.input;
        for (channel, kernel) in workspace.channels.iter_mut().zip(&self.kernels) {
            channel.feed_forward(kernel, input)?;
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn convolve(&self, workspace: &mut Workspace) -> Result<()> {
        let input = &workspace.input;
        workspace.channels.par_iter_mut()
            .zip(self.kernels.par_iter())
            .try_for_each(|(channel, kernel)| channel.feed_forward(kernel, input))
    }

    /// Feature deltas and kernel gradients, per channel.
    #[cfg(not(feature = "parallel"))]
    fn channel_gradients(&self, workspace: &mut Workspace) -> Result<()> {
        let hidden_deltas = workspace.hidden.deltas();
        let input = &workspace.input;
        let channels = workspace.channels.iter_mut().zip(&self.pool_weights).zip(workspace.kernel_gradients.iter_mut());
        for ((channel, pool_weights), gradients) in channels {
            channel.compute_deltas(pool_weights, hidden_deltas)?;
            gradients.zero();
            channel.accumulate_kernel_gradients(input, gradients)?;
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn channel_gradients(&self, workspace: &mut Workspace) -> Result<()> {
        let hidden_deltas = workspace.hidden.deltas();
        let input = &workspace.input;
        workspace.channels.par_iter_mut()
            .zip(self.pool_weights.par_iter())
            .zip(workspace.kernel_gradients.par_iter_mut())
            .try_for_each(|((channel, pool_weights), gradients)| {
                channel.compute_deltas(pool_weights, hidden_deltas)?;
                gradients.zero();
                channel.accumulate_kernel_gradients(input, gradients)
            })
    }

    fn check_workspace(&self, workspace: &Workspace) -> Result<()> {
        error::check_dimension(self.map_count(), workspace.channels.len())?;
        error::check_dimension(self.config.input_size, workspace.input.rows())?;
        error::check_dimension(self.hidden_nodes, workspace.hidden.size())?;
        error::check_dimension(self.output_width, workspace.output.size())?;
        for channel in &workspace.channels {
            error::check_dimension(self.config.pooled_cells(), channel.pooled().len())?;
        }
        Ok(())
    }

    fn log_topology(&self, message: &str) {
        debug!(
            map_count = self.map_count(),
            hidden_nodes = self.hidden_nodes,
            output_width = self.output_width,
            feature_size = self.config.feature_size(),
            pooled_size = self.config.pooled_size(),
            "{}",
            message
        );
    }
}

/// Per-sample state for one [`Cnn`](struct.Cnn.html): the retained input and expected output, every
/// layer's activations and deltas, and gradient buffers for every weight matrix.  Allocated once and
/// overwritten by each pass.
#[derive(Clone, Debug)]
pub struct Workspace {
    input: Matrix,
    expected: Vector,
    channels: Vec<ConvolutionalLayer>,
    hidden: Layer,
    output: Layer,
    probabilities: Vector,
    softmax_derivatives: Vector,
    kernel_gradients: Vec<Gradients>,
    pool_gradients: Vec<Gradients>,
    output_gradients: Gradients,
}

impl Workspace {
    pub fn input(&self) -> &Matrix {
        &self.input
    }

    pub fn expected(&self) -> &[f32] {
        &self.expected
    }

    pub fn channels(&self) -> &[ConvolutionalLayer] {
        &self.channels
    }

    /// For setting per-channel feedback on `AdaReLu` feature maps.
    ///
    /// # Panics
    /// Panics if `index` isn't less than the network's map count.
    pub fn channel_mut(&mut self, index: usize) -> &mut ConvolutionalLayer {
        &mut self.channels[index]
    }

    pub fn hidden(&self) -> &Layer {
        &self.hidden
    }

    /// The output layer before the softmax.
    pub fn output(&self) -> &Layer {
        &self.output
    }

    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }
}

fn check_topology(hidden_nodes: usize, map_count: usize) -> Result<()> {
    if hidden_nodes == 0 {
        return error::config_error("Hidden node count must be nonzero");
    }
    if map_count == 0 {
        return error::config_error("Map count must be nonzero");
    }
    Ok(())
}

/// Reads one block and checks its shape.  Shape errors point at the block's header line.
fn read_matrix(
    reader: &mut Reader,
    name: &str,
    width: usize,
    height: Option<usize>,
    bias_count: Option<usize>,
) -> Result<WeightMatrix> {
    let header = reader.line() + 1;
    let matrix = WeightMatrix::read_from(reader)?;
    let height = height.unwrap_or_else(|| matrix.height());
    let bias_count = bias_count.unwrap_or(height);

    if matrix.width() != width || matrix.height() != height || matrix.bias_count() != bias_count {
        return Err(Error::Format {
            line: header,
            message: format!(
                "Expected {} of width {}, height {} and {} biases, found {} x {} with {} biases",
                name,
                width,
                height,
                bias_count,
                matrix.width(),
                matrix.height(),
                matrix.bias_count(),
            ),
        });
    }

    Ok(matrix)
}

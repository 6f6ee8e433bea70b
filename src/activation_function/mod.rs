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

//! The closed set of activation functions shared by every layer, selected by tag.
//!
//! Each function comes with two derivatives: [`f_prime`](enum.ActivationFunction.html#method.f_prime) takes the
//! pre-activation input, and [`f_prime_output`](enum.ActivationFunction.html#method.f_prime_output) takes the
//! already-computed output of the function.  The backward pass only ever has outputs on hand, so it uses the latter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{self, Error, Result};

pub use self::relu::{ada_relu, ada_relu_prime, relu, relu_prime, RELU_CEILING};
pub use self::sigmoid::{double_sigmoid, double_sigmoid_prime, sigmoid, sigmoid_prime};
pub use self::softmax::{softmax, softmax_prime_output, SOFTMAX_INFINITY_SUBSTITUTE, SOFTMAX_NAN_SUBSTITUTE};
pub use self::tanh::{tanh, tanh_prime};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivationFunction {
    /// Identity.  Used where no nonlinearity is wanted.
    #[serde(rename = "none")]
    None,
    #[serde(rename = "sigmoid")]
    Sigmoid,
    /// Sigmoid scaled to [-1, 1].
    #[serde(rename = "double_sigmoid")]
    DoubleSigmoid,
    #[serde(rename = "tanh")]
    TanH,
    #[serde(rename = "relu")]
    ReLu,
    /// ReLU conditioned on the sign of an external feedback value.
    #[serde(rename = "ada_relu")]
    AdaReLu,
}

impl ActivationFunction {
    pub const ALL: [ActivationFunction; 6] = [
        ActivationFunction::None,
        ActivationFunction::Sigmoid,
        ActivationFunction::DoubleSigmoid,
        ActivationFunction::TanH,
        ActivationFunction::ReLu,
        ActivationFunction::AdaReLu,
    ];

    pub fn identifier(&self) -> &'static str {
        match *self {
            ActivationFunction::None => "none",
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::DoubleSigmoid => "double_sigmoid",
            ActivationFunction::TanH => "tanh",
            ActivationFunction::ReLu => "relu",
            ActivationFunction::AdaReLu => "ada_relu",
        }
    }

    /// Without feedback, `AdaReLu` behaves like `ReLu`.
    pub fn f(&self, x: f32) -> f32 {
        match *self {
            ActivationFunction::None => x,
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::DoubleSigmoid => double_sigmoid(x),
            ActivationFunction::TanH => tanh(x),
            ActivationFunction::ReLu | ActivationFunction::AdaReLu => relu(x),
        }
    }

    pub fn f_prime(&self, x: f32) -> f32 {
        match *self {
            ActivationFunction::None => 1.0,
            ActivationFunction::Sigmoid => sigmoid_prime(x),
            ActivationFunction::DoubleSigmoid => double_sigmoid_prime(x),
            ActivationFunction::TanH => tanh_prime(x),
            ActivationFunction::ReLu | ActivationFunction::AdaReLu => relu_prime(x),
        }
    }

    /// The derivative expressed in terms of `y = f(x)`.
    pub fn f_prime_output(&self, y: f32) -> f32 {
        match *self {
            ActivationFunction::None => 1.0,
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::DoubleSigmoid => 0.5 * (1.0 - y * y),
            ActivationFunction::TanH => 1.0 - y * y,
            ActivationFunction::ReLu | ActivationFunction::AdaReLu => if y > 0.0 { 1.0 } else { 0.0 },
        }
    }

    /// Only `AdaReLu` reads `feedback`; every other function ignores it.
    pub fn f_feedback(&self, x: f32, feedback: f32) -> f32 {
        match *self {
            ActivationFunction::AdaReLu => ada_relu(x, feedback),
            _ => self.f(x),
        }
    }

    pub fn f_prime_feedback(&self, x: f32, feedback: f32) -> f32 {
        match *self {
            ActivationFunction::AdaReLu => ada_relu_prime(x, feedback),
            _ => self.f_prime(x),
        }
    }

    pub fn f_vector(&self, inputs: &[f32], outputs: &mut [f32]) {
        debug_assert!(inputs.len() == outputs.len(), "inputs.len() doesn't match outputs.len()!");
        for (output, input) in outputs.iter_mut().zip(inputs) {
            *output = self.f(*input);
        }
    }

    pub fn f_prime_output_vector(&self, outputs: &[f32], derivatives: &mut [f32]) {
        debug_assert!(outputs.len() == derivatives.len(), "outputs.len() doesn't match derivatives.len()!");
        for (derivative, output) in derivatives.iter_mut().zip(outputs) {
            *derivative = self.f_prime_output(*output);
        }
    }
}

impl Default for ActivationFunction {
    fn default() -> ActivationFunction {
        ActivationFunction::ReLu
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl FromStr for ActivationFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<ActivationFunction> {
        ActivationFunction::ALL.iter()
            .find(|function| function.identifier() == s)
            .cloned()
            .map_or_else(|| error::config_error(&format!("Unknown activation function \"{}\"", s)), Ok)
    }
}

mod relu;
mod sigmoid;
mod softmax;
mod tanh;

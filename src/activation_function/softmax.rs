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

use tracing::warn;

/// Stands in for an exponential that overflowed to infinity.
pub const SOFTMAX_INFINITY_SUBSTITUTE: f32 = 5.0;
/// Stands in for an exponential that came out NaN.
pub const SOFTMAX_NAN_SUBSTITUTE: f32 = -5.0;

/// `outputs[i] = exp(inputs[i]) / sum(exp(inputs))`.
///
/// This is not the max-shifted log-sum-exp form.  An exponential that overflows is replaced by
/// [`SOFTMAX_INFINITY_SUBSTITUTE`] and a NaN one by [`SOFTMAX_NAN_SUBSTITUTE`] before the sum is taken.  The
/// result is lossy in those cases (a NaN input can even produce values outside [0, 1]) but always finite
/// when at least one exponential is.
pub fn softmax(inputs: &[f32], outputs: &mut [f32]) {
    debug_assert!(inputs.len() == outputs.len(), "inputs.len() doesn't match outputs.len()!");

    let mut sum = 0.0;
    for (output, input) in outputs.iter_mut().zip(inputs) {
        let mut e = input.exp();
        if e.is_infinite() {
            warn!(input = *input, "softmax exponential overflowed, substituting {}", SOFTMAX_INFINITY_SUBSTITUTE);
            e = SOFTMAX_INFINITY_SUBSTITUTE;
        } else if e.is_nan() {
            warn!("softmax exponential is NaN, substituting {}", SOFTMAX_NAN_SUBSTITUTE);
            e = SOFTMAX_NAN_SUBSTITUTE;
        }

        *output = e;
        sum += e;
    }

    for output in outputs.iter_mut() {
        *output /= sum;
    }
}

/// The diagonal of the softmax Jacobian, `z * (1 - z)`, given softmax outputs `z`.  The off-diagonal
/// `-z_i * z_j` terms are deliberately left out.
pub fn softmax_prime_output(outputs: &[f32], derivatives: &mut [f32]) {
    debug_assert!(outputs.len() == derivatives.len(), "outputs.len() doesn't match derivatives.len()!");

    for (i, (derivative, z)) in derivatives.iter_mut().zip(outputs).enumerate() {
        *derivative = z * (1.0 - z);

        if derivative.is_nan() {
            warn!(index = i, "softmax derivative is NaN");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_softmax_is_a_distribution() {
        let inputs = [
            vec![0.0],
            vec![1.0, 2.0, 3.0],
            vec![-40.0, 0.5, 12.0, 80.0],
            vec![-3.0, -3.0, -3.0, -3.0, -3.0],
        ];

        for input in inputs.iter() {
            let mut output = vec![0.0; input.len()];
            softmax(input, &mut output);

            assert_relative_eq!(output.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
            assert!(output.iter().all(|&z| z >= 0.0 && z <= 1.0));
        }
    }

    #[test]
    fn test_softmax_values() {
        let mut output = vec![0.0; 2];
        softmax(&[0.0, 2.0f32.ln()], &mut output);
        assert_relative_eq!(output[0], 1.0 / 3.0, epsilon = 1e-6);
        assert_relative_eq!(output[1], 2.0 / 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_overflow_substitute() {
        let mut output = vec![0.0; 2];
        softmax(&[1000.0, 0.0], &mut output);
        assert_relative_eq!(output[0], 5.0 / 6.0, epsilon = 1e-6);
        assert_relative_eq!(output[1], 1.0 / 6.0, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_nan_substitute() {
        let mut output = vec![0.0; 2];
        softmax(&[f32::NAN, 0.0], &mut output);
        assert_relative_eq!(output[0], 1.25, epsilon = 1e-6);
        assert_relative_eq!(output[1], -0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_softmax_prime_output_is_diagonal() {
        let mut derivatives = vec![0.0; 3];
        softmax_prime_output(&[0.5, 0.25, 0.25], &mut derivatives);
        assert_eq!(derivatives, vec![0.25, 0.1875, 0.1875]);
    }

    #[test]
    fn test_softmax_prime_output_passes_nan_through() {
        let mut derivatives = vec![0.0; 2];
        softmax_prime_output(&[f32::NAN, 0.5], &mut derivatives);
        assert!(derivatives[0].is_nan());
        assert_eq!(derivatives[1], 0.25);
    }
}

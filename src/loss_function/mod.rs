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

pub use self::squared_error::SquaredErrorLossFunction;

/// A loss and its derivative with respect to the prediction.  Implement this to plug a new loss
/// into [`Cnn::back_propagate`](../struct.Cnn.html#method.back_propagate).
pub trait LossFunction {
    fn l(predicted: f32, actual: f32) -> f32;
    fn l_prime(predicted: f32, actual: f32) -> f32;

    fn l_vector(outputs: &[f32], targets: &[f32], loss: &mut [f32]) {
        debug_assert!(outputs.len() == targets.len() && outputs.len() == loss.len(), "Vector dimensions don't match!");
        for i in 0..outputs.len() {
            loss[i] = Self::l(outputs[i], targets[i]);
        }
    }

    fn l_prime_vector(outputs: &[f32], targets: &[f32], loss_prime: &mut [f32]) {
        debug_assert!(outputs.len() == targets.len() && outputs.len() == loss_prime.len(), "Vector dimensions don't match!");
        for i in 0..outputs.len() {
            loss_prime[i] = Self::l_prime(outputs[i], targets[i]);
        }
    }

    fn total(outputs: &[f32], targets: &[f32]) -> f32 {
        debug_assert!(outputs.len() == targets.len(), "Vector dimensions don't match!");
        outputs.iter().zip(targets).map(|(&output, &target)| Self::l(output, target)).sum()
    }
}

mod squared_error;

#[cfg(test)]
mod tests {
    use super::*;

    struct AbsoluteErrorLossFunction;

    impl LossFunction for AbsoluteErrorLossFunction {
        fn l(predicted: f32, actual: f32) -> f32 {
            (predicted - actual).abs()
        }

        fn l_prime(predicted: f32, actual: f32) -> f32 {
            (predicted - actual).signum()
        }
    }

    #[test]
    fn test_custom_loss_gets_vector_forms() {
        let mut loss = vec![0.0; 3];
        AbsoluteErrorLossFunction::l_vector(&[1.0, 0.0, 0.5], &[0.0, 1.0, 0.5], &mut loss);
        assert_eq!(loss, vec![1.0, 1.0, 0.0]);

        AbsoluteErrorLossFunction::l_prime_vector(&[1.0, 0.0, 0.5], &[0.0, 1.0, 0.25], &mut loss);
        assert_eq!(loss, vec![1.0, -1.0, 1.0]);

        assert_eq!(AbsoluteErrorLossFunction::total(&[1.0, 0.0], &[0.0, 1.0]), 2.0);
    }
}

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

/// Inputs that are NaN or larger than this are clamped to it before thresholding, so a runaway
/// accumulation saturates instead of poisoning every later layer.
pub const RELU_CEILING: f32 = 100.0;

pub fn relu(x: f32) -> f32 {
    let x = if x.is_nan() || x > RELU_CEILING {
        RELU_CEILING
    } else {
        x
    };

    if x > 0.0 { x } else { 0.0 }
}

pub fn relu_prime(x: f32) -> f32 {
    if x > 0.0 { 1.0 } else { 0.0 }
}

pub fn ada_relu(x: f32, feedback: f32) -> f32 {
    if feedback >= 0.0 {
        relu(x)
    } else {
        relu(-x)
    }
}

pub fn ada_relu_prime(x: f32, feedback: f32) -> f32 {
    if feedback >= 0.0 {
        relu_prime(x)
    } else {
        relu_prime(-x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_clamps_then_thresholds() {
        assert_eq!(relu(f32::NAN), 100.0);
        assert_eq!(relu(150.0), 100.0);
        assert_eq!(relu(f32::INFINITY), 100.0);
        assert_eq!(relu(-5.0), 0.0);
        assert_eq!(relu(5.0), 5.0);
        assert_eq!(relu(100.0), 100.0);
    }

    #[test]
    fn test_relu_prime() {
        assert_eq!(relu_prime(3.0), 1.0);
        assert_eq!(relu_prime(0.0), 0.0);
        assert_eq!(relu_prime(-3.0), 0.0);
    }

    #[test]
    fn test_ada_relu_mirrors_on_negative_feedback() {
        assert_eq!(ada_relu(4.0, 0.0), 4.0);
        assert_eq!(ada_relu(4.0, -0.5), 0.0);
        assert_eq!(ada_relu(-4.0, -0.5), 4.0);
        assert_eq!(ada_relu(f32::NAN, -1.0), 100.0);

        assert_eq!(ada_relu_prime(-4.0, -0.5), 1.0);
        assert_eq!(ada_relu_prime(-4.0, 0.5), 0.0);
    }
}

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

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

pub fn sigmoid_prime(x: f32) -> f32 {
    let y = sigmoid(x);
    y * (1.0 - y)
}

/// Sigmoid stretched onto [-1, 1].
pub fn double_sigmoid(x: f32) -> f32 {
    2.0 / (1.0 + (-x).exp()) - 1.0
}

pub fn double_sigmoid_prime(x: f32) -> f32 {
    let y = double_sigmoid(x);
    0.5 * (1.0 - y * y)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_sigmoid() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(2.0), 0.880797, epsilon = 1e-6);
        assert_relative_eq!(sigmoid(-2.0), 1.0 - sigmoid(2.0), epsilon = 1e-6);
        assert_eq!(sigmoid_prime(0.0), 0.25);
    }

    #[test]
    fn test_double_sigmoid_range() {
        assert_eq!(double_sigmoid(0.0), 0.0);
        assert_relative_eq!(double_sigmoid(50.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(double_sigmoid(-50.0), -1.0, epsilon = 1e-6);
        assert_eq!(double_sigmoid_prime(0.0), 0.5);
    }
}

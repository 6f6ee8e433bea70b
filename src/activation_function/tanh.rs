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

pub fn tanh(x: f32) -> f32 {
    x.tanh()
}

pub fn tanh_prime(x: f32) -> f32 {
    // f' = 1.0 - f * f
    let y = x.tanh();
    1.0 - y * y
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn test_tanh() {
        assert_eq!(tanh(0.0), 0.0);
        assert_relative_eq!(tanh(0.5), 0.462117, epsilon = 1e-6);
        assert_eq!(tanh_prime(0.0), 1.0);
        assert_relative_eq!(tanh_prime(0.5), 1.0 - 0.462117 * 0.462117, epsilon = 1e-5);
    }
}

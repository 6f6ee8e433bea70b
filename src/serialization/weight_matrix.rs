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

use std::fmt::Write;

use smallmath::{Matrix, Vector};

use crate::error::Result;
use crate::serialization::{parse_token, read_error, Reader, Serializable};
use crate::weight_matrix::WeightMatrix;

// Header: "<width> <height> <bias count>"
// Then one line per row: "<width weights> <bias>".  Only the first <bias count> rows carry a bias, so a
// kernel's single shared bias sits at the end of its first row.
impl Serializable for WeightMatrix {
    fn read_from(reader: &mut Reader) -> Result<WeightMatrix> {
        let (width, height, bias_count) = {
            let strings = reader.read_line()?;

            if strings.len() != 3 {
                return read_error(reader, "Expected \"<width> <height> <bias count>\"!");
            }

            (
                parse_token::<usize>(reader, strings[0], "Cannot parse matrix width!")?,
                parse_token::<usize>(reader, strings[1], "Cannot parse matrix height!")?,
                parse_token::<usize>(reader, strings[2], "Cannot parse bias count!")?,
            )
        };

        if width == 0 || height == 0 {
            return read_error(reader, "Matrix dimensions must be nonzero!");
        }

        if bias_count != height && bias_count != 1 {
            return read_error(reader, "Bias count must be 1 or equal to the matrix height!");
        }

        if width.checked_mul(height).is_none() {
            return read_error(reader, "Matrix dimensions are too large!");
        }

        // The header is untrusted, so buffers grow with the rows actually read.
        let mut weights = Vec::new();
        let mut biases = Vec::new();
        for row in 0..height {
            let strings = reader.read_line()?;
            let has_bias = row < bias_count;
            let expected = if has_bias { width.checked_add(1) } else { Some(width) };

            if expected != Some(strings.len()) {
                return read_error(reader, &format!(
                    "Expected {} weights{}, found {} values!",
                    width,
                    if has_bias { " and a bias" } else { "" },
                    strings.len(),
                ));
            }

            for token in &strings[..width] {
                weights.push(parse_token::<f32>(reader, token, "Cannot parse weight!")?);
            }

            if has_bias {
                biases.push(parse_token::<f32>(reader, strings[width], "Cannot parse bias!")?);
            }
        }

        Ok(WeightMatrix {
            weights: Matrix::from_vec(height, width, weights),
            biases: Vector::from_vec(biases),
        })
    }

    fn write_to(&self, output: &mut String) {
        // Writing into a String can't fail.
        let _ = writeln!(output, "{} {} {}", self.width(), self.height(), self.bias_count());
        for row in 0..self.height() {
            let mut values = self.weights[row].iter();
            if let Some(first) = values.next() {
                let _ = write!(output, "{}", first);
            }
            for value in values {
                let _ = write!(output, " {}", value);
            }
            if row < self.bias_count() {
                let _ = write!(output, " {}", self.biases[row]);
            }
            output.push('\n');
        }
    }
}

impl WeightMatrix {
    /// Parses exactly one matrix block.
    pub fn parse(text: &str) -> Result<WeightMatrix> {
        let mut reader = Reader::new(text);
        let matrix = WeightMatrix::read_from(&mut reader)?;
        reader.finish()?;
        Ok(matrix)
    }

    pub fn serialize(&self) -> String {
        let mut output = String::new();
        self.write_to(&mut output);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::error::Error;

    fn assert_format_error<T>(result: Result<T>, expected_line: usize) where T: std::fmt::Debug {
        match result {
            Err(Error::Format { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("Expected a format error, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_layout() {
        let matrix = WeightMatrix::from_parts(
            Matrix::from_vec(2, 3, vec![0.5, -1.0, 2.0, 0.25, 0.0, -0.125]),
            Vector::from_vec(vec![1.5, -2.0]),
        ).unwrap();

        assert_eq!(matrix.serialize(), "3 2 2\n0.5 -1 2 1.5\n0.25 0 -0.125 -2\n");
    }

    #[test]
    fn test_serialize_kernel_layout() {
        let kernel = WeightMatrix::from_parts(
            Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]),
            Vector::from_vec(vec![0.5]),
        ).unwrap();

        assert_eq!(kernel.serialize(), "2 2 1\n1 2 0.5\n3 4\n");
    }

    #[test]
    fn test_round_trip() {
        let mut rng = StdRng::seed_from_u64(3);

        for matrix in vec![WeightMatrix::new(7, 4, &mut rng), WeightMatrix::convolution(5, &mut rng)] {
            let parsed = WeightMatrix::parse(&matrix.serialize()).unwrap();
            assert_eq!(parsed, matrix);
        }
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let matrix = WeightMatrix::parse("2 1 1\n  1.0   2.0 3.0  \n\n").unwrap();
        assert_eq!(&matrix.weights().as_vector()[..], &[1.0, 2.0]);
        assert_eq!(&matrix.biases()[..], &[3.0]);
    }

    #[test]
    fn test_parse_rejects_bad_header() {
        assert_format_error(WeightMatrix::parse("2 1\n1 2 3\n"), 1);
        assert_format_error(WeightMatrix::parse("2 x 1\n1 2 3\n"), 1);
        assert_format_error(WeightMatrix::parse("2 3 2\n1 2 3\n1 2 3\n1 2\n"), 1);
        assert_format_error(WeightMatrix::parse("0 1 1\n3\n"), 1);
    }

    #[test]
    fn test_parse_rejects_wrong_token_counts() {
        assert_format_error(WeightMatrix::parse("2 2 2\n1 2 3\n1 2\n"), 3);
        assert_format_error(WeightMatrix::parse("2 2 2\n1 2 3 4\n1 2 3\n"), 2);
        assert_format_error(WeightMatrix::parse("2 2 1\n1 2 3\n1 2 3\n"), 3);
    }

    #[test]
    fn test_parse_rejects_missing_rows() {
        assert_format_error(WeightMatrix::parse("2 2 2\n1 2 3\n"), 1);
    }

    #[test]
    fn test_parse_rejects_bad_floats() {
        assert_format_error(WeightMatrix::parse("2 1 1\n1 two 3\n"), 2);
        assert_format_error(WeightMatrix::parse("2 1 1\n1 2 b\n"), 2);
    }

    #[test]
    fn test_parse_rejects_huge_headers() {
        assert_format_error(WeightMatrix::parse("99999999999 99999999999 1\n1 2\n"), 1);
        assert_format_error(WeightMatrix::parse("4294967296 4294967297 1\n1\n"), 1);
        assert_format_error(WeightMatrix::parse(&format!("{} 1 1\n1\n", usize::MAX)), 2);

        // Fits in a usize but the rows aren't there.
        assert_format_error(WeightMatrix::parse("100000 100000 1\n1 2\n"), 2);
        assert_format_error(WeightMatrix::parse("2 100000 1\n1 2 3\n3 4\n"), 3);
    }

    #[test]
    fn test_parse_rejects_trailing_data() {
        assert_format_error(WeightMatrix::parse("1 1 1\n1 2\n1 1 1\n"), 3);
    }
}

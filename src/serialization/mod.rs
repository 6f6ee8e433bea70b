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

//! The line-oriented text format weights are persisted in.
//!
//! Parsing works on `&str` only; streams and files are read to a string first by the callers that
//! need them, so every parser here can be exercised without touching I/O.

use std::str::{FromStr, Lines};

use crate::error::{Error, Result};

pub trait Serializable {
    fn read_from(reader: &mut Reader) -> Result<Self> where Self: Sized;
    fn write_to(&self, output: &mut String);
}

/// A cursor over the lines of a weight file that remembers which line it's on, for error messages.
pub struct Reader<'a> {
    lines: Lines<'a>,
    line: usize,
}

impl<'a> Reader<'a> {
    pub fn new(text: &'a str) -> Reader<'a> {
        Reader {
            lines: text.lines(),
            line: 0,
        }
    }

    /// The 1-based number of the line most recently read.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads the next line and splits it into whitespace-separated tokens.
    pub fn read_line(&mut self) -> Result<Vec<&'a str>> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(line.split_whitespace().collect())
            },
            None => read_error(self, "Unexpected end of weights!"),
        }
    }

    /// Succeeds only if nothing but blank lines remain.
    pub fn finish(&mut self) -> Result<()> {
        while let Some(line) = self.lines.next() {
            self.line += 1;
            if !line.trim().is_empty() {
                return read_error(self, "Unexpected data after the last weight matrix!");
            }
        }
        Ok(())
    }
}

pub fn read_error<T>(reader: &Reader, message: &str) -> Result<T> {
    Err(Error::Format { line: reader.line(), message: message.to_string() })
}

pub fn parse_token<T>(reader: &Reader, token: &str, message: &str) -> Result<T> where T: FromStr {
    match T::from_str(token) {
        Ok(value) => Ok(value),
        Err(_) => read_error(reader, &format!("{} (\"{}\")", message, token)),
    }
}

mod weight_matrix;

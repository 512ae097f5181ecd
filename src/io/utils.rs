//! Utilities for input/output.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

#[cfg(feature = "json")]
use serde::Serialize;

/// Reads the specified file and decodes it as latin-1, which maps
/// every byte to the character with the same code point.
pub fn read_latin1_text_file<P: AsRef<Path>>(file_path: P) -> io::Result<String> {
    let bytes = fs::read(file_path)?;
    Ok(bytes.into_iter().map(char::from).collect())
}

/// Writes the given text to the specified file, replacing any existing content.
pub fn write_text_file<P: AsRef<Path>>(text: &str, file_path: P) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(file_path)?);
    file.write_all(text.as_bytes())?;
    file.flush()
}

/// Returns an iterator over the trimmed non-empty lines of the given text.
pub fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Creates an `InvalidData` error with the given message.
pub fn invalid_data<S: Into<String>>(message: S) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

/// Serializes the given data into JSON format and saves it at the given path.
#[cfg(feature = "json")]
pub fn save_data_as_json<P: AsRef<Path>, T: Serialize>(file_path: P, data: &T) -> io::Result<()> {
    let file = io::BufWriter::new(fs::File::create(file_path)?);
    serde_json::to_writer(file, data).map_err(io::Error::from)
}

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::device::DeviceSnapshot;
use crate::model::Document;

/// Errors that can occur while loading a document or snapshot.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was not valid JSON for the expected shape.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Input was not valid TOML for the expected shape.
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    /// Input bytes were not valid UTF-8.
    #[error("invalid UTF-8 in input: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Failed to read input file.
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialization format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Toml,
}

impl InputFormat {
    /// Pick the format from a file extension; anything but `.toml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => InputFormat::Toml,
            _ => InputFormat::Json,
        }
    }
}

/// Parse JSON bytes into a [`Document`].
pub fn parse(input: &[u8]) -> Result<Document, ParseError> {
    parse_as(input, InputFormat::Json)
}

/// Parse bytes of the given format into a [`Document`].
pub fn parse_as(input: &[u8], format: InputFormat) -> Result<Document, ParseError> {
    decode(input, format)
}

/// Read and parse a document file. The format follows the file extension.
pub fn parse_file(path: &Path) -> Result<Document, ParseError> {
    let raw = fs::read(path)?;
    decode(&raw, InputFormat::from_path(path))
}

/// Parse JSON bytes into a [`DeviceSnapshot`].
pub fn parse_snapshot(input: &[u8]) -> Result<DeviceSnapshot, ParseError> {
    decode(input, InputFormat::Json)
}

/// Read and parse a device snapshot file.
pub fn parse_snapshot_file(path: &Path) -> Result<DeviceSnapshot, ParseError> {
    let raw = fs::read(path)?;
    decode(&raw, InputFormat::from_path(path))
}

fn decode<T: DeserializeOwned>(input: &[u8], format: InputFormat) -> Result<T, ParseError> {
    match format {
        InputFormat::Json => Ok(serde_json::from_slice(input)?),
        InputFormat::Toml => {
            let text = std::str::from_utf8(input)?;
            Ok(toml::from_str(text)?)
        }
    }
}

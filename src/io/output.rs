use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::DocumentFormat;

/// Destination for serialized output values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }
}

/// Controls how field reports are serialized once a session ends.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }

    pub fn add_destination(mut self, destination: OutputDestination) -> Self {
        self.destinations.push(destination);
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Encodes `value` once and writes the same payload to every destination.
pub fn emit<T>(value: &T, options: &OutputOptions) -> Result<()>
where
    T: Serialize + ?Sized,
{
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = serialize_value(value, options)?;
    options
        .destinations
        .iter()
        .try_for_each(|destination| destination.write(&payload))
}

pub fn serialize_value<T>(value: &T, options: &OutputOptions) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let encoded = match (options.format, options.pretty) {
        (DocumentFormat::Json, true) => serde_json::to_string_pretty(value)?,
        (DocumentFormat::Json, false) => serde_json::to_string(value)?,
        #[cfg(feature = "yaml")]
        (DocumentFormat::Yaml, _) => serde_yaml::to_string(value)?,
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, pretty) => {
            let table = without_nulls(serde_json::to_value(value)?);
            if pretty {
                toml::to_string_pretty(&table)?
            } else {
                toml::to_string(&table)?
            }
        }
    };
    Ok(encoded)
}

/// TOML has no null; unset entries are dropped from tables and arrays.
#[cfg(feature = "toml")]
fn without_nulls(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match value {
        Value::Object(map) => map
            .into_iter()
            .filter(|(_, entry)| !entry.is_null())
            .map(|(key, entry)| (key, without_nulls(entry)))
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .filter(|entry| !entry.is_null())
            .map(without_nulls)
            .collect(),
        other => other,
    }
}

impl OutputDestination {
    fn write(&self, payload: &str) -> Result<()> {
        match self {
            OutputDestination::Stdout => write_line(&mut io::stdout().lock(), payload)
                .context("failed to write report to stdout"),
            OutputDestination::File(path) => File::create(path)
                .and_then(|mut file| write_line(&mut file, payload))
                .with_context(|| format!("failed to write report to {}", path.display())),
        }
    }
}

fn write_line(sink: &mut impl Write, payload: &str) -> io::Result<()> {
    sink.write_all(payload.as_bytes())?;
    sink.write_all(b"\n")?;
    sink.flush()
}

use anyhow::{Context, Result};
use serde_sarif::sarif;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// -------------------------------------------------------------------------------------------------
// Destination
// -------------------------------------------------------------------------------------------------
/// Where a serialized SARIF document gets written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    /// Use the given path, or stdout if there is none or it is `-`.
    pub fn from_path_or_stdout<P: AsRef<Path>>(path: Option<P>) -> Self {
        match path {
            Some(p) if p.as_ref() != Path::new("-") => Destination::File(p.as_ref().to_owned()),
            _ => Destination::Stdout,
        }
    }

    /// Get a buffered writer for this destination, creating or truncating a named file.
    pub fn get_writer(&self) -> std::io::Result<Box<dyn Write>> {
        match self {
            Destination::Stdout => Ok(Box::new(BufWriter::new(stdout()))),
            Destination::File(p) => {
                let f = File::create(p)?;
                Ok(Box::new(BufWriter::new(f)))
            }
        }
    }

    /// Write a serialized document followed by a newline.
    ///
    /// When writing to a named file, its path is logged once the write has completed.
    pub fn write_document(&self, serialized: &str) -> Result<()> {
        let mut writer = self
            .get_writer()
            .with_context(|| format!("Failed to open {self} for writing"))?;
        writeln!(writer, "{serialized}")?;
        writer.flush()?;

        if let Destination::File(p) = self {
            info!("SARIF output written to file: {}", p.display());
        }
        Ok(())
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Stdout => write!(f, "stdout"),
            Destination::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Serialize a SARIF document as pretty-printed JSON.
pub fn to_json(sarif: &sarif::Sarif) -> Result<String> {
    serde_json::to_string_pretty(sarif).context("Failed to serialize SARIF document")
}

//! JSON and YAML document persistence shared by snapshots, plans and config.
//!
//! The format is picked from the file extension: `.yaml`/`.yml` are YAML and
//! everything else is JSON. `-` reads from stdin or writes to stdout.

use std::{
    fs::File,
    io::{self, BufReader, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }

    pub fn parse<T: DeserializeOwned>(&self, input: &str) -> Result<T> {
        match self {
            DocumentFormat::Json => serde_json::from_str(input).context("Parsing JSON document"),
            DocumentFormat::Yaml => serde_yaml::from_str(input).context("Parsing YAML document"),
        }
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            DocumentFormat::Json => {
                let mut rendered =
                    serde_json::to_string_pretty(value).context("Serializing JSON document")?;
                rendered.push('\n');
                Ok(rendered)
            }
            DocumentFormat::Yaml => serde_yaml::to_string(value).context("Serializing YAML document"),
        }
    }
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut raw = String::new();
    if is_dash(path) {
        io::stdin()
            .lock()
            .read_to_string(&mut raw)
            .context("Reading document from stdin")?;
    } else {
        let file = File::open(path).with_context(|| format!("Opening document {path:?}"))?;
        BufReader::new(file)
            .read_to_string(&mut raw)
            .with_context(|| format!("Reading document {path:?}"))?;
    }
    DocumentFormat::from_path(path)
        .parse(&raw)
        .with_context(|| format!("Decoding document {path:?}"))
}

pub fn save<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let rendered = DocumentFormat::from_path(path).render(value)?;
    write_output(Some(path), &rendered)
}

/// Writes `contents` to `path`, or stdout when the path is absent or `-`.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) if !is_dash(path) => {
            let mut file =
                File::create(path).with_context(|| format!("Creating output file {path:?}"))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Writing output file {path:?}"))?;
            file.flush()?;
        }
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .context("Writing to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}

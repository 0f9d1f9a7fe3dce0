//! Reading the citation payload from a file or stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::citation::{Citation, CitationPayload};

/// Where the payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means stdin; anything else is a path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(arg.to_path_buf())
        }
    }

    /// Only files can be read a second time.
    pub fn is_reloadable(&self) -> bool {
        matches!(self, Self::File(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Stdin => "<stdin>".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no se puede leer {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin} no contiene citas válidas: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read and decode the citations from `input`.
pub fn load(input: &InputSource) -> Result<Vec<Citation>, LoadError> {
    let origin = input.describe();
    let text = match input {
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| LoadError::Io {
                    origin: origin.clone(),
                    source,
                })?;
            buf
        }
        InputSource::File(path) => {
            std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                origin: origin.clone(),
                source,
            })?
        }
    };

    let citations = parse(&text).map_err(|source| LoadError::Parse {
        origin: origin.clone(),
        source,
    })?;
    tracing::debug!("loaded {} citation(s) from {origin}", citations.len());
    Ok(citations)
}

/// Decode a payload.  Blank input counts as no citations.
pub fn parse(text: &str) -> Result<Vec<Citation>, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let payload: CitationPayload = serde_json::from_str(text)?;
    Ok(payload.into_citations())
}

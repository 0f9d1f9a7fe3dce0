//! Citation records as delivered by the upstream retrieval pipeline.
//!
//! Every optional field gets its fallback here, at the deserialization
//! boundary, so the renderer never has to think about missing keys or
//! explicit `null`s.  The only values that stay optional are the ones whose
//! fallback depends on context: [`Citation::citation_index`] (falls back to the
//! entry position) and [`Reference::source`] (an absent source has its own
//! placeholder short name).

use serde::{Deserialize, Deserializer};

// ───────────────────────────────────────── reference ─────────

/// A single source attribution backing a citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reference {
    /// Path-like or free-form identifier of the source document.
    #[serde(default)]
    pub source: Option<String>,
    /// Excerpt taken from the source.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

// ───────────────────────────────────────── citation ──────────

/// A quoted span together with the references that support it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Citation {
    #[serde(default, deserialize_with = "positive_index")]
    pub citation_index: Option<u64>,
    /// The quoted fragment.  Empty when upstream sent nothing.
    #[serde(default, deserialize_with = "null_as_default")]
    pub texto_citado: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub span_start: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub span_end: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub referencias: Vec<Reference>,
}

impl Citation {
    /// Label number for this citation given its position in the collection.
    pub fn display_index(&self, position: usize) -> u64 {
        self.citation_index.unwrap_or(position as u64 + 1)
    }
}

// ───────────────────────────────────────── payload ───────────

/// The inbound document.  Upstream sends `{"citations": [...]}`; a bare
/// array is accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CitationPayload {
    Bare(Vec<Citation>),
    Wrapped {
        #[serde(default, deserialize_with = "null_as_default")]
        citations: Vec<Citation>,
    },
}

impl CitationPayload {
    pub fn into_citations(self) -> Vec<Citation> {
        match self {
            Self::Bare(citations) | Self::Wrapped { citations } => citations,
        }
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Treat an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A zero index is as good as no index.
fn positive_index<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.filter(|&i| i > 0))
}

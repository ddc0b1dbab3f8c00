//! Paper payloads returned by the Semantic Scholar Graph API.
//!
//! Field selectors are caller-controlled, so a paper is kept as the raw
//! field map the API returned rather than a fixed struct. Accessors cover
//! the fields the formatters need.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A single paper as returned by the API: field name to JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperRecord(Map<String, Value>);

impl PaperRecord {
    /// Wrap an already-validated field map.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Raw value for a field, if the API returned it.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// True if the API returned this field (possibly as null).
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Semantic Scholar paper ID.
    #[must_use]
    pub fn paper_id(&self) -> Option<&str> {
        self.get("paperId")?.as_str()
    }

    /// Paper title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("title")?.as_str()
    }

    /// Get the paper title, falling back to "Untitled" if not available.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title().unwrap_or("Untitled")
    }

    /// Publication year.
    #[must_use]
    pub fn year(&self) -> Option<i64> {
        self.get("year")?.as_i64()
    }

    /// Number of citations, if requested.
    #[must_use]
    pub fn citation_count(&self) -> Option<i64> {
        self.get("citationCount")?.as_i64()
    }

    /// Publication venue.
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        self.get("venue")?.as_str().filter(|v| !v.is_empty())
    }

    /// Semantic Scholar page URL.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.get("url")?.as_str()
    }

    /// Paper abstract.
    #[must_use]
    pub fn r#abstract(&self) -> Option<&str> {
        self.get("abstract")?.as_str()
    }

    /// Author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.get("authors")
            .and_then(Value::as_array)
            .map(|authors| {
                authors
                    .iter()
                    .filter_map(|a| a.get("name").and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default()
    }
}

/// One page of papers (search results or an author's papers).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaperPage {
    /// Total number of matches (search only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Offset of this page in the full result set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Offset of the following page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,

    /// Papers in this page.
    pub data: Vec<PaperRecord>,
}

impl PaperPage {
    /// Number of papers in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the page holds no papers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if there are more results upstream.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Which side of a citation edge the linked paper is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    /// Papers that cite the queried paper.
    Citing,
    /// Papers the queried paper cites.
    Cited,
}

impl EdgeDirection {
    /// JSON key holding the linked paper in an edge object.
    #[must_use]
    pub const fn paper_key(self) -> &'static str {
        match self {
            Self::Citing => "citingPaper",
            Self::Cited => "citedPaper",
        }
    }

    /// Human-readable label for headings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Citing => "Citations",
            Self::Cited => "References",
        }
    }
}

/// A citation or reference: the linked paper plus edge-level attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CitationEdge {
    /// Side of the edge the paper is on.
    pub direction: EdgeDirection,

    /// The citing or cited paper.
    pub paper: PaperRecord,

    /// Edge attributes such as `contexts`, `intents` or `isInfluential`.
    pub attributes: Map<String, Value>,
}

impl CitationEdge {
    /// Whether the API marked this citation as influential.
    #[must_use]
    pub fn is_influential(&self) -> bool {
        self.attributes.get("isInfluential").and_then(Value::as_bool).unwrap_or(false)
    }
}

// Serialized in the API's own shape: {"citingPaper": {...}, "isInfluential": ...}
impl Serialize for CitationEdge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attributes.len() + 1))?;
        map.serialize_entry(self.direction.paper_key(), &self.paper)?;
        for (key, value) in &self.attributes {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One page of citations or references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgePage {
    /// Offset of this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Offset of the following page, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,

    /// Edges in this page.
    pub data: Vec<CitationEdge>,
}

impl EdgePage {
    /// Number of edges in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the page holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

//! Candidate papers and the SPARQL JSON results format they are read from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A Wikidata article with a DOI but no known full-text link.
///
/// Serialized as-is into the resolver request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePaper {
    /// Wikidata item id (e.g. `Q42`).
    pub id: String,

    /// Digital Object Identifier.
    pub doi: String,
}

impl CandidatePaper {
    #[must_use]
    pub fn new(id: impl Into<String>, doi: impl Into<String>) -> Self {
        Self { id: id.into(), doi: doi.into() }
    }
}

/// SPARQL 1.1 query results in JSON format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResponse {
    #[serde(default)]
    pub results: SparqlResults,
}

/// The `results` object of a SPARQL response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub bindings: Vec<SparqlBinding>,
}

/// One solution: variable name to bound value. Unbound variables are absent.
pub type SparqlBinding = HashMap<String, SparqlValue>;

/// A single bound RDF term.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlValue {
    /// Lexical value (URI, literal text, ...).
    pub value: String,

    /// Term type (`uri`, `literal`, `bnode`).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

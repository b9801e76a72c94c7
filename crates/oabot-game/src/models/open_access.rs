//! Open-access resolution results as returned by the Dissemin query API.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level resolver response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolverResponse {
    /// Resolved paper; absent when the resolver knows nothing about the DOI.
    #[serde(default)]
    pub paper: Option<OpenAccessResult>,

    /// Resolver status (`ok` or `error`).
    #[serde(default)]
    pub status: Option<String>,
}

/// Discovered PDF URLs and source records for one article.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAccessResult {
    /// PDF URLs in the order the resolver reported them. Empty strings dropped.
    #[serde(default, rename = "pdf_url", deserialize_with = "one_or_many")]
    pub pdf_urls: Vec<String>,

    /// Bibliographic records the resolver aggregated.
    #[serde(default)]
    pub records: Vec<Record>,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,
}

impl OpenAccessResult {
    /// The first reported PDF URL, if any.
    #[must_use]
    pub fn primary_pdf_url(&self) -> Option<&str> {
        self.pdf_urls.first().map(String::as_str)
    }

    /// Whether the resolver found any PDF.
    #[must_use]
    pub fn has_pdf(&self) -> bool {
        !self.pdf_urls.is_empty()
    }

    /// First record whose `pdf_url` is exactly the primary PDF URL.
    #[must_use]
    pub fn matching_record(&self) -> Option<&Record> {
        let primary = self.primary_pdf_url()?;
        self.records.iter().find(|r| r.pdf_url.as_deref() == Some(primary))
    }
}

/// One bibliographic entry from a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Direct PDF link.
    #[serde(default)]
    pub pdf_url: Option<String>,

    /// Record title.
    #[serde(default)]
    pub title: Option<String>,

    /// Abstract text.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Landing page.
    #[serde(default)]
    pub url: Option<String>,
}

impl Record {
    /// Whether no field is set, i.e. no record matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pdf_url.is_none()
            && self.title.is_none()
            && self.r#abstract.is_none()
            && self.url.is_none()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<Option<String>>),
}

/// Accept a string, a list of strings, or null for `pdf_url`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let urls = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(url)) => vec![url],
        Some(OneOrMany::Many(urls)) => urls.into_iter().flatten().collect(),
    };
    Ok(urls.into_iter().filter(|u| !u.trim().is_empty()).collect())
}

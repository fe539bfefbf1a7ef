use std::collections::HashMap;

use serde::Deserialize;

/// One selectable entry in a category list. Data files store either bare
/// strings or objects carrying a `name` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    Plain(String),
    Named { name: String },
}

impl Candidate {
    pub fn name(&self) -> &str {
        match self {
            Candidate::Plain(value) => value,
            Candidate::Named { name } => name,
        }
    }
}

impl From<&str> for Candidate {
    fn from(value: &str) -> Self {
        Candidate::Plain(value.to_string())
    }
}

/// Display record for a region, used only for labeling.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryInfo {
    pub name: String,
    #[serde(default)]
    pub flag: String,
}

/// Per-region candidate lists, loaded once and never mutated afterwards.
/// The pose list is already merged with the shared cross-region poses.
#[derive(Debug, Clone)]
pub struct RegionCatalog {
    region: String,
    categories: HashMap<String, Vec<Candidate>>,
    country: CountryInfo,
}

impl RegionCatalog {
    pub fn new(
        region: impl Into<String>,
        categories: HashMap<String, Vec<Candidate>>,
        country: CountryInfo,
    ) -> Self {
        RegionCatalog {
            region: region.into(),
            categories,
            country,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn country(&self) -> &CountryInfo {
        &self.country
    }

    /// Candidate list for a category; unknown categories resolve to an
    /// empty list rather than an error.
    pub fn candidates(&self, category: &str) -> &[Candidate] {
        self.categories
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

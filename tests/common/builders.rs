//! Test builders: ergonomic constructors for taxonomies and requests.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use genrex_core::{Explorer, MatchMode, SearchRequest};
use genrex_kb::{frames::GenreEntry, FrameStore};

// ---------------------------------------------------------------------------
// TaxonomyBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for frame taxonomies.
///
/// # Example
///
/// ```rust
/// let store = TaxonomyBuilder::new()
///     .genre("rock", &["electric_guitar"])
///     .child("punk", "rock", &["diy"])
///     .store();
/// ```
pub struct TaxonomyBuilder {
    root: String,
    entries: Vec<GenreEntry>,
}

impl Default for TaxonomyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaxonomyBuilder {
    pub fn new() -> Self {
        Self {
            root: "top".to_string(),
            entries: Vec::new(),
        }
    }

    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// A genre hanging directly off the root.
    pub fn genre(self, name: &str, properties: &[&str]) -> Self {
        self.push(name, None, properties)
    }

    pub fn child(self, name: &str, parent: &str, properties: &[&str]) -> Self {
        self.push(name, Some(parent), properties)
    }

    /// Attach a description to the most recently added genre.
    pub fn described(mut self, description: &str) -> Self {
        let last = self.entries.last_mut().expect("described() needs a genre first");
        last.description = Some(description.to_string());
        self
    }

    fn push(mut self, name: &str, parent: Option<&str>, properties: &[&str]) -> Self {
        self.entries.push(GenreEntry {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            properties: properties.iter().map(|p| p.to_string()).collect(),
            description: None,
        });
        self
    }

    /// Render as a knowledge file, for harnesses that go through disk.
    pub fn toml(&self) -> String {
        let quote = |s: &str| format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""));
        let mut out = format!("root = {}\n", quote(self.root.as_str()));
        for entry in &self.entries {
            out.push_str("\n[[genre]]\n");
            out.push_str(&format!("name = {}\n", quote(entry.name.as_str())));
            if let Some(parent) = &entry.parent {
                out.push_str(&format!("parent = {}\n", quote(parent.as_str())));
            }
            let properties: Vec<String> = entry.properties.iter().map(|p| quote(p.as_str())).collect();
            out.push_str(&format!("properties = [{}]\n", properties.join(", ")));
            if let Some(description) = &entry.description {
                out.push_str(&format!("description = {}\n", quote(description.as_str())));
            }
        }
        out
    }

    pub fn store(self) -> FrameStore {
        FrameStore::from_entries(self.root, self.entries).expect("valid test taxonomy")
    }

    pub fn explorer(self) -> Explorer<FrameStore> {
        Explorer::from_store(self.store())
    }
}

/// Flat taxonomy from `(genre, properties)` pairs.
pub fn flat_taxonomy(genres: &[(&str, &[&str])]) -> TaxonomyBuilder {
    genres
        .iter()
        .fold(TaxonomyBuilder::new(), |b, (genre, props)| b.genre(genre, props))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub fn all_of(properties: &[&str]) -> SearchRequest {
    SearchRequest::from_properties(properties.iter().copied(), MatchMode::All)
        .expect("distinct properties")
}

pub fn any_of(properties: &[&str]) -> SearchRequest {
    SearchRequest::from_properties(properties.iter().copied(), MatchMode::Any)
        .expect("distinct properties")
}

/// Owned genre names, for comparing against results.
pub fn names(genres: &[&str]) -> Vec<String> {
    genres.iter().map(|g| g.to_string()).collect()
}

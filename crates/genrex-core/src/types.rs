//! Core types for genrex-core.
//!
//! Genres and properties are plain string identifiers owned by the knowledge
//! base. This module adds the few structured views the search layer needs:
//! the [`Property`] classification, the [`MatchMode`] and the
//! [`SearchRequest`] selection.

use crate::error::RequestError;
use serde::{Deserialize, Serialize};

/// A property token classified by shape.
///
/// Properties are either bare atoms (`electronic`) or compound terms of the
/// form `type(value)` (`era(1980s)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property<'a> {
    Atom(&'a str),
    Compound { kind: &'a str, value: &'a str },
}

impl<'a> Property<'a> {
    /// Classify a property token.
    ///
    /// A token is compound when it contains `(` after at least one character
    /// and a `)` somewhere after it. The value is the text between the first
    /// `(` and the first following `)`.
    pub fn parse(token: &'a str) -> Self {
        if let Some(open) = token.find('(') {
            if open > 0 {
                if let Some(close_rel) = token[open + 1..].find(')') {
                    return Property::Compound {
                        kind: &token[..open],
                        value: &token[open + 1..open + 1 + close_rel],
                    };
                }
            }
        }
        Property::Atom(token)
    }
}

/// Multi-property match semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every selected property must be present.
    #[default]
    All,
    /// At least one selected property must be present.
    Any,
}

impl MatchMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            MatchMode::All => MatchMode::Any,
            MatchMode::Any => MatchMode::All,
        }
    }

    /// Whether a genre matching `matches` of `selected` properties qualifies.
    pub fn qualifies(self, matches: usize, selected: usize) -> bool {
        match self {
            MatchMode::All => matches == selected,
            MatchMode::Any => matches > 0,
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::All => write!(f, "all"),
            MatchMode::Any => write!(f, "any"),
        }
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "todas" => Ok(MatchMode::All),
            "any" | "alguna" => Ok(MatchMode::Any),
            other => Err(format!("unknown match mode: {other} (expected all or any)")),
        }
    }
}

/// A property selection plus its match mode.
///
/// Properties keep their insertion order for display but behave as a set:
/// adding one that is already selected is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    properties: Vec<String>,
    pub mode: MatchMode,
}

impl SearchRequest {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            properties: Vec::new(),
            mode,
        }
    }

    /// Build a request from a list of properties, rejecting duplicates.
    pub fn from_properties<I, S>(properties: I, mode: MatchMode) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::new(mode);
        for property in properties {
            request.add(property)?;
        }
        Ok(request)
    }

    /// Select a property. Surrounding whitespace is not significant.
    pub fn add(&mut self, property: impl Into<String>) -> Result<(), RequestError> {
        let property = property.into().trim().to_string();
        if self.contains(&property) {
            return Err(RequestError::DuplicateProperty(property));
        }
        self.properties.push(property);
        Ok(())
    }

    /// Deselect a property. Returns `true` if it was selected.
    pub fn remove(&mut self, property: &str) -> bool {
        let before = self.properties.len();
        self.properties.retain(|p| p != property.trim());
        self.properties.len() != before
    }

    /// Select the property if absent, deselect it otherwise. Returns `true`
    /// when the property is selected afterwards.
    pub fn toggle(&mut self, property: &str) -> bool {
        if self.remove(property) {
            false
        } else {
            self.properties.push(property.trim().to_string());
            true
        }
    }

    pub fn contains(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property.trim())
    }

    pub fn clear(&mut self) {
        self.properties.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Selected properties in insertion order.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

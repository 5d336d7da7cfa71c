//! Query gateway: typed requests in, parsed sequences out.
//!
//! [`QueryGateway`] owns the [`KnowledgeStore`] handle. List-valued reads
//! return `Result` so callers can tell a transport failure from an empty
//! answer; [`describe`](QueryGateway::describe) and
//! [`genres_with_property`](QueryGateway::genres_with_property) never fail
//! and degrade to empty values instead.

use crate::{
    cascade,
    error::KbError,
    parse::{parse_list, unquote_text},
    query::Goal,
    store::KnowledgeStore,
};

/// Conventional name of the taxonomy's root frame.
pub const DEFAULT_ROOT: &str = "top";

pub struct QueryGateway<S> {
    store: S,
    root: String,
}

impl<S: KnowledgeStore> QueryGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            root: DEFAULT_ROOT.to_string(),
        }
    }

    /// Use a different sentinel root name for ancestor filtering.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Run a list-valued goal and parse its answer.
    ///
    /// No solution is an empty list. A response with reversed brackets is a
    /// [`KbError::Query`].
    pub fn list(&mut self, goal: &Goal) -> Result<Vec<String>, KbError> {
        tracing::debug!(%goal, var = goal.result_var(), "executing list query");
        match self.store.solve(goal)? {
            Some(raw) => {
                tracing::debug!(%goal, raw = %raw, "raw response");
                let items = parse_list(&raw).map_err(|e| KbError::query(goal, e.to_string()))?;
                tracing::debug!(%goal, count = items.len(), "parsed list response");
                Ok(items)
            }
            None => {
                tracing::debug!(%goal, "no solution");
                Ok(Vec::new())
            }
        }
    }

    /// Every genre, in the knowledge base's enumeration order.
    pub fn list_all_genres(&mut self) -> Result<Vec<String>, KbError> {
        self.list(&Goal::AllGenres)
    }

    /// Every property the knowledge base knows about.
    pub fn list_all_properties(&mut self) -> Result<Vec<String>, KbError> {
        self.list(&Goal::AllProperties)
    }

    /// A genre's property list, as resolved by the knowledge base.
    pub fn list_properties(&mut self, genre: &str) -> Result<Vec<String>, KbError> {
        self.list(&Goal::PropertiesOf(genre.trim().to_string()))
    }

    /// A genre's parent chain with the root sentinel removed.
    ///
    /// The root itself has no displayable ancestors and is not queried.
    pub fn list_ancestors(&mut self, genre: &str) -> Result<Vec<String>, KbError> {
        let genre = genre.trim();
        if genre == self.root {
            return Ok(Vec::new());
        }
        let mut ancestors = self.list(&Goal::AncestorsOf(genre.to_string()))?;
        ancestors.retain(|ancestor| ancestor.trim() != self.root);
        Ok(ancestors)
    }

    /// A genre's description, or an empty string when it has none or the
    /// query fails. Missing descriptions are missing data, not errors.
    pub fn describe(&mut self, genre: &str) -> String {
        let goal = Goal::DescriptionOf(genre.trim().to_string());
        match self.store.solve(&goal) {
            Ok(Some(raw)) => unquote_text(&raw),
            Ok(None) => String::new(),
            Err(err) => {
                tracing::warn!(%goal, error = %err, "description lookup failed");
                String::new()
            }
        }
    }

    /// Raw text of the property list stored in a genre's frame.
    pub fn frame_record(&mut self, genre: &str) -> Result<Option<String>, KbError> {
        self.store.solve(&Goal::FrameOf(genre.trim().to_string()))
    }

    /// Genres holding `property`, resolved through the fallback cascade.
    pub fn genres_with_property(&mut self, property: &str) -> Vec<String> {
        cascade::resolve(self, property)
    }

    /// Number of genres in the enumeration, 0 when it cannot be read.
    pub fn genre_count(&mut self) -> usize {
        match self.list_all_genres() {
            Ok(genres) => genres.len(),
            Err(err) => {
                tracing::warn!(error = %err, "could not count genres");
                0
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

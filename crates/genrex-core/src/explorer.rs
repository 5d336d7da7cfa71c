//! Explorer: the operations the presentation layer is allowed to call.
//!
//! Every knowledge-base failure stops here: it is logged and replaced by an
//! empty value. A user therefore sees the same empty list for "nothing
//! matches" and "the knowledge base is down"; the log is where the two can
//! be told apart.

use crate::{
    error::{KbError, RequestError},
    gateway::QueryGateway,
    search,
    store::KnowledgeStore,
    types::SearchRequest,
};

pub struct Explorer<S> {
    gateway: QueryGateway<S>,
}

impl<S: KnowledgeStore> Explorer<S> {
    pub fn new(gateway: QueryGateway<S>) -> Self {
        Self { gateway }
    }

    /// Wrap a store with the default root sentinel.
    pub fn from_store(store: S) -> Self {
        Self::new(QueryGateway::new(store))
    }

    pub fn gateway(&mut self) -> &mut QueryGateway<S> {
        &mut self.gateway
    }

    /// Sentinel root name of the taxonomy.
    pub fn root(&self) -> &str {
        self.gateway.root()
    }

    /// Every genre, in enumeration order.
    pub fn genres(&mut self) -> Vec<String> {
        let result = self.gateway.list_all_genres();
        downgrade("genres", result)
    }

    /// A genre's (inherited) properties.
    pub fn properties(&mut self, genre: &str) -> Vec<String> {
        let result = self.gateway.list_properties(genre);
        downgrade("properties", result)
    }

    /// A genre's parents, nearest first, root excluded.
    pub fn ancestors(&mut self, genre: &str) -> Vec<String> {
        let result = self.gateway.list_ancestors(genre);
        downgrade("ancestors", result)
    }

    /// A genre's description; empty when unavailable.
    pub fn description(&mut self, genre: &str) -> String {
        self.gateway.describe(genre)
    }

    /// Genres satisfying the request. Only invalid input is an error.
    pub fn search(&mut self, request: &SearchRequest) -> Result<Vec<String>, RequestError> {
        search::search(&mut self.gateway, request)
    }

    /// Every property known to the knowledge base, for selection lists.
    pub fn available_properties(&mut self) -> Vec<String> {
        let result = self.gateway.list_all_properties();
        downgrade("available properties", result)
    }

    /// Number of genres, 0 when the enumeration fails.
    pub fn genre_count(&mut self) -> usize {
        self.gateway.genre_count()
    }
}

fn downgrade(what: &str, result: Result<Vec<String>, KbError>) -> Vec<String> {
    result.unwrap_or_else(|err| {
        tracing::warn!(what, error = %err, "knowledge base read failed, showing nothing");
        Vec::new()
    })
}

//! Multi-property search.
//!
//! [`search`] qualifies each genre of the enumeration against a
//! [`SearchRequest`]: a genre's match count is the number of selected
//! properties whose cascade result contains it, and the request's
//! [`MatchMode`](crate::MatchMode) decides whether that count qualifies.
//! Results keep enumeration order; there is no relevance ranking.

use crate::{
    error::RequestError, gateway::QueryGateway, store::KnowledgeStore, types::SearchRequest,
};

/// Genres satisfying `request`, in enumeration order.
///
/// An empty selection is rejected before any query is issued. Knowledge-base
/// failures are not errors here: they surface as fewer (or zero) results.
pub fn search<S: KnowledgeStore>(
    gateway: &mut QueryGateway<S>,
    request: &SearchRequest,
) -> Result<Vec<String>, RequestError> {
    if request.is_empty() {
        return Err(RequestError::EmptySelection);
    }

    tracing::debug!(
        properties = ?request.properties(),
        mode = %request.mode,
        "multi-property search"
    );

    let genres = match gateway.list_all_genres() {
        Ok(genres) => genres,
        Err(err) => {
            tracing::warn!(error = %err, "could not enumerate genres for search");
            return Ok(Vec::new());
        }
    };
    if genres.is_empty() {
        tracing::debug!("no genres in knowledge base");
        return Ok(Vec::new());
    }

    // The store does not change during a search, so each property's holders
    // are resolved once rather than once per genre.
    let holders: Vec<Vec<String>> = request
        .properties()
        .iter()
        .map(|property| gateway.genres_with_property(property))
        .collect();

    let selected = request.len();
    let matching: Vec<String> = genres
        .into_iter()
        .filter(|genre| {
            let matches = holders
                .iter()
                .filter(|found| found.iter().any(|g| g.trim() == genre.as_str()))
                .count();
            request.mode.qualifies(matches, selected)
        })
        .collect();

    tracing::debug!(count = matching.len(), "search completed");
    Ok(matching)
}

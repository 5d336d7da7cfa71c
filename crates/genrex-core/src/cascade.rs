//! Single-property fallback cascade.
//!
//! Resolving "which genres hold property `p`" tries three strategies in a
//! fixed order and stops at the first one that yields genres:
//!
//! 1. [`Strategy::Direct`]: the membership predicate with the token as-is.
//! 2. [`Strategy::Formatted`]: the formatted-property predicate, which
//!    tolerates display-vs-storage spelling differences.
//! 3. [`Strategy::ManualScan`]: fetch every genre's frame record and match
//!    by substring (see [`record_matches`]).
//!
//! A failing direct membership query jumps straight to the manual scan.
//! Every other failure is logged and counts as "no genres".

use crate::{
    error::KbError,
    gateway::QueryGateway,
    query::Goal,
    store::KnowledgeStore,
    types::Property,
};

/// One way of answering a single-property query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Formatted,
    ManualScan,
}

/// The cascade, in the order strategies are tried.
pub const CASCADE: [Strategy; 3] = [Strategy::Direct, Strategy::Formatted, Strategy::ManualScan];

impl Strategy {
    /// The goal this strategy issues, if it is a single query.
    pub fn goal(self, property: &str) -> Option<Goal> {
        match self {
            Strategy::Direct => Some(Goal::GenresWithProperty(property.to_string())),
            Strategy::Formatted => Some(Goal::GenresWithFormattedProperty(property.to_string())),
            Strategy::ManualScan => None,
        }
    }

    fn run<S: KnowledgeStore>(
        self,
        gateway: &mut QueryGateway<S>,
        property: &str,
    ) -> Result<Vec<String>, StrategyFailure> {
        match self.goal(property) {
            Some(goal) => gateway
                .list(&goal)
                .map_err(|error| StrategyFailure { goal: Some(goal), error }),
            None => manual_scan(gateway, property)
                .map_err(|error| StrategyFailure { goal: None, error }),
        }
    }
}

struct StrategyFailure {
    goal: Option<Goal>,
    error: KbError,
}

/// Resolve the genres holding `property`. Never fails: errors are logged and
/// the result degrades to an empty list.
pub fn resolve<S: KnowledgeStore>(gateway: &mut QueryGateway<S>, property: &str) -> Vec<String> {
    let property = property.trim();
    tracing::debug!(property, "resolving genres with property");

    for strategy in CASCADE {
        match strategy.run(gateway, property) {
            Ok(genres) if !genres.is_empty() => {
                tracing::debug!(property, ?strategy, count = genres.len(), "cascade resolved");
                return genres;
            }
            Ok(_) => {
                tracing::debug!(property, ?strategy, "strategy returned no genres");
            }
            Err(failure) => {
                tracing::warn!(
                    property,
                    ?strategy,
                    error = %failure.error,
                    "strategy failed"
                );
                if let Some(token) = failure.goal.as_ref().and_then(Goal::membership_property) {
                    tracing::debug!(token, "recovering failed membership query by manual scan");
                    return manual_scan(gateway, token).unwrap_or_else(|err| {
                        tracing::warn!(token, error = %err, "manual scan failed");
                        Vec::new()
                    });
                }
            }
        }
    }

    tracing::debug!(property, "cascade exhausted without matches");
    Vec::new()
}

/// Scan every genre's frame record for `property`.
///
/// Only the genre enumeration can fail the scan; a genre whose frame cannot
/// be read is skipped.
pub fn manual_scan<S: KnowledgeStore>(
    gateway: &mut QueryGateway<S>,
    property: &str,
) -> Result<Vec<String>, KbError> {
    let genres = gateway.list_all_genres()?;
    let mut matching = Vec::new();

    for genre in genres {
        match gateway.frame_record(&genre) {
            Ok(Some(record)) => {
                if record_matches(&record, property) {
                    tracing::debug!(genre = %genre, property, "frame record matches");
                    matching.push(genre);
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(genre = %genre, error = %err, "could not read frame record");
            }
        }
    }

    tracing::debug!(property, count = matching.len(), "manual scan finished");
    Ok(matching)
}

/// Best-effort match of a property against a frame's raw property text.
///
/// Both sides are lowercased and quotes are removed from the target. The
/// target matches if the record contains it verbatim, or, for a compound
/// `type(value)` target, if the record contains `type` and `value`
/// independently. The second rule can match unrelated text that happens to
/// contain both substrings.
pub fn record_matches(record: &str, property: &str) -> bool {
    let target = property.to_lowercase().replace('\'', "");
    let record = record.to_lowercase();

    if record.contains(&target) {
        return true;
    }

    match Property::parse(&target) {
        Property::Compound { kind, value } => record.contains(kind) && record.contains(value),
        Property::Atom(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

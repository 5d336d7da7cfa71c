//! Store: the knowledge base as seen from genrex.
//!
//! The knowledge base is the single source of truth; nothing in-process
//! caches its answers across requests.

use crate::{error::KbError, query::Goal};

/// A queryable knowledge base.
///
/// `solve` answers one goal with the textual binding of the goal's
/// [`result_var`](Goal::result_var), `Ok(None)` when the goal has no
/// solution, or an error when the store is unreachable or rejects the goal.
///
/// `&mut self` makes the one-query-at-a-time rule part of the signature:
/// a store is owned by a single gateway and queries never overlap.
pub trait KnowledgeStore {
    fn solve(&mut self, goal: &Goal) -> Result<Option<String>, KbError>;

    /// Short human-readable name used in logs.
    fn describe_backend(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    /// Root sentinel declared by the store itself, if it carries one.
    fn declared_root(&self) -> Option<&str> {
        None
    }
}

impl<S: KnowledgeStore + ?Sized> KnowledgeStore for Box<S> {
    fn solve(&mut self, goal: &Goal) -> Result<Option<String>, KbError> {
        (**self).solve(goal)
    }

    fn describe_backend(&self) -> String {
        (**self).describe_backend()
    }

    fn declared_root(&self) -> Option<&str> {
        (**self).declared_root()
    }
}

impl<S: KnowledgeStore + ?Sized> KnowledgeStore for &mut S {
    fn solve(&mut self, goal: &Goal) -> Result<Option<String>, KbError> {
        (**self).solve(goal)
    }

    fn describe_backend(&self) -> String {
        (**self).describe_backend()
    }

    fn declared_root(&self) -> Option<&str> {
        (**self).declared_root()
    }
}

//! genrex-core: query gateway and property search for a genre knowledge base.
//!
//! This crate owns everything between the presentation layer and the
//! external reasoner: the typed goal model, the list-response parser, the
//! single-property fallback cascade and the multi-property search engine.
//!
//! # Architecture
//!
//! ```text
//! Explorer ──► PropertySearch ──► Cascade ──┐
//!    │                                      ▼
//!    └──────────────────────────────► QueryGateway ──► KnowledgeStore
//! ```
//!
//! Everything is synchronous. A [`KnowledgeStore`] is owned by exactly one
//! gateway and every query borrows it mutably, so at most one query is ever
//! in flight.

pub mod cascade;
pub mod config;
pub mod error;
pub mod explorer;
pub mod gateway;
pub mod parse;
pub mod query;
pub mod search;
pub mod store;
pub mod types;

pub use error::{KbError, RequestError};
pub use explorer::Explorer;
pub use gateway::QueryGateway;
pub use query::Goal;
pub use store::KnowledgeStore;
pub use types::{MatchMode, Property, SearchRequest};

//! Shared test utilities for genrex integration harnesses.
//!
//! Import everything you need via `mod common; use common::*;` at the top of
//! each harness file.

#![allow(dead_code)]

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod scripted_store;

pub use builders::*;
pub use fixtures::*;
pub use scripted_store::*;

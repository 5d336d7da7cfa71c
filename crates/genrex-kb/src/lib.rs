//! genrex-kb: knowledge store backends for genrex.
//!
//! Two backends implement [`genrex_core::KnowledgeStore`]:
//!
//! - [`frames::FrameStore`] answers goals from a TOML knowledge file (or the
//!   bundled sample taxonomy).
//! - [`swipl::SwiplStore`] forwards goals to an SWI-Prolog process.

pub mod frames;
pub mod swipl;

pub use frames::FrameStore;
pub use swipl::SwiplStore;

use genrex_core::{
    config::{Backend, KnowledgeBaseConfig},
    KbError, KnowledgeStore,
};

/// Open the backend selected by `config`.
///
/// Failing to open is fatal for the caller; per-query failures later on are
/// not.
pub fn open(config: &KnowledgeBaseConfig) -> Result<Box<dyn KnowledgeStore>, KbError> {
    let store: Box<dyn KnowledgeStore> = match config.backend {
        Backend::Frames => match config.frames_file() {
            Some(path) => Box::new(FrameStore::load(&path)?),
            None => Box::new(FrameStore::bundled()?),
        },
        Backend::Swipl => Box::new(SwiplStore::spawn(&config.swipl)?),
    };
    tracing::info!(backend = %store.describe_backend(), "knowledge base opened");
    Ok(store)
}

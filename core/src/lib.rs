//! The cascade thinking engine.
//!
//! An [`Engine`] owns an append-only ledger of thoughts, the sequences those
//! thoughts are grouped into and the branches that fork new sequences off
//! earlier thoughts. Calls are validated, planned and only then committed.

mod branches;
mod compose;
mod engine;
mod error;
mod gap;
mod ledger;
mod resolve;
mod sequences;
mod tree;

pub use engine::{Engine, EngineOptions, ThoughtOutcome};
pub use error::EngineError;

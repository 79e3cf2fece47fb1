//! Repository module for database access
//!
//! Reads go through the pool; writes take the caller's transaction so each
//! request commits its unit of work exactly once.

pub mod analysis;
pub mod document;

pub use analysis::AnalysisRepository;
pub use document::DocumentRepository;

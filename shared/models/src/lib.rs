//! # Doc Analyzer Domain Models
//!
//! Records persisted by the storage layer and the typed form of a model
//! response.
//!
//! ## Key Models
//!
//! - **Document**: an uploaded PDF and the text extracted from it
//! - **AnalysisResult**: one classification of a document, append-only
//! - **ParsedAnalysis**: the defaulted reading of an LLM JSON answer

pub mod analysis;
pub mod document;

pub use analysis::*;
pub use document::*;

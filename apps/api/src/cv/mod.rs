//! CV ingestion: PDF text extraction, LLM structuring and categorization,
//! experience derivation, and persistence of the CV and its résumé embedding.

pub mod experience;
pub mod extractor;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod store;

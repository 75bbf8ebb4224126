//! The pipeline from raw engine events to canonical messages:
//! classify each event into candidate messages, keep the assistant-authored ones,
//! and normalize those into the caller-facing format.
pub mod classifier;
pub mod filter;
pub mod generator;
pub mod normalizer;
pub mod observer;

//! These models represent the objects passing through the dispatch layer
//!
//! There are two families of formats we need to interact with:
//! - raw engine output: channel-tagged events whose payloads carry loosely shaped messages
//! - canonical messages: the stable `{ type, data }` format handed to callers and storage
//!
//! Raw values are parsed leniently, since the engine's event shapes shift between
//! versions. Anything we can't recognize is dropped rather than treated as an error.
pub mod message;
pub mod raw;
pub mod role;
pub mod tool;

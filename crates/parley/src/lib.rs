pub mod configuration;
pub mod dispatcher;
pub mod engine;
pub mod errors;
pub mod history;
pub mod models;
pub mod service;
pub mod session;
pub mod stream;

#[cfg(test)]
pub mod mock;

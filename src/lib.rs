pub mod config;
pub mod output;
pub mod scoring;
pub mod serde_helpers;
pub mod service;
pub mod store;
pub mod transport;

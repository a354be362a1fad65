//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the stores depend on, but whose implementations
//! live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IKeyValueStore`] - String key-value persistence shared by the loan
//!   and audit stores

pub mod key_value_store;

pub use key_value_store::IKeyValueStore;

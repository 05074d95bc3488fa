//! # Certificate Registry
//!
//! Permissioned registry for issuing, querying and revoking certificates
//! under a three-tier trust hierarchy: organizations delegate to
//! universities, and universities admit the certifiers that register
//! certificate records.
//!
//! ## Layers
//! 1. **Core** ([`registry`]): the single owned store and its authorization rules
//! 2. **Services** ([`services`]): serialized transactions, audit log, HTTP API
//! 3. **Storage** ([`storage`]): JSON snapshot persistence
//! 4. **Wallet** ([`wallet`]): client-side request signing

pub mod models;
pub mod registry;
pub mod services;
pub mod settings;
pub mod storage;
pub mod utils;
pub mod wallet;

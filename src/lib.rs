//! Multi-provider query gateway for Bitcoin Cash and Bitcoin.
//!
//! The gateway answers balance, unspent-output, transaction and block-height queries and
//! broadcasts signed transactions by trying several public data providers in order,
//! falling back on transient failures. Alongside it the crate offers an exchange-rate
//! cache and converter, a codec for addresses and keys, and balance lookups formatted in
//! a display currency.
//!
//! # Module Structure
//!
//! - `bootstrap`: Builds the gateway services from configuration
//! - `models`: Chains, operations, canonical records and configuration
//! - `services`: Provider adapters, the gateway, rates and the codec
//! - `utils`: Common utilities and helper functions

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;

//! Core services.
//!
//! - `codec`: addresses, WIF keys and signatures
//! - `gateway`: ordered provider fallback per chain and operation
//! - `providers`: adapters for the remote data APIs
//! - `public_info`: balances formatted in a display currency
//! - `rates`: exchange-rate cache and amount conversion
//! - `settings`: runtime-adjustable timeouts

pub mod codec;
pub mod gateway;
pub mod providers;
pub mod public_info;
pub mod rates;
pub mod settings;

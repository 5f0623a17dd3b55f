//! Test helper utilities
//!
//! This module contains test helper utilities for the application.
//!
//! - `builders`: Test helper utilities for creating test instances of models
//! - `http`: Test helper utilities for creating HTTP clients and transports

pub mod builders {
	pub mod gateway;
	pub mod records;

	pub use gateway::GatewayConfigBuilder;
	pub use records::{TransactionBuilder, UnspentBuilder};
}


pub use builders::*;
pub use http::*;

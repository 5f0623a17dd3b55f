//! Mock implementations for testing purposes.
//!
//! This module contains mock implementations of the provider operation traits and the
//! rate source trait, plus [`MockAdapter`], which assembles operation mocks into a
//! provider adapter.
//!
//! The mocks are implemented using the `mockall` crate.

mod providers;
mod rates;
#[allow(unused_imports)]
pub use providers::*;
#[allow(unused_imports)]
pub use rates::*;

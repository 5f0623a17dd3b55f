//! Integration tests for the UTXO gateway.
//!
//! Contains tests for provider fallback, bootstrapping from configuration against
//! mocked HTTP providers, and the rate converter, plus mock implementations for testing.

mod integration {
	mod bootstrap {
		mod main;
	}
	mod gateway {
		mod fallback;
		mod output_amount;
	}
	mod mocks;
	mod rates {
		mod converter;
	}
}

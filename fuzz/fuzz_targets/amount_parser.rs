#![no_main]

use libfuzzer_sys::fuzz_target;
use utxo_gateway::services::rates::{parse_amount, to_base_units};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(amount) = parse_amount(&text) {
        let _ = to_base_units(amount, 100_000_000);
    }
});

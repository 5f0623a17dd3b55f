#![no_main]

use libfuzzer_sys::fuzz_target;
use utxo_gateway::services::codec::{cash_to_legacy, legacy_to_cash, CashAddress};

fuzz_target!(|data: &[u8]| {
    let address = String::from_utf8_lossy(data);
    if let Ok(decoded) = CashAddress::decode_lenient(&address) {
        let legacy = decoded.to_legacy();
        assert_eq!(legacy_to_cash(&legacy).ok(), Some(decoded.encode()));
    }
    let _ = cash_to_legacy(&address);
    let _ = legacy_to_cash(&address);
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use oracle_transactions::{validate_basic, OracleMsg};

fuzz_target!(|data: &[u8]| {
    // Raw bincode from an untrusted feeder.
    if let Ok(msg) = bincode::deserialize::<OracleMsg>(data) {
        if validate_basic(&msg).is_ok() {
            let _ = msg.kind();
            let _ = oracle_crypto::decode_val_address(msg.validator())
                .expect("validated message carries a decodable validator");
        }
    }
});

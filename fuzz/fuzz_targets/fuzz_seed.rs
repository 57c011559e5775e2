#![no_main]

use catalog_store::CatalogSeed;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = serde_json::from_str::<CatalogSeed>(s);
        let _ = serde_yaml::from_str::<CatalogSeed>(s);
    }
});

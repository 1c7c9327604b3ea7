#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(query) = docquery::query::parse_query_json(s) {
            // Build a few docs to exercise array search and nested paths
            let docs = [
                bson::doc!{"a": 1, "b": 2, "name": "x"},
                bson::doc!{"a": [1, 2, {"b": 3}], "nested": {"z": [{"k": "v"}]}},
                bson::doc!{"active": true, "n": null}
            ];
            for d in &docs {
                let _ = docquery::query::filter(d, &query);
            }
        }
    }
});

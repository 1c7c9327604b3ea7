#![no_main]
use libfuzzer_sys::fuzz_target;
use docquery::update::{UpdateOptions, apply_update, parse_update_json};

fuzz_target!(|data: &[u8]| {
    if data.len() > 8192 { return; }
    let Ok(s) = std::str::from_utf8(data) else { return };
    // "<query json>\n<update json>"
    let (q, u) = s.split_once('\n').unwrap_or(("{}", s));
    let (Ok(query), Ok(update)) = (docquery::query::parse_query_json(q), parse_update_json(u)) else {
        return;
    };
    let mut d = bson::doc!{"a": [1, {"b": 2}, [3]], "n": 5, "s": "x", "o": {"p": {"q": 1}}};
    let before = d.clone();
    if apply_update(&mut d, &query, &update, &UpdateOptions::default()).is_err() {
        assert_eq!(d, before, "a failed update must not touch the document");
    }
});

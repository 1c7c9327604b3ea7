use bson::{Bson, bson, doc};
use docquery::errors::DocError;
use docquery::update::{ChangeLogEntry, Modifier, UpdateOptions};

fn run(d: &mut bson::Document, q: bson::Document, u: bson::Document) -> Vec<ChangeLogEntry> {
    docquery::run(d, &q, &u, &UpdateOptions::default()).unwrap()
}

#[test]
fn set_nested_field_logs_resolved_key() {
    let mut d = doc! {"name": "Tobi", "location": {"country": "Canada"}};
    let log = run(&mut d, doc! {}, doc! {"$set": {"location.country": "US"}});
    assert_eq!(d, doc! {"name": "Tobi", "location": {"country": "US"}});
    assert_eq!(
        log,
        vec![ChangeLogEntry {
            op: Modifier::Set,
            key: "location.country".into(),
            value: Some(Bson::String("US".into())),
        }]
    );
}

#[test]
fn pull_with_in_condition() {
    let mut d = doc! {"fruits": ["apples", "pears", "oranges"]};
    let log = run(&mut d, doc! {}, doc! {"$pull": {"fruits": {"$in": ["apples", "oranges"]}}});
    assert_eq!(d, doc! {"fruits": ["pears"]});
    assert_eq!(log[0].value, Some(bson!(["apples", "oranges"])));
}

#[test]
fn positional_set_targets_first_matched_element() {
    let mut d = doc! {"a": [{"id": 1, "ok": false}, {"id": 2, "ok": true}]};
    let log = run(&mut d, doc! {"a.ok": true}, doc! {"$set": {"a.$.label": "matched"}});
    assert_eq!(
        d,
        doc! {"a": [{"id": 1, "ok": false}, {"id": 2, "ok": true, "label": "matched"}]}
    );
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].key, "a.1.label");
}

#[test]
fn inc_initialises_then_adds() {
    let mut empty = doc! {};
    run(&mut empty, doc! {}, doc! {"$inc": {"score": 5}});
    assert_eq!(empty, doc! {"score": 5});

    let mut d = doc! {"score": 3};
    let log = run(&mut d, doc! {}, doc! {"$inc": {"score": 5}});
    assert_eq!(d, doc! {"score": 8});
    assert_eq!(log[0].value, Some(Bson::Int32(5)));
}

#[test]
fn set_null_is_a_real_write() {
    let mut d = doc! {"a": "x"};
    let log = run(&mut d, doc! {}, doc! {"$set": {"a": null}});
    assert_eq!(d, doc! {"a": null});
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].value, Some(Bson::Null));
}

#[test]
fn strict_mode_skips_unmatched_documents() {
    let mut d = doc! {"a": 1};
    let log = docquery::run(
        &mut d,
        &doc! {"a": 2},
        &doc! {"$set": {"b": 1}},
        &UpdateOptions::strict(),
    )
    .unwrap();
    assert!(log.is_empty());
    assert_eq!(d, doc! {"a": 1});
}

#[test]
fn non_strict_mode_applies_even_without_a_match() {
    let mut d = doc! {"a": 1};
    let log = run(&mut d, doc! {"a": 2}, doc! {"$set": {"b": 1}});
    assert_eq!(log.len(), 1);
    assert_eq!(d, doc! {"a": 1, "b": 1});
}

#[test]
fn positional_paths_without_matches_are_skipped() {
    let mut d = doc! {"a": [{"x": 1}]};
    let log = run(&mut d, doc! {}, doc! {"$set": {"a.$.x": 2, "b": true}});
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].key, "b");
    assert_eq!(d, doc! {"a": [{"x": 1}], "b": true});
}

#[test]
fn trailing_positional_segment_addresses_the_element() {
    let mut d = doc! {"tags": ["a", "b", "c"]};
    let log = run(&mut d, doc! {"tags": "b"}, doc! {"$set": {"tags.$": "B"}});
    assert_eq!(d, doc! {"tags": ["a", "B", "c"]});
    assert_eq!(log[0].key, "tags.1");
}

#[test]
fn planning_error_leaves_document_untouched() {
    let mut d = doc! {"n": "text", "a": 1};
    let err = docquery::run(
        &mut d,
        &doc! {},
        &doc! {"$set": {"a": 2}, "$inc": {"n": 1}},
        &UpdateOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DocError::TypeMismatch(_)));
    assert!(err.is_precondition());
    assert_eq!(d, doc! {"n": "text", "a": 1});
}

#[test]
fn commits_follow_planning_order() {
    let mut d = doc! {"a": 1, "list": [1, 2]};
    let log = run(
        &mut d,
        doc! {},
        doc! {
            "$set": {"b": 2},
            "$unset": {"a": 1},
            "$push": {"list": 3},
            "$rename": {"b": "c"},
        },
    );
    let ops: Vec<_> = log.iter().map(|e| (e.op, e.key.as_str())).collect();
    assert_eq!(
        ops,
        [(Modifier::Set, "b"), (Modifier::Unset, "a"), (Modifier::Push, "list")],
        "rename of b is planned before $set commits, so it finds nothing to move"
    );
    assert_eq!(d, doc! {"list": [1, 2, 3], "b": 2});
}

#[test]
fn unknown_modifiers_are_ignored() {
    let mut d = doc! {"a": 1};
    let log = run(&mut d, doc! {}, doc! {"$mul": {"a": 3}});
    assert!(log.is_empty());
    assert_eq!(d, doc! {"a": 1});
}

#[test]
fn change_log_serializes_with_modifier_names() {
    let mut d = doc! {"a": 1};
    let log = run(&mut d, doc! {}, doc! {"$inc": {"a": 1}, "$unset": {"a": 1}});
    let json = serde_json::to_value(&log).unwrap();
    assert_eq!(json[0]["op"], "$inc");
    assert_eq!(json[0]["key"], "a");
    assert_eq!(json[1]["op"], "$unset");
    assert!(json[1]["value"].is_null());
}

#[test]
fn options_parse_from_json() {
    assert_eq!(UpdateOptions::from_json("{}").unwrap(), UpdateOptions::default());
    assert!(UpdateOptions::from_json(r#"{"strict": true}"#).unwrap().strict);
    assert!(UpdateOptions::from_json(r#"{"strict": "yes"}"#).is_err());
}

#[test]
fn typed_entry_points_accept_json() {
    let query = docquery::query::parse_query_json(r#"{"items.n": {"$gte": 2}}"#).unwrap();
    let update = docquery::update::parse_update_json(r#"{"$set": {"items.$.hit": true}}"#).unwrap();
    let mut d = doc! {"items": [{"n": 1}, {"n": 2}, {"n": 3}]};
    let log =
        docquery::update::apply_update(&mut d, &query, &update, &UpdateOptions::default()).unwrap();
    assert_eq!(log[0].key, "items.1.hit");
    assert_eq!(d, doc! {"items": [{"n": 1}, {"n": 2, "hit": true}, {"n": 3}]});
}

use bson::{Bson, doc};
use docquery::errors::DocError;
use docquery::filter_document;
use docquery::query::{MatchSet, Matches};

fn matched(d: &bson::Document, q: bson::Document) -> Option<Matches> {
    match filter_document(d, &q).unwrap() {
        MatchSet::Matched(m) => Some(m),
        MatchSet::Unmatched => None,
    }
}

#[test]
fn empty_query_is_a_vacuous_match() {
    let m = matched(&doc! {"a": 1}, doc! {}).unwrap();
    assert!(m.is_empty());
}

#[test]
fn dotted_paths_walk_objects() {
    let d = doc! {"a": {"b": 1}, "name": "Tobi"};
    assert!(matched(&d, doc! {"a.b": 1, "name": "Tobi"}).is_some());
    assert!(matched(&d, doc! {"a.b": 2}).is_none());
    assert!(matched(&d, doc! {"a.b.c": 1}).is_none());
    assert!(matched(&d, doc! {"missing": 1}).is_none());
}

#[test]
fn plain_objects_need_exact_keys() {
    let d = doc! {"loc": {"country": "US", "city": "NYC"}};
    assert!(matched(&d, doc! {"loc": {"country": "US"}}).is_none());
    assert!(matched(&d, doc! {"loc": {"city": "NYC", "country": "US"}}).is_some());
}

#[test]
fn array_subdocument_search_records_indices() {
    let d = doc! {"items": [{"n": 1}, {"n": 5}, {"n": 7}]};
    let m = matched(&d, doc! {"items.n": {"$gt": 3}}).unwrap();
    assert_eq!(m.get("items"), Some(&[1, 2][..]));
    assert_eq!(m.first("items"), Some(1));
}

#[test]
fn later_clauses_keep_indices_recorded_for_the_same_array() {
    let d = doc! {"a": [{"x": 1, "y": 1}, {"x": 2, "y": 2}]};
    let m = matched(&d, doc! {"a.x": 1, "a.y": 2}).unwrap();
    assert_eq!(m.get("a"), Some(&[0][..]));
}

#[test]
fn later_clauses_search_arrays_an_earlier_clause_left_unrecorded() {
    let d = doc! {"a": [{"x": 1, "y": 1}, {"x": 2, "y": 2}]};
    let m = matched(&d, doc! {"a.x": 9, "a.y": 2}).unwrap();
    assert_eq!(m.get("a"), Some(&[1][..]));
}

#[test]
fn scalar_arrays_compare_each_element() {
    let d = doc! {"tags": ["a", "b", "c", "b"]};
    let m = matched(&d, doc! {"tags": "b"}).unwrap();
    assert_eq!(m.get("tags"), Some(&[1, 3][..]));
}

#[test]
fn array_without_matching_element_does_not_fail() {
    let d = doc! {"tags": ["a", "b"]};
    let m = matched(&d, doc! {"tags": "z"}).unwrap();
    assert_eq!(m.get("tags"), None);
}

#[test]
fn size_is_evaluated_on_the_whole_array() {
    let d = doc! {"tags": ["a", "b", "c"]};
    assert!(matched(&d, doc! {"tags": {"$size": 3}}).unwrap().is_empty());
    assert!(matched(&d, doc! {"tags": {"$size": 2}}).is_none());
}

#[test]
fn comparison_operators() {
    let d = doc! {"age": 5, "name": "Tobi", "nick": null};
    assert!(matched(&d, doc! {"age": {"$gte": 5, "$lt": 6}}).is_some());
    assert!(matched(&d, doc! {"age": {"$gt": 5}}).is_none());
    assert!(matched(&d, doc! {"age": {"$ne": 3}}).is_some());
    assert!(matched(&d, doc! {"age": {"$in": [1, 5]}}).is_some());
    assert!(matched(&d, doc! {"age": {"$nin": [5]}}).is_none());
    assert!(matched(&d, doc! {"name": {"$gt": 1}}).is_none());
    assert!(matched(&d, doc! {"nick": {"$exists": true}}).is_some());
    assert!(matched(&d, doc! {"nick": null}).is_some());
}

#[test]
fn missing_keys_fail_even_for_negative_operators() {
    let d = doc! {"a": 1};
    assert!(matched(&d, doc! {"b": {"$exists": false}}).is_none());
    assert!(matched(&d, doc! {"b": {"$ne": 1}}).is_none());
}

#[test]
fn regex_with_options() {
    let d = doc! {"name": "Tobi", "age": 42};
    assert!(matched(&d, doc! {"name": {"$regex": "^to", "$options": "i"}}).is_some());
    assert!(matched(&d, doc! {"name": {"$regex": "^to"}}).is_none());
    assert!(matched(&d, doc! {"age": {"$regex": "^4"}}).is_some());
}

#[test]
fn elem_match_recurses_into_elements() {
    let d = doc! {"pets": [{"kind": "cat", "age": 3}, {"kind": "dog", "age": 5}]};
    let m = matched(&d, doc! {"pets": {"$elemMatch": {"kind": "dog", "age": {"$gt": 4}}}}).unwrap();
    assert_eq!(m.get("pets"), Some(&[1][..]));
    assert!(matched(&d, doc! {"pets": {"$elemMatch": {"kind": "cow"}}}).unwrap().is_empty());
}

#[test]
fn malformed_queries_are_rejected() {
    let d = doc! {"a": 1};
    assert!(matches!(
        filter_document(&d, &doc! {"a": {"$where": "1"}}),
        Err(DocError::UnknownOperator(op)) if op == "$where"
    ));
    assert!(matches!(
        filter_document(&d, &doc! {"a": {"$regex": "("}}),
        Err(DocError::Regex(_))
    ));
    assert!(matches!(
        filter_document(&d, &doc! {"a": {"$elemMatch": 1}}),
        Err(DocError::InvalidOperand(_))
    ));
}

#[test]
fn filter_value_accepts_non_document_roots() {
    let q = docquery::query::parse_query_json(r#"{"0": "x"}"#).unwrap();
    let root = Bson::Array(vec![Bson::String("x".into())]);
    assert!(docquery::query::filter_value(&root, &q).is_match());
    assert!(!docquery::query::filter_value(&Bson::Undefined, &q).is_match());
}

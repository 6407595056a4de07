use serde_json::{json, Value};

use finder_core::config::{FinderConfig, Operation};
use finder_core::error::Error;
use finder_core::types::Params;
use finder_projection::request::{
    merge, mget_request, scroll_continue_request, scroll_release_request, scroll_start_request, search_request,
};

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[test]
fn merge_descends_into_nested_objects() {
    let mut target = params(json!({ "a": 1, "body": { "_source": false, "ids": ["stale"] } }));
    merge(&mut target, &params(json!({ "body": { "ids": ["x", "y"] } })));

    assert_eq!(target, params(json!({ "a": 1, "body": { "_source": false, "ids": ["x", "y"] } })));
}

#[test]
fn caller_body_replaces_the_configured_body() {
    let config = FinderConfig::new("index", "type").with_parameters(
        Operation::Search,
        params(json!({ "timeout": "5s", "body": { "query": { "match_all": {} } } })),
    );

    let request = search_request(&config, &params(json!({ "body": { "query": { "term": { "title": "dune" } } } }))).expect("request");

    assert_eq!(
        request,
        params(json!({
            "index": "index",
            "type": "type",
            "timeout": "5s",
            "body": { "query": { "term": { "title": "dune" } } }
        }))
    );
}

#[test]
fn scroll_start_honours_a_configured_size() {
    let config = FinderConfig::new("index", "type").with_parameters(Operation::Search, params(json!({ "size": 40 })));

    let request = scroll_start_request(&config, &Params::new(), "1m", 10).expect("request");
    assert_eq!(request["size"], json!(40));

    let request = scroll_start_request(&config, &params(json!({ "size": 5 })), "1m", 10).expect("request");
    assert_eq!(request["size"], json!(5));
}

#[test]
fn merge_replaces_non_objects_wholesale() {
    let mut target = params(json!({ "sort": ["title", "year"], "body": { "a": 1 } }));
    merge(&mut target, &params(json!({ "sort": ["_doc"], "body": "raw" })));

    assert_eq!(target, params(json!({ "sort": ["_doc"], "body": "raw" })));
}

#[test]
fn mget_ids_survive_configured_body_fields() {
    let config = FinderConfig::new("index", "type")
        .with_parameters(Operation::Mget, params(json!({ "body": { "ids": ["stale"], "_source": false }, "refresh": true })));

    let request = mget_request(&config, &["a", "b"]).expect("request");

    assert_eq!(
        request,
        params(json!({ "index": "index", "type": "type", "refresh": true, "body": { "ids": ["a", "b"], "_source": false } }))
    );
}

#[test]
fn scroll_start_honours_the_query_size() {
    let config = FinderConfig::new("index", "type");
    let request = scroll_start_request(&config, &params(json!({ "size": 250 })), "30s", 10).expect("request");

    assert_eq!(request["size"], json!(250));
    assert_eq!(request["scroll"], json!("30s"));
    assert_eq!(request["sort"], json!(["_doc"]));
    assert_eq!(request["search_type"], json!("scan"));
}

#[test]
fn missing_type_is_rejected() {
    let config = FinderConfig { index: Some("index".into()), ..FinderConfig::default() };
    assert!(matches!(mget_request(&config, &["a"]), Err(Error::InvalidConfig(_))));
}

#[test]
fn scroll_continuation_and_release_carry_only_the_cursor() {
    assert_eq!(scroll_continue_request("abc", "1m"), params(json!({ "scroll": "1m", "scroll_id": "abc" })));
    assert_eq!(scroll_release_request("abc"), params(json!({ "scroll_id": "abc" })));
}

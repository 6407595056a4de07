use std::fs;

use serde::Deserialize;
use serde_json::{json, Value};
use tempfile::TempDir;

use finder_core::config::{Config, FinderConfig, Operation};
use finder_core::error::Error;
use finder_core::factory::DeserializeFactory;
use finder_core::traits::EntityFactory;
use finder_core::types::{Params, ResultSet};

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

#[test]
fn result_set_total_defaults_to_item_count() {
    let result = ResultSet::new(vec!["a", "b"]);
    assert_eq!(result.total_count(), 2);
    assert_eq!(result.offset(), 0);
    assert_eq!(result.scroll_cursor(), None);
    assert_eq!(ResultSet::<&str>::new(vec![]), ResultSet::empty());
}

#[test]
fn result_set_equality_covers_every_field() {
    let base = ResultSet::with_total(vec![1, 2], 5);
    assert_eq!(base.clone(), ResultSet::with_total(vec![1, 2], 5));
    assert_ne!(base.clone(), ResultSet::new(vec![1, 2]));
    assert_ne!(base.clone(), base.clone().at_offset(2));
    assert_ne!(base.clone(), base.clone().with_scroll_cursor("c1"));
    assert_eq!(base.clone().with_scroll_cursor("c1"), ResultSet::with_total(vec![1, 2], 5).with_scroll_cursor("c1"));
}

#[test]
fn missing_index_or_type_is_a_configuration_error() {
    let config = FinderConfig::default();
    assert!(matches!(config.index(), Err(Error::InvalidConfig(_))));
    assert!(matches!(config.doc_type(), Err(Error::InvalidConfig(_))));

    let blank = FinderConfig::new(" ", "type");
    assert!(matches!(blank.index(), Err(Error::InvalidConfig(_))));
    assert_eq!(blank.doc_type().expect("type"), "type");
}

#[test]
fn parameters_are_looked_up_per_operation() {
    let config = FinderConfig::new("index", "type").with_parameters(Operation::Mget, params(json!({ "key": "value" })));
    assert!(config.parameters.for_operation(Operation::Get).is_none());
    assert!(config.parameters.for_operation(Operation::Search).is_none());
    assert_eq!(config.parameters.for_operation(Operation::Mget), Some(&params(json!({ "key": "value" }))));
}

#[test]
fn finder_config_loads_from_layered_toml() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        r#"
[finders.books]
index = "library"
type = "book"

[finders.books.parameters.get]
routing = "shelf-a"
"#,
    )
    .unwrap();
    fs::write(
        tmp.path().join("config.test.toml"),
        r#"
[finders.books]
index = "library_test"

[finders.books.parameters.search]
timeout = "5s"
"#,
    )
    .unwrap();

    let config = Config::load_from(tmp.path(), "test").expect("load");
    let books = config.finder("books").expect("finder");
    assert_eq!(books.index.as_deref(), Some("library_test"));
    assert_eq!(books.doc_type.as_deref(), Some("book"));
    assert_eq!(books.parameters.get, Some(params(json!({ "routing": "shelf-a" }))));
    assert_eq!(books.parameters.search, Some(params(json!({ "timeout": "5s" }))));
    assert!(books.parameters.mget.is_none());
}

#[test]
fn unknown_finder_is_reported() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[finders.books]\nindex = \"library\"\n").unwrap();
    let config = Config::load_from(tmp.path(), "dev").expect("load");
    assert!(config.finder("authors").is_err());
}

#[derive(Debug, Deserialize, PartialEq)]
struct Book {
    title: String,
    pages: u32,
}

#[test]
fn deserialize_factory_builds_entities_from_source() {
    let factory = DeserializeFactory::<Book>::new();
    let book = factory.create_entity(&params(json!({ "title": "Dune", "pages": 412, "extra": true }))).expect("entity");
    assert_eq!(book, Book { title: "Dune".into(), pages: 412 });

    let err = factory.create_entity(&params(json!({ "title": "Dune" }))).unwrap_err();
    assert!(matches!(err, Error::Entity(_)));
}

#[test]
fn closures_act_as_entity_factories() {
    let factory = |attributes: &Params| -> finder_core::error::Result<String> {
        Ok(attributes.get("title").and_then(Value::as_str).unwrap_or_default().to_string())
    };
    assert_eq!(factory.create_entity(&params(json!({ "title": "Emma" }))).unwrap(), "Emma");
}

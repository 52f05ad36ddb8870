//! Unit tests for core nagare functionality.
mod common;
use nagare::document::{PropValue, Properties};
use nagare::prelude::*;
use std::sync::Arc;

#[test]
fn test_locate() {
    let source = Source::new("ab\ncd\r\nef\rg");
    let at = |position| {
        let l = locate(&source, position);
        (l.line, l.column)
    };

    assert_eq!(at(0), (1, 1));
    assert_eq!(at(2), (1, 3));
    assert_eq!(at(3), (2, 1));
    assert_eq!(at(7), (3, 1));
    assert_eq!(at(10), (4, 1));
    // Past the end resolves against the last line.
    assert_eq!(at(13), (4, 4));
}

#[test]
fn test_source_line_uses_locate_breaks() {
    let source = Source::new("ab\ncd\r\nef\rg");
    assert_eq!(source.line(1), Some("ab"));
    assert_eq!(source.line(2), Some("cd"));
    assert_eq!(source.line(3), Some("ef"));
    assert_eq!(source.line(4), Some("g"));
    assert_eq!(source.line(5), None);
    assert_eq!(source.line(0), None);

    // A lone `\r` ends a line both for `locate` and for `line`.
    let source = Source::new("one\rtwo\rthree");
    let location = locate(&source, 8);
    assert_eq!(source.line(location.line), Some("three"));

    assert_eq!(Source::new("").line(1), Some(""));
    assert_eq!(Source::new("x\n").line(2), Some(""));
}

#[test]
fn test_loc_display_and_text() {
    let source = Arc::new(Source::named("ci.workflow", "action A {}"));
    let loc = Loc::new(&source, 7, 8);
    assert_eq!(loc.to_string(), "ci.workflow:1:8");
    assert_eq!(loc.text(), "A");

    let joined = Loc::new(&source, 0, 6).join(&Loc::new(&source, 9, 11));
    assert_eq!(joined.text(), "action A {}");

    let unnamed = Loc::new(&Arc::new(Source::from("x")), 0, 1);
    assert_eq!(unnamed.to_string(), "1:1");
}

#[test]
fn test_catalog_from_json_list() {
    let catalog = ActionCatalog::from_json(
        r#"[
            {"id": "docker://node", "name": "Node", "icon": "box", "color": "green"},
            {"id": "deploy", "name": "Deploy", "description": "Ships it"}
        ]"#,
    )
    .expect("Failed to parse catalog");

    assert_eq!(catalog.len(), 2);
    let node = catalog.get("docker://node").expect("Missing node action");
    assert_eq!(node.icon, "box");
    assert!(node.description.is_empty());
    assert_eq!(catalog.get("deploy").map(|a| a.description.as_str()), Some("Ships it"));
}

#[test]
fn test_catalog_from_json_map() {
    let catalog = ActionCatalog::from_json(r#"{"k": {"id": "k", "name": "Kit"}}"#)
        .expect("Failed to parse catalog");
    assert!(catalog.contains("k"));
    assert_eq!(catalog.iter().count(), 1);

    let err = ActionCatalog::from_json(r#"{"k": {"id": "other", "name": "Kit"}}"#)
        .expect_err("Expected a mismatch");
    assert!(matches!(err, CatalogError::MismatchedId { ref key, ref id } if key == "k" && id == "other"));

    let err = ActionCatalog::from_json("[{\"name\": 3}]").expect_err("Expected a JSON error");
    assert!(matches!(err, CatalogError::JsonParseError(_)));
}

#[test]
fn test_catalog_from_missing_file() {
    let err = ActionCatalog::from_file("does/not/exist.json").expect_err("Expected an IO error");
    assert!(matches!(err, CatalogError::Io(_)));
    assert!(err.to_string().starts_with("Failed to read action catalog"));
}

#[test]
fn test_catalog_insert_replaces() {
    let mut catalog = ActionCatalog::new();
    assert!(catalog.is_empty());
    assert!(catalog.insert(Action::new("k", "Kit")).is_none());

    let previous = catalog.insert(Action::new("k", "Kit v2"));
    assert_eq!(previous.map(|a| a.name), Some("Kit".to_string()));
    assert_eq!(catalog.get("k").map(|a| a.name.as_str()), Some("Kit v2"));
}

#[test]
fn test_layout_config_json() {
    let layout = LayoutConfig::from_json(r#"{"gap": 10, "card_width": 120.5}"#).expect("Failed to parse layout");
    assert_eq!(layout.gap, 10.0);
    assert_eq!(layout.card_width, 120.5);
    assert_eq!(layout.card_height, LayoutConfig::default().card_height);
    assert_eq!(layout.column_step(), 130.5);

    assert_eq!(LayoutConfig::from_json("{}").expect("Failed to parse layout"), LayoutConfig::default());
    assert!(LayoutConfig::from_json(r#"{"gap": "wide"}"#).is_err());
}

#[test]
fn test_properties_keep_insertion_order() {
    let mut props: Properties = [("b", PropValue::Int(1)), ("a", PropValue::Bool(true))]
        .into_iter()
        .collect();
    assert_eq!(props.insert("b", PropValue::Int(2)), Some(PropValue::Int(1)));
    props.insert("c", PropValue::Reference("Build".into()));

    let keys: Vec<&str> = props.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    assert_eq!(props.get("c").and_then(PropValue::as_str), Some("Build"));
    assert_eq!(props.get("b").and_then(PropValue::as_f64), Some(2.0));

    assert_eq!(props.remove("a"), Some(PropValue::Bool(true)));
    assert_eq!(props.len(), 2);
    assert_eq!(
        serde_json::to_string(&props).expect("Failed to encode"),
        r#"{"b":2,"c":"Build"}"#
    );
}

#[test]
fn test_error_messages() {
    let source = Arc::new(Source::new("action A {\n\tuses = 1\n}"));
    let loc = Loc::new(&source, 12, 16);

    let err = SemanticError::InvalidValue {
        property: "uses".into(),
        expected: "a string or a reference",
        loc: loc.clone(),
    };
    assert_eq!(err.to_string(), "Invalid value for 'uses' at 2:2: expected a string or a reference");

    let err = SemanticError::CyclicDependency { id: "A".into(), loc: loc.clone() };
    assert_eq!(err.to_string(), "'A' depends on itself through 'needs' (at 2:2)");

    let err = SyntaxError::UnexpectedToken {
        found: "<EOF>".into(),
        expected: None,
        loc: loc.clone(),
    };
    assert_eq!(err.to_string(), "Unexpected <EOF> at 2:2");

    let wrapped = WorkflowError::from(err.clone());
    assert_eq!(wrapped.to_string(), err.to_string());
    assert_eq!(wrapped.loc(), Some(&loc));
}

#[test]
fn test_ast_json() {
    let ast = parse("action A {\n\tuses = \"k\"\n}").expect("Failed to parse");
    let json = serde_json::to_value(&ast).expect("Failed to encode");

    let definition = &json["definitions"][0];
    assert_eq!(definition["kind"], "Action");
    assert_eq!(definition["name"]["value"], "A");
    assert_eq!(definition["properties"][0]["value"]["kind"], "StringValue");
    assert_eq!(definition["properties"][0]["value"]["loc"]["start"]["line"], 2);
}

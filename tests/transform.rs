//! Tests for AST resolution and the default layout.
mod common;
use common::*;
use nagare::prelude::*;
use std::io;
use std::sync::{Arc, Mutex};

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a warning-level subscriber and returns what it logged.
fn captured_warnings(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn transform_error(text: &str, catalog: &ActionCatalog) -> SemanticError {
    let ast = parse(text).expect("Failed to parse");
    transform(&ast, catalog).expect_err("Expected a semantic error")
}

fn position(document: &Document<'_>, id: &str) -> (f64, f64) {
    document.get(id).expect("Missing node").position()
}

#[test]
fn test_unknown_action_with_empty_catalog() {
    let err = transform_error("action \"A\" {\n\tuses = \"x\"\n}", &ActionCatalog::new());
    assert!(matches!(err, SemanticError::InvalidAction { ref uses, .. } if uses == "x"));
    assert_eq!(err.to_string(), "x is not a valid action (at 2:9)");
}

#[test]
fn test_undefined_needs() {
    let catalog = create_catalog();
    let err = transform_error("action B {\n\tneeds = Z\n\tuses = \"k\"\n}", &catalog);
    assert!(matches!(err, SemanticError::UndefinedReference { ref id, .. } if id == "Z"));
    assert_eq!(err.to_string(), "Action or Workflow 'Z' is not defined (at 2:10)");
}

#[test]
fn test_workflow_with_one_action() {
    let catalog = create_catalog();
    let document = compile_with(SIMPLE_WORKFLOW, &catalog);

    assert_eq!(document.len(), 2);
    let workflow = document.get("W").expect("Missing W");
    let action = document.get("C").expect("Missing C");

    assert_eq!(workflow.index, 0);
    assert_eq!(workflow.children, vec!["C".to_string()]);
    assert_eq!(workflow.as_workflow().map(|w| w.on.as_str()), Some("push"));

    assert_eq!(action.index, 1);
    assert_eq!(action.parent_id(), Some("W"));
    assert_eq!(action.explicit_x, None);
    assert_eq!(action.explicit_y, None);
    let layout = LayoutConfig::default();
    assert_eq!(
        action.position(),
        (workflow.x, workflow.y + layout.trigger_height + layout.gap)
    );

    let node = action.as_action().expect("C is an action");
    assert_eq!(node.uses, "k");
    assert_eq!(node.action.name, "Kit");
    assert!(node.props.is_empty());
}

#[test]
fn test_pipeline_layout() {
    let catalog = create_catalog();
    let document = compile_with(PIPELINE_WORKFLOW, &catalog);

    assert_eq!(document.root().map(|n| n.id.as_str()), Some("Ship"));
    assert_eq!(position(&document, "Ship"), (0.0, 0.0));
    assert_eq!(position(&document, "Build"), (0.0, 150.0));
    assert_eq!(position(&document, "Test"), (0.0, 400.0));
    assert_eq!(position(&document, "Lint"), (300.0, 400.0));
    assert_eq!(position(&document, "Deploy prod"), (900.0, 40.0));

    let indices: Vec<usize> = document.nodes().iter().map(|n| n.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 2, 3]);

    let build = document.get("Build").expect("Missing Build");
    assert_eq!(build.children, vec!["Test".to_string(), "Lint".to_string()]);
}

#[test]
fn test_custom_layout_geometry() {
    let catalog = create_catalog();
    let ast = parse(PIPELINE_WORKFLOW).expect("Failed to parse");
    let layout = LayoutConfig {
        card_width: 100.0,
        card_height: 80.0,
        trigger_height: 40.0,
        gap: 10.0,
    };
    let transformer = Transformer::builder(&catalog).with_layout(layout).build();
    assert_eq!(transformer.layout(), &layout);

    let document = transformer.transform(&ast).expect("Failed to transform");
    assert_eq!(position(&document, "Build"), (0.0, 50.0));
    assert_eq!(position(&document, "Test"), (0.0, 140.0));
    assert_eq!(position(&document, "Lint"), (110.0, 140.0));
}

#[test]
fn test_index_follows_parent() {
    let catalog = create_catalog();
    let document = compile_with(PIPELINE_WORKFLOW, &catalog);

    for node in document.nodes() {
        match document.parent(node) {
            Some(parent) => assert_eq!(node.index, parent.index + 1, "node {}", node.id),
            None => assert_eq!(node.index, 0, "node {}", node.id),
        }
        for child in document.children(node) {
            assert_eq!(child.parent_id(), Some(node.id.as_str()));
        }
    }
}

#[test]
fn test_properties_are_flattened() {
    let catalog = create_catalog();
    let document = compile_with(PIPELINE_WORKFLOW, &catalog);

    let build = document.get("Build").and_then(|n| n.as_action()).expect("Missing Build");
    assert!(!build.props.contains_key("needs"));
    assert!(!build.props.contains_key("uses"));
    let Some(PropValue::Object(args)) = build.props.get("args") else {
        panic!("Expected nested args, got {:?}", build.props.get("args"));
    };
    assert_eq!(args.get("script"), Some(&PropValue::String("npm run build".into())));
    assert_eq!(args.get("retries"), Some(&PropValue::Int(2)));

    let test = document.get("Test").and_then(|n| n.as_action()).expect("Missing Test");
    assert_eq!(test.props.get("parallel"), Some(&PropValue::Bool(true)));

    let lint = document.get("Lint").and_then(|n| n.as_action()).expect("Missing Lint");
    assert_eq!(lint.props.get("ratio"), Some(&PropValue::Float(0.5)));

    let ship = document.get("Ship").expect("Missing Ship");
    assert_eq!(ship.label.as_deref(), Some("Ship it"));
}

#[test]
fn test_reserved_values_are_stringified() {
    let catalog = create_catalog();
    let document = compile_with(
        "workflow W {\n\ton = push\n\tlabel = 42\n}\naction A {\n\tuses = k\n\ton = \"kept\"\n\tref = W\n}",
        &catalog,
    );

    let workflow = document.get("W").expect("Missing W");
    assert_eq!(workflow.as_workflow().map(|w| w.on.as_str()), Some("push"));
    assert_eq!(workflow.label.as_deref(), Some("42"));

    let action = document.get("A").and_then(|n| n.as_action()).expect("Missing A");
    assert_eq!(action.uses, "k");
    // `on` is only reserved on workflows.
    assert_eq!(action.props.get("on"), Some(&PropValue::String("kept".into())));
    assert_eq!(action.props.get("ref"), Some(&PropValue::Reference("W".into())));
}

#[test]
fn test_repeated_key_keeps_last_value() {
    let catalog = create_catalog();
    let document = compile_with(
        "action A {\n\tuses = \"k\"\n\tmode = 1\n\tother = 2\n\tmode = 3\n\tx = 5\n\tx = 7\n}",
        &catalog,
    );
    let node = document.get("A").expect("Missing A");
    assert_eq!(node.explicit_x, Some(7.0));

    let props: Vec<(&str, &PropValue)> = node.as_action().expect("A is an action").props.iter().collect();
    assert_eq!(props, vec![("other", &PropValue::Int(2)), ("mode", &PropValue::Int(3))]);
}

#[test]
fn test_workflow_drops_extra_properties() {
    let catalog = create_catalog();
    let document = compile_with(
        "workflow W {\n\ton = \"push\"\n\tcolor = \"red\"\n\tneeds = Other\n}",
        &catalog,
    );
    let workflow = document.get("W").expect("Missing W");
    assert!(workflow.parent_id().is_none());
    assert_eq!(workflow.index, 0);
}

#[test]
fn test_workflow_uses_is_dropped_with_a_warning() {
    let catalog = create_catalog();
    let logs = captured_warnings(|| {
        let document = compile_with(
            "workflow W {\n\ton = \"push\"\n\tuses = { image = 1 }\n\tcolor = \"red\"\n}",
            &catalog,
        );
        assert!(document.get("W").is_some_and(DocumentNode::is_workflow));
    });

    assert!(logs.contains("Dropping properties a workflow does not carry"));
    assert!(logs.contains("properties=uses, color"));
}

#[test]
fn test_explicit_coordinates() {
    let catalog = create_catalog();
    let document = compile_with(
        "workflow W {\n\ton = \"push\"\n\tx = 10\n\ty = 20.5\n}\naction A {\n\tneeds = W\n\tuses = \"k\"\n\ty = 500\n}",
        &catalog,
    );

    let workflow = document.get("W").expect("Missing W");
    assert_eq!((workflow.explicit_x, workflow.explicit_y), (Some(10.0), Some(20.5)));

    // Only the missing coordinate is derived.
    let action = document.get("A").expect("Missing A");
    assert_eq!(action.explicit_x, None);
    assert_eq!(action.position(), (10.0, 500.0));
}

#[test]
fn test_non_numeric_coordinate() {
    let catalog = create_catalog();
    let err = transform_error("action A {\n\tuses = \"k\"\n\tx = \"left\"\n}", &catalog);
    let SemanticError::InvalidCoordinate { property, loc } = err else {
        panic!("Expected an invalid coordinate, got {:?}", err);
    };
    assert_eq!(property, "x");
    assert_eq!((loc.start.line, loc.start.column), (3, 2));
}

#[test]
fn test_invalid_reserved_values() {
    let catalog = create_catalog();

    let err = transform_error("action A {\n\tuses = { id = 1 }\n}", &catalog);
    assert!(matches!(err, SemanticError::InvalidValue { ref property, .. } if property == "uses"));

    let err = transform_error("action A {\n\tuses = \"k\"\n\tneeds = 3\n}", &catalog);
    assert!(matches!(err, SemanticError::InvalidValue { ref property, .. } if property == "needs"));

    let err = transform_error("workflow W {\n\tlabel = {\n\t}\n}", &catalog);
    assert!(matches!(err, SemanticError::InvalidValue { ref property, .. } if property == "label"));
}

#[test]
fn test_missing_uses() {
    let catalog = create_catalog();
    let err = transform_error("workflow W {\n}\naction A {\n\tneeds = W\n}", &catalog);
    let SemanticError::InvalidAction { uses, loc } = err else {
        panic!("Expected an invalid action, got {:?}", err);
    };
    assert!(uses.is_empty());
    assert_eq!(loc.start.line, 3);
}

#[test]
fn test_duplicate_definitions() {
    let catalog = create_catalog();
    let err = transform_error(
        "workflow W {\n}\naction A {\n\tuses = \"k\"\n}\naction A {\n\tuses = \"k\"\n}",
        &catalog,
    );
    let SemanticError::DuplicateDefinition { id, loc } = err else {
        panic!("Expected a duplicate definition, got {:?}", err);
    };
    assert_eq!(id, "A");
    assert_eq!(loc.start.line, 6);
}

#[test]
fn test_cyclic_needs() {
    let catalog = create_catalog();
    let err = transform_error(
        "workflow W {\n}\naction A {\n\tneeds = B\n\tuses = \"k\"\n}\naction B {\n\tneeds = A\n\tuses = \"k\"\n}",
        &catalog,
    );
    let SemanticError::CyclicDependency { id, loc } = err else {
        panic!("Expected a cycle, got {:?}", err);
    };
    assert_eq!(id, "A");
    assert_eq!((loc.start.line, loc.start.column), (4, 10));

    let err = transform_error("action A {\n\tneeds = A\n\tuses = \"k\"\n}", &catalog);
    assert!(matches!(err, SemanticError::CyclicDependency { ref id, .. } if id == "A"));
}

#[test]
fn test_detached_actions_keep_their_positions() {
    let catalog = create_catalog();
    let document = compile_with(
        "workflow W {\n}\naction Loose {\n\tuses = \"k\"\n}\naction Child {\n\tneeds = Loose\n\tuses = \"k\"\n}",
        &catalog,
    );
    let loose = document.get("Loose").expect("Missing Loose");
    let child = document.get("Child").expect("Missing Child");

    assert_eq!((loose.index, child.index), (0, 1));
    assert_eq!(loose.position(), (0.0, 0.0));
    assert_eq!(child.position(), (0.0, 0.0));
}

#[test]
fn test_first_workflow_is_root() {
    let catalog = create_catalog();
    let document = compile_with(
        "workflow First {\n}\nworkflow Second {\n\tx = 600\n}\naction A {\n\tneeds = Second\n\tuses = \"k\"\n}",
        &catalog,
    );
    assert_eq!(document.root().map(|n| n.id.as_str()), Some("First"));

    let action = document.get("A").expect("Missing A");
    assert_eq!(action.index, 1);
    assert_eq!(action.position(), (0.0, 0.0));
}

#[test]
fn test_no_workflow() {
    let catalog = create_catalog();
    let document = compile_with("action A {\n\tuses = \"k\"\n}", &catalog);
    assert!(document.root().is_none());
    assert_eq!(document.len(), 1);
}

#[test]
fn test_transform_is_idempotent() {
    let catalog = create_catalog();
    let ast = parse(PIPELINE_WORKFLOW).expect("Failed to parse");

    let first = transform(&ast, &catalog).expect("Failed to transform");
    let second = transform(&ast, &catalog).expect("Failed to transform");
    assert_eq!(first, second);
}

#[test]
fn test_compile_reports_both_error_kinds() {
    let catalog = create_catalog();

    let err = nagare::compile("action A {", &catalog).expect_err("Expected an error");
    assert!(matches!(err, WorkflowError::Syntax(_)));

    let err = nagare::compile("action A {\n\tuses = \"nope\"\n}", &catalog).expect_err("Expected an error");
    assert!(matches!(err, WorkflowError::Semantic(SemanticError::InvalidAction { .. })));
    assert_eq!(err.loc().map(|l| l.start.line), Some(2));
}

#[test]
fn test_document_json() {
    let catalog = create_catalog();
    let document = compile_with(SIMPLE_WORKFLOW, &catalog);
    let json = serde_json::to_value(&document).expect("Failed to encode");

    let nodes = json["nodes"].as_array().expect("nodes array");
    assert_eq!(nodes[0]["kind"], "Workflow");
    assert_eq!(nodes[0]["on"], "push");
    assert_eq!(nodes[0]["resolves"][0], "C");
    assert_eq!(nodes[1]["kind"], "Action");
    assert_eq!(nodes[1]["resolvedById"], "W");
    assert_eq!(nodes[1]["action"]["id"], "k");
    assert_eq!(nodes[1]["y"], 150.0);
    assert!(nodes[1].get("_x").is_none());
}

//! Common test fixtures: an action catalog and sample workflow sources.
use nagare::prelude::*;

/// A catalog with the actions used by the sample workflows.
#[allow(dead_code)]
pub fn create_catalog() -> ActionCatalog {
    [
        Action::new("k", "Kit"),
        Action::new("docker://node", "Node"),
        Action::new("deploy", "Deploy"),
    ]
    .into_iter()
    .collect()
}

/// One workflow with one action hanging off it.
#[allow(dead_code)]
pub const SIMPLE_WORKFLOW: &str = r#"workflow "W" {
    on = "push"
}

action "C" {
    needs = "W"
    uses = "k"
}
"#;

/// A small pipeline:
///
/// ```text
/// Ship -> Build -> Test -> Deploy prod (pinned)
///               -> Lint
/// ```
#[allow(dead_code)]
pub const PIPELINE_WORKFLOW: &str = r#"# Build and ship
workflow "Ship" {
	on = "push"
	label = "Ship it"
}

action Build {
	needs = Ship
	uses = "docker://node"
	args = {
		script = "npm run build"
		retries = 2
	}
}

action Test {
	needs = Build
	uses = "docker://node"
	parallel = true
}

# Runs next to Test
action Lint {
	needs = Build
	uses = "docker://node"
	ratio = 0.5
}

action "Deploy prod" {
	needs = Test
	uses = "deploy"
	x = 900
	y = 40
}
"#;

/// Parses and transforms a source against the fixture catalog.
#[allow(dead_code)]
pub fn compile_with<'c>(text: &str, catalog: &'c ActionCatalog) -> Document<'c> {
    nagare::compile(text, catalog).expect("Failed to compile workflow")
}

/// Whether two cards of the default geometry overlap.
#[allow(dead_code)]
pub fn cards_overlap(a: (f64, f64), b: (f64, f64), config: &LayoutConfig) -> bool {
    a.0 + config.card_width > b.0
        && a.0 < b.0 + config.card_width
        && a.1 + config.card_height > b.1
        && a.1 < b.1 + config.card_height
}

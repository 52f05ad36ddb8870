//! Renders a [`Document`] back into workflow source text.
//!
//! The output is canonical rather than faithful: comments and original spacing are
//! gone, properties are written one per line with tab indentation and every block is
//! followed by a blank line. Parsing and transforming the output yields the same
//! document as long as every node carries explicit coordinates.

use crate::document::{Document, DocumentNode, NodeType, PropValue, Properties};
use std::fmt::{self, Write};

/// Whole coordinates below this magnitude are exact as integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serializes every node in document order.
pub fn serialize(document: &Document<'_>) -> String {
    Text(document).to_string()
}

struct Text<'a, 'c>(&'a Document<'c>);

impl fmt::Display for Text<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.0.nodes() {
            write_node(f, node)?;
        }
        Ok(())
    }
}

fn write_node(out: &mut impl Write, node: &DocumentNode<'_>) -> fmt::Result {
    let keyword = if node.is_workflow() { "workflow" } else { "action" };
    writeln!(out, "{} {} {{", keyword, identifier(&node.id))?;

    match &node.node_type {
        NodeType::Action(action) => {
            if let Some(parent) = &action.parent {
                writeln!(out, "\tneeds = {}", identifier(parent))?;
            }
            write_label(out, node)?;
            writeln!(out, "\tuses = {}", quoted(&action.uses))?;
            write_properties(out, &action.props, 1)?;
        }
        NodeType::Workflow(workflow) => {
            write_label(out, node)?;
            writeln!(out, "\ton = {}", quoted(&workflow.on))?;
        }
    }

    if let Some(x) = node.explicit_x {
        writeln!(out, "\tx = {}", coordinate(x))?;
    }
    if let Some(y) = node.explicit_y {
        writeln!(out, "\ty = {}", coordinate(y))?;
    }
    out.write_str("}\n\n")
}

fn write_label(out: &mut impl Write, node: &DocumentNode<'_>) -> fmt::Result {
    match &node.label {
        Some(label) => writeln!(out, "\tlabel = {}", quoted(label)),
        None => Ok(()),
    }
}

fn write_properties(out: &mut impl Write, props: &Properties, depth: usize) -> fmt::Result {
    let indent = "\t".repeat(depth);
    for (key, value) in props.iter() {
        write!(out, "{}{} = ", indent, key)?;
        match value {
            PropValue::Object(nested) => {
                out.write_str("{\n")?;
                write_properties(out, nested, depth + 1)?;
                writeln!(out, "{}}}", indent)?;
            }
            other => writeln!(out, "{}", literal(other))?,
        }
    }
    Ok(())
}

fn literal(value: &PropValue) -> String {
    match value {
        PropValue::String(s) => quoted(s),
        PropValue::Reference(name) => identifier(name),
        PropValue::Int(n) => n.to_string(),
        PropValue::Bool(b) => b.to_string(),
        PropValue::Float(n) => float(*n),
        PropValue::Object(_) => String::new(),
    }
}

/// Whole floats keep a decimal point.
fn float(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

fn coordinate(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        format!("{}", n as i64)
    } else {
        float(n)
    }
}

fn quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Writes a name bare when it would read back as the same name token, and quoted
/// otherwise.
fn identifier(name: &str) -> String {
    let mut chars = name.chars();
    let bare = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name != "true"
        && name != "false";
    if bare { name.to_string() } else { quoted(name) }
}

use crate::ast::{Definition, DefinitionKind, Property, Value};
use crate::document::{PropValue, Properties};
use crate::error::SemanticError;

/// The properties of a definition, with reserved keys pulled out of the generic bag.
/// When a key repeats, the last occurrence wins.
#[derive(Default)]
pub(super) struct ReservedProperties<'a> {
    pub label: Option<&'a Property>,
    pub x: Option<&'a Property>,
    pub y: Option<&'a Property>,
    pub needs: Option<&'a Property>,
    pub uses: Option<&'a Property>,
    pub on: Option<&'a Property>,
    pub rest: Vec<&'a Property>,
}

impl<'a> ReservedProperties<'a> {
    pub(super) fn split(definition: &'a Definition) -> Self {
        let mut reserved = ReservedProperties::default();
        for property in &definition.properties {
            let slot = match (property.name.value.as_str(), definition.kind) {
                ("label", _) => &mut reserved.label,
                ("x", _) => &mut reserved.x,
                ("y", _) => &mut reserved.y,
                ("needs", _) => &mut reserved.needs,
                ("uses", DefinitionKind::Action) => &mut reserved.uses,
                ("on", DefinitionKind::Workflow) => &mut reserved.on,
                _ => {
                    reserved.rest.retain(|p| p.name.value != property.name.value);
                    reserved.rest.push(property);
                    continue;
                }
            };
            *slot = Some(property);
        }
        reserved
    }
}

/// Reads an `x`/`y` coordinate, which must be a number literal.
pub(super) fn coordinate(property: Option<&Property>) -> Result<Option<f64>, SemanticError> {
    let Some(property) = property else {
        return Ok(None);
    };
    property
        .value
        .as_f64()
        .map(Some)
        .ok_or_else(|| SemanticError::InvalidCoordinate {
            property: property.name.value.clone(),
            loc: property.loc.clone(),
        })
}

/// Reads a value naming another definition or a catalog action: a string or a
/// bare reference.
pub(super) fn identifier(property: &Property) -> Result<String, SemanticError> {
    property
        .value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| SemanticError::InvalidValue {
            property: property.name.value.clone(),
            expected: "a string or a reference",
            loc: property.loc.clone(),
        })
}

/// Reads any scalar value as text.
pub(super) fn scalar_text(property: &Property) -> Result<String, SemanticError> {
    match &property.value {
        Value::Object(_) => Err(SemanticError::InvalidValue {
            property: property.name.value.clone(),
            expected: "a scalar value",
            loc: property.loc.clone(),
        }),
        Value::String { value, .. } | Value::Reference { value, .. } => Ok(value.clone()),
        other => Ok(other.to_string()),
    }
}

/// Flattens AST properties into an ordered bag, recursing into nested objects.
pub(super) fn to_properties<'a>(properties: impl IntoIterator<Item = &'a Property>) -> Properties {
    properties
        .into_iter()
        .map(|p| (p.name.value.clone(), to_prop_value(&p.value)))
        .collect()
}

fn to_prop_value(value: &Value) -> PropValue {
    match value {
        Value::Int { value, .. } => PropValue::Int(*value),
        Value::Float { value, .. } => PropValue::Float(*value),
        Value::String { value, .. } => PropValue::String(value.clone()),
        Value::Boolean { value, .. } => PropValue::Bool(*value),
        Value::Reference { value, .. } => PropValue::Reference(value.clone()),
        Value::Object(object) => PropValue::Object(to_properties(&object.properties)),
    }
}

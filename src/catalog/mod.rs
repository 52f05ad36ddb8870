//! Action metadata supplied by the host application.
//!
//! The transformer only needs to know which `uses` identifiers exist and what they
//! resolve to; where the catalog comes from (a registry service, a bundled JSON
//! file) is up to the caller.

use crate::error::CatalogError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Metadata describing an action that workflow nodes can `use`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
}

impl Action {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            color: String::new(),
        }
    }
}

/// Either accepted JSON layout for a catalog file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawCatalog {
    List(Vec<Action>),
    Map(AHashMap<String, Action>),
}

/// Mapping from action identifier to its metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionCatalog {
    actions: AHashMap<String, Action>,
}

impl ActionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a catalog from either a JSON array of actions or a JSON object keyed
    /// by action id.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        match serde_json::from_str(json)? {
            RawCatalog::List(actions) => Ok(actions.into_iter().collect()),
            RawCatalog::Map(map) => {
                let mut catalog = Self::new();
                for (key, action) in map {
                    if key != action.id {
                        return Err(CatalogError::MismatchedId { key, id: action.id });
                    }
                    catalog.insert(action);
                }
                Ok(catalog)
            }
        }
    }

    /// Loads a catalog JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Adds an action, replacing any previous entry with the same id.
    pub fn insert(&mut self, action: Action) -> Option<Action> {
        self.actions.insert(action.id.clone(), action)
    }

    pub fn get(&self, id: &str) -> Option<&Action> {
        self.actions.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values()
    }
}

impl FromIterator<Action> for ActionCatalog {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for action in iter {
            catalog.insert(action);
        }
        catalog
    }
}

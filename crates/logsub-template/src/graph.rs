//! Resource graph and template document

use crate::error::TemplateError;
use crate::resource::Resource;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered logical id → resource map
///
/// Iteration order is insertion order, so emission order is preserved
/// when the template is written back out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceGraph {
    resources: IndexMap<String, Resource>,
}

impl ResourceGraph {
    /// Create empty graph
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a resource
    #[inline]
    #[must_use]
    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    /// Check whether a logical id is declared
    #[inline]
    #[must_use]
    pub fn contains(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    /// Declared type of a resource, if present
    #[inline]
    #[must_use]
    pub fn resource_type(&self, logical_id: &str) -> Option<&str> {
        self.get(logical_id).map(|r| r.resource_type.as_str())
    }

    /// Declare a new resource
    ///
    /// # Errors
    /// - `TemplateError::DuplicateLogicalId` if the id is already declared;
    ///   the existing resource is left untouched
    pub fn insert_new(
        &mut self,
        logical_id: impl Into<String>,
        resource: Resource,
    ) -> Result<(), TemplateError> {
        let logical_id = logical_id.into();
        if let Some(existing) = self.resources.get(&logical_id) {
            return Err(TemplateError::duplicate(
                logical_id,
                existing.resource_type.clone(),
            ));
        }
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    /// Declare a resource unless the id is already taken
    ///
    /// Returns `true` if the resource was inserted.
    pub fn insert_if_absent(&mut self, logical_id: impl Into<String>, resource: Resource) -> bool {
        match self.resources.entry(logical_id.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(resource);
                true
            }
        }
    }

    /// Iterate over `(logical id, resource)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Logical ids in insertion order
    pub fn logical_ids(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Number of declared resources
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if graph is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl FromIterator<(String, Resource)> for ResourceGraph {
    fn from_iter<I: IntoIterator<Item = (String, Resource)>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

/// A compiled template document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// `Resources` section
    #[serde(rename = "Resources", default)]
    pub resources: ResourceGraph,

    /// All other top-level sections, untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Template {
    /// Create template with an empty resource section
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON text
    ///
    /// # Errors
    /// Returns error if the text is not a valid template
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode from a JSON value
    ///
    /// # Errors
    /// Returns error if the value is not a valid template
    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Encode as a JSON value
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn to_value(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Encode as JSON text
    ///
    /// # Errors
    /// Returns error if encoding fails
    pub fn to_json(&self, pretty: bool) -> Result<String, TemplateError> {
        let text = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(text)
    }
}

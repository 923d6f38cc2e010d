//! Resource records

use crate::error::TemplateError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// A single resource declaration
///
/// Keys other than the four the engine understands (`Condition`,
/// `Metadata`, `UpdateReplacePolicy`, ...) are carried through untouched.
/// A decoded resource is written back exactly as it was read, key order
/// and `DependsOn` shape included, until one of the `with_*` builders
/// changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    /// Declared resource type
    pub resource_type: String,

    /// Deletion policy (`Retain`, `Delete`, `Snapshot`)
    pub deletion_policy: Option<String>,

    /// Resource properties, key order preserved
    pub properties: Option<Map<String, Value>>,

    /// Explicit creation-order dependencies; duplicates are permitted
    pub depends_on: Vec<String>,

    /// Unrecognised keys
    pub extra: Map<String, Value>,

    /// Declaration as decoded
    source: Option<Value>,
}

/// Field view used when decoding
#[derive(Deserialize)]
struct ResourceFields {
    #[serde(rename = "Type")]
    resource_type: String,
    #[serde(rename = "DeletionPolicy", default)]
    deletion_policy: Option<String>,
    #[serde(rename = "Properties", default)]
    properties: Option<Map<String, Value>>,
    #[serde(rename = "DependsOn", default, deserialize_with = "one_or_many")]
    depends_on: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = Value::deserialize(deserializer)?;
        let fields = ResourceFields::deserialize(&source).map_err(D::Error::custom)?;
        Ok(Self {
            resource_type: fields.resource_type,
            deletion_policy: fields.deletion_policy,
            properties: fields.properties,
            depends_on: fields.depends_on,
            extra: fields.extra,
            source: Some(source),
        })
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.source {
            Some(source) => source.serialize(serializer),
            None => self.encode().serialize(serializer),
        }
    }
}

impl Resource {
    /// Create a bare resource of the given type
    #[inline]
    #[must_use]
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            deletion_policy: None,
            properties: None,
            depends_on: Vec::new(),
            extra: Map::new(),
            source: None,
        }
    }

    /// Whether this resource still serializes exactly as it was decoded
    #[inline]
    #[must_use]
    pub fn is_verbatim(&self) -> bool {
        self.source.is_some()
    }

    /// Canonical encoding: `Type`, `DeletionPolicy`, `Properties`, `DependsOn`, then the rest
    fn encode(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("Type".to_string(), Value::String(self.resource_type.clone()));
        if let Some(policy) = &self.deletion_policy {
            map.insert("DeletionPolicy".to_string(), Value::String(policy.clone()));
        }
        if let Some(properties) = &self.properties {
            map.insert("Properties".to_string(), Value::Object(properties.clone()));
        }
        if !self.depends_on.is_empty() {
            map.insert(
                "DependsOn".to_string(),
                self.depends_on.iter().cloned().map(Value::String).collect(),
            );
        }
        for (key, value) in &self.extra {
            map.entry(key.clone()).or_insert_with(|| value.clone());
        }
        map
    }

    /// Set one property, creating the property map if needed
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.source = None;
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the property map with a serialized properties struct
    ///
    /// # Errors
    /// - `TemplateError::Encoding` if serialization fails
    /// - `TemplateError::PropertiesNotObject` if `properties` is not a struct/map
    pub fn with_properties<T: Serialize>(mut self, properties: &T) -> Result<Self, TemplateError> {
        match serde_json::to_value(properties)? {
            Value::Object(map) => {
                self.source = None;
                self.properties = Some(map);
                Ok(self)
            }
            _ => Err(TemplateError::PropertiesNotObject {
                resource_type: self.resource_type,
            }),
        }
    }

    /// Set the dependency list
    #[must_use]
    pub fn with_depends_on<I, S>(mut self, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = None;
        self.depends_on = depends_on.into_iter().map(Into::into).collect();
        self
    }

    /// Set the deletion policy
    #[inline]
    #[must_use]
    pub fn with_deletion_policy(mut self, policy: impl Into<String>) -> Self {
        self.source = None;
        self.deletion_policy = Some(policy.into());
        self
    }

    /// Look up a property by key
    #[inline]
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }

    /// Check the declared type
    #[inline]
    #[must_use]
    pub fn is_type(&self, resource_type: &str) -> bool {
        self.resource_type == resource_type
    }
}

/// `DependsOn` may be a single logical id or a list of them
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(id)) => vec![id],
        Some(OneOrMany::Many(ids)) => ids,
    })
}

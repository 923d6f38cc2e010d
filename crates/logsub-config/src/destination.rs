//! Subscription destination values
//!
//! A destination is decided once, at decode time, into one of three shapes.
//! Nothing downstream re-inspects raw JSON.

use crate::error::{json_kind, ConfigError};
use logsub_template::Intrinsic;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Where a subscription filter delivers matching events
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum Destination {
    /// A literal ARN string
    Literal(String),
    /// `Fn::GetAtt` on a resource in the same template
    GetAtt {
        /// Referenced logical id
        logical_id: String,
        /// Attribute name as written
        attribute: String,
    },
    /// `Ref` to a resource in the same template
    Ref(String),
}

impl Destination {
    /// Literal ARN destination
    #[inline]
    #[must_use]
    pub fn literal(arn: impl Into<String>) -> Self {
        Self::Literal(arn.into())
    }

    /// `Fn::GetAtt` destination
    #[inline]
    #[must_use]
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    /// `Ref` destination
    #[inline]
    #[must_use]
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    /// JSON form as written into resource properties
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Literal(arn) => Value::String(arn.clone()),
            Self::GetAtt {
                logical_id,
                attribute,
            } => Intrinsic::get_att(logical_id, attribute).to_value(),
            Self::Ref(id) => Intrinsic::reference(id).to_value(),
        }
    }
}

impl TryFrom<Value> for Destination {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let map = match value {
            Value::String(arn) => return Ok(Self::Literal(arn)),
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::InvalidDestination(format!(
                    "expected string or intrinsic object, got {}",
                    json_kind(&other)
                )))
            }
        };

        if let Some(args) = map.get("Fn::GetAtt") {
            return parse_get_att(args);
        }

        if let Some(target) = map.get("Ref") {
            return match target {
                Value::String(id) => Ok(Self::Ref(id.clone())),
                other => Err(ConfigError::InvalidDestination(format!(
                    "Ref target must be a string, got {}",
                    json_kind(other)
                ))),
            };
        }

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        Err(ConfigError::InvalidDestination(format!(
            "unsupported intrinsic {{{}}}; use an ARN string, Ref or Fn::GetAtt",
            keys.join(", ")
        )))
    }
}

/// `Fn::GetAtt` takes `[id, attr]` or the short `"id.attr"` form
fn parse_get_att(args: &Value) -> Result<Destination, ConfigError> {
    match args {
        Value::Array(items) => match items.as_slice() {
            [Value::String(id), Value::String(attr)] => Ok(Destination::get_att(id, attr)),
            _ => Err(ConfigError::InvalidDestination(
                "Fn::GetAtt expects [logicalId, attributeName]".to_string(),
            )),
        },
        Value::String(dotted) => dotted
            .split_once('.')
            .filter(|(id, attr)| !id.is_empty() && !attr.is_empty())
            .map(|(id, attr)| Destination::get_att(id, attr))
            .ok_or_else(|| {
                ConfigError::InvalidDestination(format!(
                    "Fn::GetAtt short form must be logicalId.attributeName, got {dotted:?}"
                ))
            }),
        other => Err(ConfigError::InvalidDestination(format!(
            "Fn::GetAtt arguments must be an array or string, got {}",
            json_kind(other)
        ))),
    }
}

impl Serialize for Destination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

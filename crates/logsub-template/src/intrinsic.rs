//! CloudFormation intrinsic function values

use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Intrinsic function emitted into resource properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intrinsic {
    /// `{"Ref": id}`
    Ref(String),
    /// `{"Fn::GetAtt": [id, attribute]}`
    GetAtt {
        /// Referenced logical id
        logical_id: String,
        /// Attribute name
        attribute: String,
    },
    /// `{"Fn::Sub": template}`
    Sub(String),
}

impl Intrinsic {
    /// `Ref` to a logical id
    #[inline]
    #[must_use]
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    /// `Fn::GetAtt` on a logical id
    #[inline]
    #[must_use]
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    /// `Fn::Sub` over a template string
    #[inline]
    #[must_use]
    pub fn sub(template: impl Into<String>) -> Self {
        Self::Sub(template.into())
    }

    /// JSON form as it appears in a template
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Ref(id) => json!({ "Ref": id }),
            Self::GetAtt {
                logical_id,
                attribute,
            } => json!({ "Fn::GetAtt": [logical_id, attribute] }),
            Self::Sub(template) => json!({ "Fn::Sub": template }),
        }
    }
}

impl From<Intrinsic> for Value {
    fn from(intrinsic: Intrinsic) -> Self {
        intrinsic.to_value()
    }
}

impl Serialize for Intrinsic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

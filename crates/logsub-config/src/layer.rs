//! Layer config: a single global object or an ordered sequence
//!
//! Each element of the sequence form synthesizes its own subgraph and
//! every logical id it emits carries the element's index as a suffix.
//! The single form uses an empty suffix.

use crate::error::ConfigError;
use crate::settings::SubscriptionSettings;
use serde::Deserialize;
use serde_json::Value;

/// `custom.logSubscription`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum ConfigLayer {
    /// One object applying to every unit, empty suffix
    Single(SubscriptionSettings),
    /// Independent layers, suffixed `0`, `1`, ...
    Sequence(Vec<SubscriptionSettings>),
}

/// One layer ready for synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct LayerEntry<'a> {
    /// Logical id suffix for everything this layer emits
    pub suffix: String,
    /// Position in the sequence form, `None` for the single form
    pub index: Option<usize>,
    /// The layer's settings
    pub settings: &'a SubscriptionSettings,
}

impl ConfigLayer {
    /// Whether the sequence form is in use
    #[inline]
    #[must_use]
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Number of layers that will be synthesized
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sequence(layers) => layers.len(),
        }
    }

    /// An empty sequence synthesizes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Layers in synthesis order, each with its suffix
    #[must_use]
    pub fn entries(&self) -> Vec<LayerEntry<'_>> {
        match self {
            Self::Single(settings) => vec![LayerEntry {
                suffix: String::new(),
                index: None,
                settings,
            }],
            Self::Sequence(layers) => layers
                .iter()
                .enumerate()
                .map(|(index, settings)| LayerEntry {
                    suffix: index.to_string(),
                    index: Some(index),
                    settings,
                })
                .collect(),
        }
    }

    /// Settings by position, `None` when out of range
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&SubscriptionSettings> {
        match self {
            Self::Single(settings) if position == 0 => Some(settings),
            Self::Single(_) => None,
            Self::Sequence(layers) => layers.get(position),
        }
    }
}

impl Default for ConfigLayer {
    fn default() -> Self {
        Self::Single(SubscriptionSettings::default())
    }
}

impl TryFrom<Value> for ConfigLayer {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Array(_) => serde_json::from_value(value)
                .map(Self::Sequence)
                .map_err(ConfigError::InvalidSettings),
            Value::Object(_) => serde_json::from_value(value)
                .map(Self::Single)
                .map_err(ConfigError::InvalidSettings),
            other => Err(ConfigError::shape("custom.logSubscription", "object or array", &other)),
        }
    }
}

//! Twin state types as seen by the hierarchy reconciler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::TwinError;

/// Annotation key recording the group path of a device or group
pub const GROUP_ANNOTATION: &str = "io.drogue/group";
/// Annotation key recording the owning device
pub const DEVICE_ANNOTATION: &str = "io.drogue/device";
/// Annotation key recording the channel id
pub const CHANNEL_ANNOTATION: &str = "io.drogue/channel";

/// Parent-linkage annotations of a twin
///
/// The three hierarchy keys are modelled as fields; every other annotation is
/// kept as-is in `other` so nothing is lost when the state is written back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    /// Group path (`a/b`, no leading separator)
    #[serde(
        rename = "io.drogue/group",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<String>,
    /// Owning device (a device records itself here)
    #[serde(
        rename = "io.drogue/device",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub device: Option<String>,
    /// Channel id
    #[serde(
        rename = "io.drogue/channel",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub channel: Option<String>,
    /// Annotations not related to the hierarchy
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

/// Twin metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Canonical twin reference
    pub name: String,
    #[serde(default)]
    pub annotations: Annotations,
}

/// A reported value with the time it was last updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportedValue {
    pub last_update: DateTime<Utc>,
    pub value: serde_json::Value,
}

impl ReportedValue {
    pub fn new(value: impl Into<serde_json::Value>, last_update: DateTime<Utc>) -> Self {
        Self {
            last_update,
            value: value.into(),
        }
    }
}

/// Reconciliation code attached to a twin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Code {
    JavaScript(String),
}

/// A named reconciliation facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub code: Code,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_log: Vec<String>,
}

impl Marker {
    pub fn javascript(code: impl Into<String>) -> Self {
        Self {
            code: Code::JavaScript(code.into()),
            last_log: Vec::new(),
        }
    }
}

/// Reconciliation markers, keyed by facet name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    #[serde(default)]
    pub changed: BTreeMap<String, Marker>,
    #[serde(default)]
    pub deleting: BTreeMap<String, Marker>,
}

impl Reconciliation {
    /// Copy of the markers filed under `facet`, keeping only that facet
    pub fn facet(&self, facet: &str) -> Self {
        let pick = |markers: &BTreeMap<String, Marker>| {
            markers
                .get_key_value(facet)
                .map(|(k, v)| (k.clone(), v.clone()))
                .into_iter()
                .collect()
        };
        Self {
            changed: pick(&self.changed),
            deleting: pick(&self.deleting),
        }
    }
}

/// Full state of one twin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwinState {
    pub metadata: Metadata,
    #[serde(default)]
    pub reported_state: BTreeMap<String, ReportedValue>,
    #[serde(default)]
    pub reconciliation: Reconciliation,
}

impl TwinState {
    /// Create an empty state for the twin with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: Metadata {
                name: name.into(),
                annotations: Annotations::default(),
            },
            ..Default::default()
        }
    }

    /// Set the group annotation
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.metadata.annotations.group = Some(group.into());
        self
    }

    /// Set the owning device and channel annotations
    pub fn with_owner(mut self, device: impl Into<String>, channel: impl Into<String>) -> Self {
        self.metadata.annotations.device = Some(device.into());
        self.metadata.annotations.channel = Some(channel.into());
        self
    }

    /// Twin reference
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn annotations(&self) -> &Annotations {
        &self.metadata.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.metadata.annotations
    }

    /// Parse a twin state from JSON
    pub fn from_json(content: &str) -> Result<Self, TwinError> {
        Ok(serde_json::from_str(content)?)
    }
}

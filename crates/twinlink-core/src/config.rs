//! Reconciler settings

use serde::{Deserialize, Serialize};

/// Settings shared by every reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Reconciliation facet copied into registration templates
    #[serde(default = "default_facet")]
    pub facet: String,
    /// Reported-state property mirroring the resolved parent
    #[serde(default = "default_parent_property")]
    pub parent_property: String,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            facet: default_facet(),
            parent_property: default_parent_property(),
        }
    }
}

fn default_facet() -> String {
    "hierarchy".to_string()
}

fn default_parent_property() -> String {
    "$parent".to_string()
}

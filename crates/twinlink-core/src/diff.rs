//! Hierarchy differ: decides what a reconciliation pass has to change
//!
//! The differ is pure. It looks at the classified reference of a twin and at
//! the parent-linkage annotations before and after the triggering edit, and
//! returns a [`HierarchyDelta`] describing the annotations to write, whether
//! the parent must be notified, and which parent reference was resolved.

use serde::Serialize;

use crate::reference::{group_reference, join_segments, normalize, parent_group, HierarchyReference};
use crate::twin::Annotations;

/// Annotation values to write into the new state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotationPatch {
    pub group: Option<String>,
    pub device: Option<String>,
    pub channel: Option<String>,
}

impl AnnotationPatch {
    pub fn is_empty(&self) -> bool {
        self.group.is_none() && self.device.is_none() && self.channel.is_none()
    }

    /// Write the patched values, leaving all other annotations alone
    pub fn apply(&self, annotations: &mut Annotations) {
        if let Some(group) = &self.group {
            annotations.group = Some(group.clone());
        }
        if let Some(device) = &self.device {
            annotations.device = Some(device.clone());
        }
        if let Some(channel) = &self.channel {
            annotations.channel = Some(channel.clone());
        }
    }
}

/// Outcome of diffing one twin against its parent linkage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyDelta {
    /// Reference of the parent twin
    pub parent: String,
    /// Register (`true`) or unregister (`false`)
    pub registering: bool,
    /// Whether a message has to be sent to `parent`
    pub notify: bool,
    /// Annotations to update on the twin itself
    pub annotations: AnnotationPatch,
}

impl HierarchyDelta {
    /// Registration always refreshes the `$parent` entry, even when no message
    /// goes out; unregistration never touches reported state.
    pub fn refreshes_parent(&self) -> bool {
        self.registering
    }
}

/// Compute the delta for a twin.
///
/// `current` are the annotations before the triggering edit, `new` the ones
/// that will be persisted. Returns `None` when the twin has no parent to
/// maintain: a device without a group, or a top-level group.
pub fn diff(
    reference: &HierarchyReference,
    registering: bool,
    current: &Annotations,
    new: &Annotations,
) -> Option<HierarchyDelta> {
    match reference {
        HierarchyReference::Device { id } => diff_device(id, registering, current, new),
        HierarchyReference::Channel { device, channel } => {
            Some(diff_channel(device, channel, registering, new))
        }
        HierarchyReference::Group { segments } => diff_group(segments, registering, new),
    }
}

fn diff_device(
    id: &str,
    registering: bool,
    current: &Annotations,
    new: &Annotations,
) -> Option<HierarchyDelta> {
    let segments = normalize(new.group.as_deref()?);
    if segments.is_empty() {
        return None;
    }
    let parent = group_reference(&segments);

    if !registering {
        return Some(unregister(parent));
    }

    Some(HierarchyDelta {
        parent,
        registering: true,
        notify: current.group.as_deref().map(normalize) != Some(segments),
        annotations: AnnotationPatch {
            device: Some(id.to_string()),
            ..Default::default()
        },
    })
}

fn diff_channel(device: &str, channel: &str, registering: bool, new: &Annotations) -> HierarchyDelta {
    let parent = device.to_string();

    if !registering {
        return unregister(parent);
    }

    let moved = new.device.as_deref() != Some(device) || new.channel.as_deref() != Some(channel);
    let annotations = if moved {
        AnnotationPatch {
            device: Some(device.to_string()),
            channel: Some(channel.to_string()),
            ..Default::default()
        }
    } else {
        AnnotationPatch::default()
    };

    HierarchyDelta {
        parent,
        registering: true,
        notify: moved,
        annotations,
    }
}

fn diff_group(segments: &[String], registering: bool, new: &Annotations) -> Option<HierarchyDelta> {
    let parent = group_reference(parent_group(segments)?);

    if !registering {
        return Some(unregister(parent));
    }

    let group = join_segments(segments);
    let moved = new.group.as_deref() != Some(group.as_str());

    Some(HierarchyDelta {
        parent,
        registering: true,
        notify: moved,
        annotations: AnnotationPatch {
            group: moved.then_some(group),
            ..Default::default()
        },
    })
}

fn unregister(parent: String) -> HierarchyDelta {
    HierarchyDelta {
        parent,
        registering: false,
        notify: true,
        annotations: AnnotationPatch::default(),
    }
}

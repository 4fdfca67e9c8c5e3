//! Classification of twin references into hierarchy roles
//!
//! A twin's name encodes where it sits in the hierarchy:
//! - `/floor1/room2` is a group path
//! - `dev1/temp` is a channel owned by device `dev1`
//! - `dev1` is a device

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between group segments and between device and channel
pub const SEPARATOR: char = '/';

/// Hierarchy role of a twin, derived from its name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HierarchyReference {
    /// A device twin
    Device { id: String },
    /// A channel owned by a device
    Channel { device: String, channel: String },
    /// A group, identified by its path segments
    Group { segments: Vec<String> },
}

impl HierarchyReference {
    /// Classify a twin name. Every string classifies into exactly one variant.
    pub fn classify(name: &str) -> Self {
        if let Some(path) = name.strip_prefix(SEPARATOR) {
            return Self::Group {
                segments: normalize(path),
            };
        }

        // Only the first two components count: "dev/a/b" is channel "a" of "dev"
        let mut parts = name.split(SEPARATOR);
        let device = parts.next().unwrap_or_default();
        match parts.next() {
            // "dev1/" still yields a channel, with an empty channel id
            Some(channel) => Self::Channel {
                device: device.to_string(),
                channel: channel.to_string(),
            },
            None => Self::Device {
                id: device.to_string(),
            },
        }
    }

    /// Short name of the role, used in log output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Device { .. } => "device",
            Self::Channel { .. } => "channel",
            Self::Group { .. } => "group",
        }
    }
}

impl fmt::Display for HierarchyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device { id } => write!(f, "{}", id),
            Self::Channel { device, channel } => write!(f, "{}/{}", device, channel),
            Self::Group { segments } => write!(f, "{}", group_reference(segments)),
        }
    }
}

/// Split a `/`-separated path into its non-empty segments, preserving order
pub fn normalize(path: &str) -> Vec<String> {
    path.split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join segments into the annotation form (`a/b`), without a leading separator
pub fn join_segments(segments: &[String]) -> String {
    segments.join("/")
}

/// Build the twin reference of a group (`/a/b`)
pub fn group_reference(segments: &[String]) -> String {
    format!("{}{}", SEPARATOR, join_segments(segments))
}

/// Parent path of a group: all but the last segment.
///
/// Returns `None` for a top-level group (and for an empty path).
pub fn parent_group(segments: &[String]) -> Option<&[String]> {
    match segments.split_last() {
        Some((_, parent)) if !parent.is_empty() => Some(parent),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(segments: &[&str]) -> HierarchyReference {
        HierarchyReference::Group {
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_classify_group() {
        assert_eq!(HierarchyReference::classify("/a/b/c"), group(&["a", "b", "c"]));
    }

    #[test]
    fn test_classify_group_drops_empty_segments() {
        assert_eq!(HierarchyReference::classify("//a///b/"), group(&["a", "b"]));
        assert_eq!(HierarchyReference::classify("/"), group(&[]));
    }

    #[test]
    fn test_classify_channel() {
        assert_eq!(
            HierarchyReference::classify("dev1/chan1"),
            HierarchyReference::Channel {
                device: "dev1".to_string(),
                channel: "chan1".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_channel_ignores_extra_components() {
        assert_eq!(
            HierarchyReference::classify("dev1/a/b"),
            HierarchyReference::Channel {
                device: "dev1".to_string(),
                channel: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_classify_device() {
        assert_eq!(
            HierarchyReference::classify("dev1"),
            HierarchyReference::Device {
                id: "dev1".to_string()
            }
        );
        assert_eq!(
            HierarchyReference::classify(""),
            HierarchyReference::Device { id: String::new() }
        );
    }

    #[test]
    fn test_classify_trailing_separator_is_channel() {
        // Pinned: an empty channel id does not fall back to a device
        assert_eq!(
            HierarchyReference::classify("dev1/"),
            HierarchyReference::Channel {
                device: "dev1".to_string(),
                channel: String::new(),
            }
        );
    }

    #[test]
    fn test_parent_group() {
        let segments = normalize("a/b/c");
        assert_eq!(parent_group(&segments), Some(&segments[..2]));
        assert_eq!(parent_group(&normalize("a")), None);
        assert_eq!(parent_group(&[]), None);
    }

    #[test]
    fn test_display_round_trip() {
        for name in ["/a/b", "dev1/temp", "dev1"] {
            assert_eq!(HierarchyReference::classify(name).to_string(), name);
        }
    }
}

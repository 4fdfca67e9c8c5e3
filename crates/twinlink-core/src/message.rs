//! Child registration messages sent to parent twins

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::twin::Reconciliation;

/// Template a parent applies to the registered child
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub reconciliation: Reconciliation,
}

/// Message delivered to a parent twin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChildMessage {
    RegisterChild {
        #[serde(rename = "$ref")]
        reference: String,
        template: Template,
    },
    UnregisterChild {
        #[serde(rename = "$ref")]
        reference: String,
    },
}

impl ChildMessage {
    /// Reference of the child this message is about
    pub fn reference(&self) -> &str {
        match self {
            Self::RegisterChild { reference, .. } | Self::UnregisterChild { reference } => {
                reference
            }
        }
    }

    pub fn is_register(&self) -> bool {
        matches!(self, Self::RegisterChild { .. })
    }
}

/// A message together with the twin it is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub target: String,
    pub message: ChildMessage,
}

/// Capability to hand a message to the host's transport.
///
/// Dispatch is fire-and-forget: the reconciler never waits on delivery.
pub trait MessageSink {
    fn send_message(&mut self, target: &str, message: ChildMessage);
}

/// Records messages in order, used by the value-returning driver and in tests
impl MessageSink for Vec<OutboundMessage> {
    fn send_message(&mut self, target: &str, message: ChildMessage) {
        self.push(OutboundMessage {
            target: target.to_string(),
            message,
        });
    }
}

/// Builds child messages and hands them to a sink
pub struct Emitter<'a, S: MessageSink + ?Sized> {
    sink: &'a mut S,
    reference: &'a str,
}

impl<'a, S: MessageSink + ?Sized> Emitter<'a, S> {
    /// Emitter for messages sent on behalf of the twin `reference`
    pub fn new(sink: &'a mut S, reference: &'a str) -> Self {
        Self { sink, reference }
    }

    /// Register with `target`, passing the markers the child wants tracked
    pub fn register(&mut self, target: &str, reconciliation: Reconciliation) {
        info!(child = %self.reference, parent = %target, "Registering child");
        self.sink.send_message(
            target,
            ChildMessage::RegisterChild {
                reference: self.reference.to_string(),
                template: Template { reconciliation },
            },
        );
    }

    /// Unregister from `target`
    pub fn unregister(&mut self, target: &str) {
        info!(child = %self.reference, parent = %target, "Unregistering child");
        self.sink.send_message(
            target,
            ChildMessage::UnregisterChild {
                reference: self.reference.to_string(),
            },
        );
    }
}

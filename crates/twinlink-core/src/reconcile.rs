//! Reconciliation driver
//!
//! Entry point invoked by the host for every twin state change or deletion.
//! A pass classifies the twin, diffs its parent linkage, writes the result
//! into the new state and hands at most one message to the sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, trace};

use crate::config::ReconcilerConfig;
use crate::diff::diff;
use crate::error::TwinError;
use crate::message::{Emitter, MessageSink, OutboundMessage};
use crate::reference::HierarchyReference;
use crate::twin::{ReportedValue, TwinState};

/// Action that triggered a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// The twin state changed
    Changed,
    /// The twin is being deleted
    Deleting,
    /// Any other action; ignored
    #[serde(other)]
    Ignored,
}

/// Input of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileContext {
    pub action: Action,
    /// State before the edit that triggered this pass
    pub current_state: TwinState,
    /// State that will be persisted after this pass
    pub new_state: TwinState,
}

impl ReconcileContext {
    pub fn new(action: Action, current_state: TwinState, new_state: TwinState) -> Self {
        Self {
            action,
            current_state,
            new_state,
        }
    }

    /// Parse a context from JSON
    pub fn from_json(content: &str) -> Result<Self, TwinError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a context from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, TwinError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Result of a pass run through [`Reconciler::run`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub new_state: TwinState,
    pub messages: Vec<OutboundMessage>,
}

/// Keeps parent/child registrations consistent across twin state changes
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Run a pass, stamping `$parent` with the current time
    pub fn reconcile(&self, ctx: &mut ReconcileContext, sink: &mut dyn MessageSink) {
        self.reconcile_at(ctx, sink, Utc::now())
    }

    /// Run a pass, stamping `$parent` with `now`
    pub fn reconcile_at(
        &self,
        ctx: &mut ReconcileContext,
        sink: &mut dyn MessageSink,
        now: DateTime<Utc>,
    ) {
        // TODO: unregister from the previous parent when a changed twin moved
        let registering = match ctx.action {
            Action::Changed => true,
            Action::Deleting => false,
            Action::Ignored => {
                trace!(reference = %ctx.new_state.name(), "Ignoring action");
                return;
            }
        };

        let reference = HierarchyReference::classify(ctx.new_state.name());
        debug!(
            reference = %ctx.new_state.name(),
            kind = reference.kind(),
            registering,
            "Reconciling hierarchy"
        );

        let Some(delta) = diff(
            &reference,
            registering,
            ctx.current_state.annotations(),
            ctx.new_state.annotations(),
        ) else {
            debug!(reference = %ctx.new_state.name(), "No parent to maintain");
            return;
        };

        let state = &mut ctx.new_state;
        delta.annotations.apply(state.annotations_mut());

        if delta.notify {
            let mut emitter = Emitter::new(sink, &state.metadata.name);
            if delta.registering {
                emitter.register(&delta.parent, state.reconciliation.facet(&self.config.facet));
            } else {
                emitter.unregister(&delta.parent);
            }
        }

        if delta.refreshes_parent() {
            state.reported_state.insert(
                self.config.parent_property.clone(),
                ReportedValue::new(delta.parent, now),
            );
        }
    }

    /// Run a pass and return the new state along with the recorded messages
    pub fn run(&self, ctx: ReconcileContext) -> Outcome {
        self.run_at(ctx, Utc::now())
    }

    pub fn run_at(&self, mut ctx: ReconcileContext, now: DateTime<Utc>) -> Outcome {
        let mut messages = Vec::new();
        self.reconcile_at(&mut ctx, &mut messages, now);
        Outcome {
            new_state: ctx.new_state,
            messages,
        }
    }
}

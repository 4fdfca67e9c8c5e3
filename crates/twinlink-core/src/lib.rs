//! Twinlink Core - Parent/child hierarchy reconciliation for digital twins
//!
//! This crate keeps the parent/child links between twins consistent:
//! - Classification of twin references into devices, channels and groups
//! - Diffing of parent-linkage annotations between two twin states
//! - Child registration messages sent to the resolved parent
//! - The reconciliation driver invoked on every change or deletion

pub mod config;
pub mod diff;
pub mod error;
pub mod message;
pub mod reconcile;
pub mod reference;
pub mod twin;

pub use config::ReconcilerConfig;
pub use diff::{diff, AnnotationPatch, HierarchyDelta};
pub use error::TwinError;
pub use message::{ChildMessage, Emitter, MessageSink, OutboundMessage, Template};
pub use reconcile::{Action, Outcome, ReconcileContext, Reconciler};
pub use reference::HierarchyReference;
pub use twin::{Annotations, Marker, Metadata, Reconciliation, ReportedValue, TwinState};

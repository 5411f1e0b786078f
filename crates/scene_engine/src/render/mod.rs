//! Render-queue classification and backend abstraction
//!
//! The traversal's output side: visible renderables are bucketed first by a
//! coarse depth-ordering group, then by material, so the backend binds each
//! material once per group. Following Game Engine Architecture Chapter 11.3
//! - Render Queues.

mod backend;
mod queue;

pub use backend::{BackendCall, MaterialId, RecordingBackend, RenderBackend, RenderableObject};
pub use queue::{GroupId, RenderGroup, RenderQueue};

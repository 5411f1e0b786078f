//! Backend abstraction for draw submission
//!
//! The queue only guarantees call order (group-ascending, material-grouped);
//! everything else about drawing is backend-defined, and submission failures
//! are the backend's to report.

use crate::foundation::math::Mat4;
use crate::scene::NodeKey;

/// Material identity used for draw batching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Cached draw data for one visible renderable.
///
/// Extracted from the scene node during traversal so the queue and backend
/// never reach back into the graph.
#[derive(Debug, Clone)]
pub struct RenderableObject {
    /// The scene node this renderable came from
    pub node: NodeKey,
    /// Material identity; `None` means the default material bucket
    pub material: Option<MaterialId>,
    /// Resolved world-space transform matrix
    pub world_matrix: Mat4,
}

/// Rendering backend the queue drains into.
///
/// [`crate::render::RenderQueue::render`] calls [`RenderBackend::bind_material`]
/// once per non-empty material bucket, then [`RenderBackend::submit`] for
/// every renderable in that bucket, in insertion order.
pub trait RenderBackend {
    /// Bind a material for the submissions that follow
    fn bind_material(&mut self, material: Option<MaterialId>);

    /// Submit one renderable for drawing
    fn submit(&mut self, renderable: &RenderableObject);
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// A material bind
    BindMaterial(Option<MaterialId>),
    /// A draw submission, identified by its node key
    Submit(NodeKey),
}

/// Backend that records the call stream instead of drawing.
///
/// Used by the test suite and debug tooling to assert draw order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Calls in the order they were made
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The node keys of all submissions, in order
    #[must_use]
    pub fn submitted_nodes(&self) -> Vec<NodeKey> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::Submit(node) => Some(*node),
                BackendCall::BindMaterial(_) => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    fn bind_material(&mut self, material: Option<MaterialId>) {
        self.calls.push(BackendCall::BindMaterial(material));
    }

    fn submit(&mut self, renderable: &RenderableObject) {
        self.calls.push(BackendCall::Submit(renderable.node));
    }
}

//! Scene management: transforms, node hierarchy, and cameras
//!
//! The scene graph is the bridge between gameplay state and the renderer.
//! Each frame it is visited top-down: world transforms resolve lazily,
//! bounds refresh from the resolved transforms, and visible renderables are
//! classified into the render queue.

mod camera;
mod graph;
mod node;
mod transform;

pub use camera::{Camera, Projection};
pub use graph::{NodeHooks, SceneError, SceneGraph};
pub use node::{CameraMask, NodeId, NodeKey, Renderable, SceneNode};
pub use transform::Transform;

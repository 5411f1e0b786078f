//! Scene node payload: identity, hierarchy links, and render state

use std::any::Any;

use bitflags::bitflags;
use slotmap::new_key_type;

use crate::bound::Bound;
use crate::foundation::math::{Quat, Vec3};
use crate::render::{GroupId, MaterialId};
use crate::scene::transform::Transform;

new_key_type! {
    /// Generational handle to a node in a [`crate::scene::SceneGraph`] arena
    pub struct NodeKey;
}

/// Stable per-node identifier, unique within one scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    id: u32,
}

impl NodeId {
    /// Create a new node ID
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the numeric ID
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }
}

bitflags! {
    /// Per-camera visibility mask.
    ///
    /// A node is considered for a camera when the two masks share a bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CameraMask: u32 {
        /// The primary scene camera
        const MAIN = 1;
    }
}

impl CameraMask {
    /// Mask with only the given layer bit (0-31) set
    #[must_use]
    pub fn layer(index: u32) -> Self {
        Self::from_bits_retain(1 << index)
    }
}

impl Default for CameraMask {
    fn default() -> Self {
        Self::MAIN
    }
}

/// Renderable payload attached to a scene node.
///
/// The group is a static property of the renderable's kind/material, not
/// recomputed per frame; depth sorting within a group is the renderer's
/// concern.
#[derive(Debug, Clone, Copy)]
pub struct Renderable {
    /// Material identity; `None` renderables land in the default bucket
    pub material: Option<MaterialId>,
    /// Render queue group this renderable is classified into
    pub group: GroupId,
}

impl Renderable {
    /// Create a renderable with a material in the given group
    #[must_use]
    pub fn new(material: MaterialId, group: GroupId) -> Self {
        Self {
            material: Some(material),
            group,
        }
    }

    /// Create a renderable with no material assigned
    #[must_use]
    pub fn without_material(group: GroupId) -> Self {
        Self {
            material: None,
            group,
        }
    }
}

/// A single node in the scene hierarchy.
///
/// Nodes are owned by the [`crate::scene::SceneGraph`] arena; the local TRS
/// fields and version counters are only mutated through the graph so the
/// staleness bookkeeping stays consistent.
pub struct SceneNode {
    id: NodeId,
    name: String,
    user_data: Option<Box<dyn Any>>,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    // Local TRS, composed against the parent's resolved transform.
    pub(crate) local_translation: Vec3,
    pub(crate) local_orientation: Quat,
    pub(crate) local_scaling: Vec3,

    // Versioned staleness state: the node is dirty exactly when the
    // (local, parent-world) pair captured at the last resolution no longer
    // matches the current counters.
    pub(crate) local_version: u64,
    pub(crate) world: Transform,
    pub(crate) world_version: u64,
    pub(crate) resolved_local: u64,
    pub(crate) resolved_parent: u64,

    // Bound refresh tracking: world_version the bound was last derived from.
    pub(crate) bound_version: u64,

    pub(crate) camera_mask: CameraMask,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,

    pub(crate) bound: Option<Bound>,
    pub(crate) renderable: Option<Renderable>,
}

impl SceneNode {
    pub(crate) fn new(id: NodeId, name: impl Into<String>, camera_mask: CameraMask) -> Self {
        Self {
            id,
            name: name.into(),
            user_data: None,
            parent: None,
            children: Vec::new(),
            local_translation: Vec3::zeros(),
            local_orientation: Quat::identity(),
            local_scaling: Vec3::new(1.0, 1.0, 1.0),
            // Starts at 1 against a resolved capture of 0: freshly created
            // nodes are dirty.
            local_version: 1,
            world: Transform::identity(),
            world_version: 0,
            resolved_local: 0,
            resolved_parent: 0,
            bound_version: 0,
            camera_mask,
            visible: true,
            enabled: true,
            bound: None,
            renderable: None,
        }
    }

    /// Unique node ID within the owning graph
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Parent key, if attached
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Child keys in attach order
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Local translation
    #[must_use]
    pub fn local_translation(&self) -> Vec3 {
        self.local_translation
    }

    /// Local orientation
    #[must_use]
    pub fn local_orientation(&self) -> Quat {
        self.local_orientation
    }

    /// Local scaling
    #[must_use]
    pub fn local_scaling(&self) -> Vec3 {
        self.local_scaling
    }

    /// Most recently resolved world transform.
    ///
    /// Stale until the graph's next `resolve_transform`/`visit` pass.
    #[must_use]
    pub fn world_transform(&self) -> &Transform {
        &self.world
    }

    /// Camera visibility mask
    #[must_use]
    pub fn camera_mask(&self) -> CameraMask {
        self.camera_mask
    }

    /// Set the camera visibility mask
    pub fn set_camera_mask(&mut self, mask: CameraMask) {
        self.camera_mask = mask;
    }

    /// Whether the node passes visibility tests
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the node participates in traversal at all
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Attached bound, if any
    #[must_use]
    pub fn bound(&self) -> Option<&Bound> {
        self.bound.as_ref()
    }

    /// Renderable payload, if any
    #[must_use]
    pub fn renderable(&self) -> Option<&Renderable> {
        self.renderable.as_ref()
    }

    /// Attach or replace the renderable payload
    pub fn set_renderable(&mut self, renderable: Option<Renderable>) {
        self.renderable = renderable;
    }

    /// Opaque user data
    #[must_use]
    pub fn user_data(&self) -> Option<&(dyn Any)> {
        self.user_data.as_deref()
    }

    /// Attach opaque user data
    pub fn set_user_data(&mut self, data: Option<Box<dyn Any>>) {
        self.user_data = data;
    }
}

//! Scene graph arena: hierarchy maintenance, lazy transform resolution, and
//! frame traversal
//!
//! Nodes live in a slotmap arena and reference each other through
//! generational keys, so a detached or destroyed node can never dangle.
//! World transforms resolve lazily through a versioned cache: each node
//! carries a `local_version` that structural or TRS changes bump, and the
//! `(local_version, parent world_version)` pair captured at its last
//! resolution. A node recomputes exactly when that pair is stale, which
//! makes the cost of a resolve proportional to the dirty prefix above it —
//! ancestors recompute first during the top-down visit, and an ancestor's
//! new `world_version` transitively invalidates every descendant.
//!
//! Following Game Engine Architecture Chapter 11.2.7 - Scene Graphs.

use log::error;
use thiserror::Error;

use crate::bound::Bound;
use crate::config::SceneConfig;
use crate::foundation::collections::HandleMap;
use crate::foundation::math::{Quat, Vec3};
use crate::render::{RenderQueue, RenderableObject};
use crate::scene::camera::Camera;
use crate::scene::node::{CameraMask, NodeId, NodeKey, Renderable, SceneNode};
use crate::scene::transform::Transform;

/// Recoverable scene graph misuse.
///
/// Corrupted-tree conditions (attaching an already-parented node, creating a
/// cycle) are asserted instead: they indicate a tree that cannot safely be
/// continued from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The key's node was destroyed, or belongs to another graph
    #[error("node key {0:?} is not alive in this graph")]
    NodeExpired(NodeKey),

    /// The node is not a child of the given parent
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// The supposed parent
        parent: NodeKey,
        /// The node that was not found in its child list
        child: NodeKey,
    },

    /// The node has no parent to detach from
    #[error("node {0:?} has no parent")]
    NoParent(NodeKey),
}

/// Observer for structural tree changes.
///
/// Each hook fires exactly once per attach/detach event, after the
/// structural change it describes. Owning subsystems use these to track
/// membership (e.g. register nodes with a spatial index).
pub trait NodeHooks {
    /// `child` was attached to `parent`
    fn on_attach_parent(&mut self, child: NodeKey, parent: NodeKey) {
        let _ = (child, parent);
    }

    /// `child` was detached from `parent`
    fn on_detach_parent(&mut self, child: NodeKey, parent: NodeKey) {
        let _ = (child, parent);
    }
}

/// Arena-backed scene node hierarchy.
///
/// Exclusively owned and mutated by the thread driving the frame; the
/// traversal never runs concurrently with structural changes.
pub struct SceneGraph {
    nodes: HandleMap<NodeKey, SceneNode>,
    roots: Vec<NodeKey>,
    next_id: u32,
    version_counter: u64,
    hooks: Option<Box<dyn NodeHooks>>,
    culling_enabled: bool,
    default_camera_mask: CameraMask,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty scene graph with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&SceneConfig::default())
    }

    /// Create an empty scene graph sized and configured per `config`
    #[must_use]
    pub fn with_config(config: &SceneConfig) -> Self {
        Self {
            nodes: HandleMap::with_capacity_and_key(config.node_capacity),
            roots: Vec::new(),
            next_id: 0,
            version_counter: 0,
            hooks: None,
            culling_enabled: config.culling_enabled,
            default_camera_mask: CameraMask::from_bits_retain(config.default_camera_mask),
        }
    }

    /// Install (or remove) the structural-change observer
    pub fn set_hooks(&mut self, hooks: Option<Box<dyn NodeHooks>>) {
        self.hooks = hooks;
    }

    /// Whether visit() runs frustum tests; disabled queues everything
    pub fn set_culling_enabled(&mut self, enabled: bool) {
        self.culling_enabled = enabled;
    }

    /// Create a detached node.
    ///
    /// The node starts dirty, visible, enabled, and carrying the graph's
    /// default camera mask.
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeKey {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        let key = self
            .nodes
            .insert(SceneNode::new(id, name, self.default_camera_mask));
        self.roots.push(key);
        key
    }

    /// Number of live nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph holds no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys of all unattached nodes, in creation/detach order
    #[must_use]
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Borrow a node
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node for payload changes (name, mask, renderable,
    /// user data). Transform fields go through the graph's setters so the
    /// staleness bookkeeping stays consistent.
    #[must_use]
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Find the first node with the given name
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(key, _)| key)
    }

    /// Find the node with the given ID
    #[must_use]
    pub fn find_by_id(&self, id: NodeId) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.id() == id)
            .map(|(key, _)| key)
    }

    /// Attach `child` under `parent`, at the end of its child list.
    ///
    /// Fires the attach hook and marks the new subtree dirty.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if either key is dead.
    ///
    /// # Panics
    ///
    /// If `child` already has a parent, or the attach would create a cycle —
    /// both contract violations that leave no consistent tree to continue
    /// from.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        self.check_alive(parent)?;
        self.check_alive(child)?;

        assert!(
            self.nodes[child].parent.is_none(),
            "node is already attached to a parent"
        );

        let mut cursor = Some(parent);
        while let Some(key) = cursor {
            assert!(key != child, "attach would create a cycle");
            cursor = self.nodes[key].parent;
        }

        self.nodes[parent].children.push(child);
        self.nodes[child].parent = Some(parent);
        self.roots.retain(|&key| key != child);
        self.bump_local(child);

        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_attach_parent(child, parent);
        }
        Ok(())
    }

    /// Detach `child` from `parent`, keeping its subtree alive as a root.
    ///
    /// Fires the detach hook and marks the detached subtree dirty.
    ///
    /// # Errors
    ///
    /// [`SceneError::NotAChild`] if `child` is not in `parent`'s child list.
    pub fn remove_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        self.check_alive(parent)?;
        self.check_alive(child)?;

        let Some(position) = self.nodes[parent]
            .children
            .iter()
            .position(|&key| key == child)
        else {
            error!("remove_child: {child:?} is not a child of {parent:?}");
            return Err(SceneError::NotAChild { parent, child });
        };

        self.nodes[parent].children.remove(position);

        if let Some(hooks) = self.hooks.as_mut() {
            hooks.on_detach_parent(child, parent);
        }

        self.nodes[child].parent = None;
        self.roots.push(child);
        self.bump_local(child);
        Ok(())
    }

    /// Detach a node from its parent, keeping its subtree alive.
    ///
    /// # Errors
    ///
    /// [`SceneError::NoParent`] if the node is already a root.
    pub fn remove_from_parent(&mut self, child: NodeKey) -> Result<(), SceneError> {
        self.check_alive(child)?;
        let parent = self.nodes[child]
            .parent
            .ok_or(SceneError::NoParent(child))?;
        self.remove_child(parent, child)
    }

    /// Detach all of `parent`'s children. With `keep_subtrees` the detached
    /// children live on as roots; otherwise their subtrees are destroyed.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if `parent` is dead.
    pub fn remove_all_children(
        &mut self,
        parent: NodeKey,
        keep_subtrees: bool,
    ) -> Result<(), SceneError> {
        self.check_alive(parent)?;

        while let Some(&child) = self.nodes[parent].children.first() {
            self.remove_child(parent, child)?;
            if !keep_subtrees {
                self.destroy_node(child, false)?;
            }
        }
        Ok(())
    }

    /// Remove a node from the graph. With `keep_children` its children are
    /// detached and live on as roots; otherwise the whole subtree is
    /// destroyed. Detach hooks fire for every severed edge.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn destroy_node(&mut self, key: NodeKey, keep_children: bool) -> Result<(), SceneError> {
        self.check_alive(key)?;

        if self.nodes[key].parent.is_some() {
            self.remove_from_parent(key)?;
        }
        self.remove_all_children(key, keep_children)?;

        self.roots.retain(|&root| root != key);
        self.nodes.remove(key);
        Ok(())
    }

    /// Deep-copy a node and its descendants into a new detached subtree.
    ///
    /// Clones names, TRS, masks, flags, bounds, and renderables; fresh IDs
    /// are assigned and user data is not cloned.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn clone_subtree(&mut self, key: NodeKey) -> Result<NodeKey, SceneError> {
        self.check_alive(key)?;

        let clone = self.create_node(self.nodes[key].name().to_owned());
        {
            let source = &self.nodes[key];
            let camera_mask = source.camera_mask;
            let visible = source.visible;
            let enabled = source.enabled;
            let translation = source.local_translation;
            let orientation = source.local_orientation;
            let scaling = source.local_scaling;
            let bound = source.bound.clone();
            let renderable = source.renderable;

            let node = &mut self.nodes[clone];
            node.camera_mask = camera_mask;
            node.visible = visible;
            node.enabled = enabled;
            node.local_translation = translation;
            node.local_orientation = orientation;
            node.local_scaling = scaling;
            node.bound = bound;
            node.renderable = renderable;
        }

        let children = self.nodes[key].children.clone();
        for child in children {
            let child_clone = self.clone_subtree(child)?;
            self.add_child(clone, child_clone)?;
        }
        Ok(clone)
    }

    /// Set a node's local translation and mark its subtree dirty
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn set_translation(&mut self, key: NodeKey, translation: Vec3) -> Result<(), SceneError> {
        self.check_alive(key)?;
        self.nodes[key].local_translation = translation;
        self.bump_local(key);
        Ok(())
    }

    /// Set a node's local orientation and mark its subtree dirty
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn set_orientation(&mut self, key: NodeKey, orientation: Quat) -> Result<(), SceneError> {
        self.check_alive(key)?;
        self.nodes[key].local_orientation = orientation;
        self.bump_local(key);
        Ok(())
    }

    /// Set a node's local scaling and mark its subtree dirty
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn set_scaling(&mut self, key: NodeKey, scaling: Vec3) -> Result<(), SceneError> {
        self.check_alive(key)?;
        self.nodes[key].local_scaling = scaling;
        self.bump_local(key);
        Ok(())
    }

    /// Attach or replace a node's bound. The bound refreshes from the
    /// node's world transform on the next visit.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn set_bound(&mut self, key: NodeKey, bound: Option<Bound>) -> Result<(), SceneError> {
        self.check_alive(key)?;
        let node = &mut self.nodes[key];
        node.bound = bound;
        node.bound_version = 0;
        Ok(())
    }

    /// Attach or replace a node's renderable payload
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn set_renderable(
        &mut self,
        key: NodeKey,
        renderable: Option<Renderable>,
    ) -> Result<(), SceneError> {
        self.check_alive(key)?;
        self.nodes[key].renderable = renderable;
        Ok(())
    }

    /// Set visibility on a node and all of its descendants
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn set_visible(&mut self, key: NodeKey, visible: bool) -> Result<(), SceneError> {
        self.check_alive(key)?;
        self.for_subtree(key, |node| node.visible = visible);
        Ok(())
    }

    /// Enable or disable a node and all of its descendants. Disabled nodes
    /// are skipped entirely by visit().
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn set_enabled(&mut self, key: NodeKey, enabled: bool) -> Result<(), SceneError> {
        self.check_alive(key)?;
        self.for_subtree(key, |node| node.enabled = enabled);
        Ok(())
    }

    /// Force a node dirty; with `recursive`, force every descendant too.
    ///
    /// Plain local changes already invalidate descendants transitively, so
    /// this is only needed to force recomputation after out-of-band changes.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn mark_dirty(&mut self, key: NodeKey, recursive: bool) -> Result<(), SceneError> {
        self.check_alive(key)?;
        if recursive {
            self.for_subtree(key, |node| node.local_version += 1);
        } else {
            self.bump_local(key);
        }
        Ok(())
    }

    /// Whether the node's cached world transform is stale.
    ///
    /// This is a local view: it compares against the parent's *current*
    /// world version, so a node can still recompute later once a stale
    /// ancestor resolves.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn is_dirty(&self, key: NodeKey) -> Result<bool, SceneError> {
        let node = self.nodes.get(key).ok_or(SceneError::NodeExpired(key))?;
        let parent_version = node
            .parent
            .map_or(0, |parent| self.nodes[parent].world_version);
        Ok(node.resolved_local != node.local_version || node.resolved_parent != parent_version)
    }

    /// Resolve and return a node's world transform.
    ///
    /// Ancestors resolve first; each node on the chain recomputes only if
    /// its captured version pair is stale, so repeated calls without
    /// intervening mutation return the identical cached transform.
    ///
    /// # Errors
    ///
    /// [`SceneError::NodeExpired`] if the key is dead.
    pub fn resolve_transform(&mut self, key: NodeKey) -> Result<&Transform, SceneError> {
        self.check_alive(key)?;
        self.resolve_internal(key);
        Ok(&self.nodes[key].world)
    }

    /// Visit the whole scene for one frame.
    ///
    /// Top-down over every root: resolves transforms, refreshes bounds,
    /// gates on enabled/visible/camera-mask, frustum-culls against the
    /// camera's bound, and inserts survivors into `queue` in traversal
    /// order. The caller clears the queue between frames.
    pub fn visit(&mut self, camera: &Camera, queue: &mut RenderQueue) {
        let mut index = 0;
        while index < self.roots.len() {
            let root = self.roots[index];
            self.visit_node(root, camera, queue);
            index += 1;
        }
    }

    fn visit_node(&mut self, key: NodeKey, camera: &Camera, queue: &mut RenderQueue) {
        if !self.nodes[key].enabled {
            return;
        }

        self.resolve_internal(key);

        // Refresh the bound only when the transform actually changed.
        let node = &mut self.nodes[key];
        if node.bound_version != node.world_version {
            if let Some(bound) = node.bound.as_mut() {
                bound.update_bound(&node.world);
            }
            node.bound_version = node.world_version;
        }

        let node = &self.nodes[key];
        if node.visible && camera.mask().intersects(node.camera_mask) {
            if let Some(renderable) = node.renderable {
                self.frustum_culling(key, renderable, camera, queue);
            }
        }

        let mut index = 0;
        while let Some(&child) = self.nodes[key].children.get(index) {
            self.visit_node(child, camera, queue);
            index += 1;
        }
    }

    /// Test one renderable node against the camera bound and insert it on
    /// success. A missing or disabled bound skips the test and inserts
    /// conservatively rather than dropping the node.
    fn frustum_culling(
        &self,
        key: NodeKey,
        renderable: Renderable,
        camera: &Camera,
        queue: &mut RenderQueue,
    ) {
        let node = &self.nodes[key];

        let inside = match node.bound.as_ref() {
            Some(bound) if self.culling_enabled && bound.is_enabled() => bound.test(camera.bound()),
            _ => true,
        };

        if inside {
            queue.add_renderable(
                renderable.group,
                RenderableObject {
                    node: key,
                    material: renderable.material,
                    world_matrix: *node.world.affine_matrix(),
                },
            );
        }
    }

    fn resolve_internal(&mut self, key: NodeKey) -> u64 {
        let parent = self.nodes[key].parent;
        let parent_version = parent.map_or(0, |parent| self.resolve_internal(parent));

        let node = &self.nodes[key];
        if node.resolved_local == node.local_version && node.resolved_parent == parent_version {
            return node.world_version;
        }

        let parent_world = parent.map(|parent| self.nodes[parent].world.clone());
        self.version_counter += 1;
        let version = self.version_counter;

        let node = &mut self.nodes[key];
        let (translation, orientation, scaling) = (
            node.local_translation,
            node.local_orientation,
            node.local_scaling,
        );
        match parent_world {
            Some(parent_world) => {
                node.world
                    .apply_transform(&parent_world, translation, orientation, scaling);
            }
            None => {
                node.world.set_translation(translation);
                node.world.set_orientation(orientation);
                node.world.set_scaling(scaling);
                node.world.update();
            }
        }
        node.world_version = version;
        node.resolved_local = node.local_version;
        node.resolved_parent = parent_version;
        version
    }

    fn bump_local(&mut self, key: NodeKey) {
        self.nodes[key].local_version += 1;
    }

    fn for_subtree(&mut self, key: NodeKey, mut apply: impl FnMut(&mut SceneNode)) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            apply(&mut self.nodes[current]);
            stack.extend_from_slice(&self.nodes[current].children);
        }
    }

    fn check_alive(&self, key: NodeKey) -> Result<(), SceneError> {
        if self.nodes.contains_key(key) {
            Ok(())
        } else {
            Err(SceneError::NodeExpired(key))
        }
    }
}

//! Two-level render queue: depth group, then material

use std::collections::BTreeMap;

use super::backend::{MaterialId, RenderBackend, RenderableObject};

/// Coarse depth-ordering bucket for draw submission.
///
/// Groups are drained in ascending numeric order, so everything in
/// `Background` draws before anything in `Overlay`. The gaps leave room for
/// engine extensions without renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum GroupId {
    /// Backdrop geometry drawn before everything else
    Background = 10,
    /// Sky box / sky dome
    SkyBox = 20,
    /// Editor and debug indicators
    Indicator = 30,
    /// Opaque scene geometry
    Solid = 60,
    /// Wireframe overlays
    Wireframe = 65,
    /// Alpha-blended geometry
    Transparent = 70,
    /// Screen-space overlays drawn last
    Overlay = 100,
}

/// Renderables sharing one group, bucketed by material.
///
/// Buckets keep their first-insertion order, which makes the drain order
/// deterministic; a `None` material is an ordinary bucket so renderables
/// without an assigned material still draw.
#[derive(Debug, Default)]
pub struct RenderGroup {
    buckets: Vec<(Option<MaterialId>, Vec<RenderableObject>)>,
}

impl RenderGroup {
    /// Append a renderable to its material bucket, creating the bucket on
    /// first use
    pub fn add_renderable(&mut self, material: Option<MaterialId>, renderable: RenderableObject) {
        if let Some((_, renderables)) = self
            .buckets
            .iter_mut()
            .find(|(bucket_material, _)| *bucket_material == material)
        {
            renderables.push(renderable);
        } else {
            self.buckets.push((material, vec![renderable]));
        }
    }

    /// Empty every bucket, keeping the bucket containers (and their
    /// capacity) for the next frame
    pub fn clear(&mut self) {
        for (_, renderables) in &mut self.buckets {
            renderables.clear();
        }
    }

    /// Total renderables across all buckets
    #[must_use]
    pub fn renderable_count(&self) -> usize {
        self.buckets.iter().map(|(_, renderables)| renderables.len()).sum()
    }

    /// Iterate non-empty material buckets in insertion order
    pub fn buckets(&self) -> impl Iterator<Item = (Option<MaterialId>, &[RenderableObject])> {
        self.buckets
            .iter()
            .filter(|(_, renderables)| !renderables.is_empty())
            .map(|(material, renderables)| (*material, renderables.as_slice()))
    }

    fn render(&self, renderer: &mut dyn RenderBackend) {
        for (material, renderables) in self.buckets() {
            renderer.bind_material(material);
            for renderable in renderables {
                renderer.submit(renderable);
            }
        }
    }
}

/// Frame-scoped queue of visible renderables, keyed by group
#[derive(Debug, Default)]
pub struct RenderQueue {
    groups: BTreeMap<GroupId, RenderGroup>,
}

impl RenderQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a renderable into its group, creating the group on first use
    pub fn add_renderable(&mut self, group: GroupId, renderable: RenderableObject) {
        self.groups
            .entry(group)
            .or_default()
            .add_renderable(renderable.material, renderable);
    }

    /// Empty all groups' buckets without destroying the group or bucket
    /// containers; called at the start of each frame
    pub fn clear(&mut self) {
        for group in self.groups.values_mut() {
            group.clear();
        }
    }

    /// Total renderables queued this frame
    #[must_use]
    pub fn renderable_count(&self) -> usize {
        self.groups.values().map(RenderGroup::renderable_count).sum()
    }

    /// True when no renderables are queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderable_count() == 0
    }

    /// Access a group's bucket contents
    #[must_use]
    pub fn group(&self, group: GroupId) -> Option<&RenderGroup> {
        self.groups.get(&group)
    }

    /// Drain the queue into a backend: groups in ascending order, materials
    /// in stable insertion order, one bind per bucket
    pub fn render(&self, renderer: &mut dyn RenderBackend) {
        for group in self.groups.values() {
            group.render(renderer);
        }
    }
}

//! # Scene Engine
//!
//! Scene-graph core for a 3D engine: hierarchical transform propagation,
//! polymorphic bounding volumes, and render-queue classification.
//!
//! ## Features
//!
//! - **Scene Graph**: Arena-backed node hierarchy with lazy, versioned
//!   world-transform resolution
//! - **Bounding Volumes**: Sphere, AABB, OBB, and frustum bounds with a
//!   symmetric pairwise intersection matrix
//! - **Render Queue**: Two-level (depth group × material) draw bucketing
//!   that minimizes backend state changes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! let mut graph = SceneGraph::new();
//! let root = graph.create_node("root");
//! let child = graph.create_node("crate");
//! graph.add_child(root, child).unwrap();
//! graph.set_translation(child, Vec3::new(0.0, 1.0, 0.0)).unwrap();
//! graph.set_bound(child, Some(Bound::sphere(Vec3::zeros(), 1.0))).unwrap();
//!
//! let camera = Camera::new(
//!     Projection::Perspective { fov_y: 0.8, aspect: 16.0 / 9.0, near: 0.1, far: 100.0 },
//!     CameraMask::MAIN,
//! );
//!
//! let mut queue = RenderQueue::new();
//! graph.visit(&camera, &mut queue);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod bound;
pub mod config;
pub mod foundation;
pub mod geometry;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        bound::{Bound, BoundVolume},
        config::{ConfigError, SceneConfig},
        foundation::math::{Mat4, Quat, Vec3},
        geometry::{Aabb, Frustum, Obb, Plane, Sphere},
        render::{GroupId, MaterialId, RenderBackend, RenderQueue, RenderableObject},
        scene::{
            Camera, CameraMask, NodeHooks, NodeId, NodeKey, Projection, Renderable, SceneError,
            SceneGraph, Transform,
        },
    };
}

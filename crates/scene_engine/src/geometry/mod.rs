//! Geometric primitives and intersection predicates
//!
//! The math/primitive layer the bounding system is built on: the four volume
//! shapes (sphere, AABB, OBB, frustum) plus one symmetric intersection
//! predicate per unordered pair of shapes.

pub mod intersect;
mod volumes;

pub use volumes::{Aabb, Frustum, Obb, Plane, Sphere};

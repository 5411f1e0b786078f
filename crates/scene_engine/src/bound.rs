//! Polymorphic bounding volumes for culling and collision
//!
//! A [`Bound`] keeps two copies of its volume: the *original* shape as
//! authored (immutable under transforms) and the *live* world-space shape
//! derived from it each time the owning node's transform resolves. Pairwise
//! tests dispatch over the live volumes through one symmetric predicate per
//! pair of kinds, so `a.test(b)` and `b.test(a)` always agree.

use crate::foundation::math::{Point3, Vec3};
use crate::geometry::{intersect, Aabb, Frustum, Obb, Sphere};
use crate::scene::Transform;

/// Tagged union over the four volume kinds
#[derive(Debug, Clone)]
pub enum BoundVolume {
    /// Bounding sphere
    Sphere(Sphere),
    /// Axis-aligned bounding box
    Aabb(Aabb),
    /// Oriented bounding box
    Obb(Obb),
    /// View frustum
    Frustum(Frustum),
}

/// A bounding volume attached to a scene node or camera
#[derive(Debug, Clone)]
pub struct Bound {
    original: BoundVolume,
    live: BoundVolume,
    group_id: u32,
    is_collision_source: bool,
    is_enabled: bool,
}

impl Bound {
    fn from_volume(volume: BoundVolume) -> Self {
        Self {
            live: volume.clone(),
            original: volume,
            group_id: 0,
            is_collision_source: false,
            is_enabled: true,
        }
    }

    /// Create a sphere bound from its authoring-space center and radius
    #[must_use]
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::from_volume(BoundVolume::Sphere(Sphere::new(center, radius)))
    }

    /// Create an AABB bound from its authoring-space corners
    #[must_use]
    pub fn aabb(min: Vec3, max: Vec3) -> Self {
        Self::from_volume(BoundVolume::Aabb(Aabb::new(min, max)))
    }

    /// Create an OBB bound from an authoring-space oriented box
    #[must_use]
    pub fn obb(obb: Obb) -> Self {
        Self::from_volume(BoundVolume::Obb(obb))
    }

    /// Create a frustum bound (for cameras)
    #[must_use]
    pub fn frustum(frustum: Frustum) -> Self {
        Self::from_volume(BoundVolume::Frustum(frustum))
    }

    /// The authoring-space volume
    #[must_use]
    pub fn original(&self) -> &BoundVolume {
        &self.original
    }

    /// The world-space volume as of the last update
    #[must_use]
    pub fn live(&self) -> &BoundVolume {
        &self.live
    }

    /// Collision group; same-group bounds never collide with each other
    #[must_use]
    pub fn group_id(&self) -> u32 {
        self.group_id
    }

    /// Set the collision group
    pub fn set_group_id(&mut self, group_id: u32) {
        self.group_id = group_id;
    }

    /// Whether this bound initiates collision queries
    #[must_use]
    pub fn is_collision_source(&self) -> bool {
        self.is_collision_source
    }

    /// Mark this bound as a collision source (it initiates queries) or a
    /// passive target
    pub fn set_collision_source(&mut self, is_source: bool) {
        self.is_collision_source = is_source;
    }

    /// Whether the bound participates in tests at all
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Enable or disable the bound
    pub fn set_enabled(&mut self, enabled: bool) {
        self.is_enabled = enabled;
    }

    /// Derive the live volume from the original and a resolved world
    /// transform.
    ///
    /// The original volume is never modified. Frustum bounds are not driven
    /// by spatial transforms; they are rebuilt from the camera through
    /// [`Bound::set_frustum`], so this is a no-op for them.
    pub fn update_bound(&mut self, world: &Transform) {
        let matrix = world.affine_matrix();

        match (&self.original, &mut self.live) {
            (BoundVolume::Sphere(original), BoundVolume::Sphere(live)) => {
                live.center = matrix.transform_point(&Point3::from(original.center)).coords;

                // Conservative under non-uniform scale: the largest axis
                // scale inflates the radius rather than squashing the
                // sphere.
                let scaling = world.scaling();
                let factor = scaling.x.max(scaling.y).max(scaling.z);
                live.radius = factor * original.radius;
            }
            (BoundVolume::Aabb(original), BoundVolume::Aabb(live)) => {
                *live = original.transformed_by(matrix);
            }
            (BoundVolume::Obb(original), BoundVolume::Obb(live)) => {
                live.center = matrix.transform_point(&Point3::from(original.center)).coords;

                // Transform the extent-scaled axes, then split each back
                // into a unit axis and a length.
                for i in 0..3 {
                    let scaled = matrix.transform_vector(&(original.axes[i] * original.extents[i]));
                    let length = scaled.magnitude();
                    if length > f32::EPSILON {
                        live.axes[i] = scaled / length;
                        live.extents[i] = length;
                    } else {
                        live.axes[i] = original.axes[i];
                        live.extents[i] = 0.0;
                    }
                }
            }
            (BoundVolume::Frustum(_), BoundVolume::Frustum(_)) => {}
            // The live volume always mirrors the original's kind.
            _ => unreachable!("bound volume kind changed between original and live"),
        }
    }

    /// Replace the frustum volume (camera-driven bounds only).
    ///
    /// Ignored with a warning for non-frustum bounds.
    pub fn set_frustum(&mut self, frustum: Frustum) {
        if let (BoundVolume::Frustum(original), BoundVolume::Frustum(live)) =
            (&mut self.original, &mut self.live)
        {
            *original = frustum.clone();
            *live = frustum;
        } else {
            log::warn!("set_frustum called on a non-frustum bound; ignored");
        }
    }

    /// Intersection test between the live volumes.
    ///
    /// Dispatches over the 16 ordered kind pairs to the 10 symmetric
    /// predicates in [`crate::geometry::intersect`]; touching volumes count
    /// as intersecting.
    #[must_use]
    pub fn test(&self, other: &Bound) -> bool {
        use BoundVolume::{Aabb, Frustum, Obb, Sphere};

        match (&self.live, &other.live) {
            (Sphere(a), Sphere(b)) => intersect::sphere_sphere(a, b),
            (Sphere(a), Aabb(b)) => intersect::sphere_aabb(a, b),
            (Sphere(a), Obb(b)) => intersect::sphere_obb(a, b),
            (Sphere(a), Frustum(b)) => intersect::sphere_frustum(a, b),
            (Aabb(a), Sphere(b)) => intersect::sphere_aabb(b, a),
            (Aabb(a), Aabb(b)) => intersect::aabb_aabb(a, b),
            (Aabb(a), Obb(b)) => intersect::aabb_obb(a, b),
            (Aabb(a), Frustum(b)) => intersect::aabb_frustum(a, b),
            (Obb(a), Sphere(b)) => intersect::sphere_obb(b, a),
            (Obb(a), Aabb(b)) => intersect::aabb_obb(b, a),
            (Obb(a), Obb(b)) => intersect::obb_obb(a, b),
            (Obb(a), Frustum(b)) => intersect::obb_frustum(a, b),
            (Frustum(a), Sphere(b)) => intersect::sphere_frustum(b, a),
            (Frustum(a), Aabb(b)) => intersect::aabb_frustum(b, a),
            (Frustum(a), Obb(b)) => intersect::obb_frustum(b, a),
            (Frustum(a), Frustum(b)) => intersect::frustum_frustum(a, b),
        }
    }

    /// Collision query with group filtering.
    ///
    /// Only enabled source bounds initiate collisions, and bounds sharing a
    /// collision group never collide with each other.
    #[must_use]
    pub fn collides_with(&self, other: &Bound) -> bool {
        self.is_enabled
            && other.is_enabled
            && self.is_collision_source
            && self.group_id != other.group_id
            && self.test(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext, Quat};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn resolved(translation: Vec3, orientation: Quat, scaling: Vec3) -> Transform {
        Transform::new(translation, orientation, scaling)
    }

    #[test]
    fn test_sphere_update_translates_center() {
        let mut bound = Bound::sphere(Vec3::new(1.0, 0.0, 0.0), 2.0);
        let world = resolved(Vec3::new(0.0, 5.0, 0.0), Quat::identity(), Vec3::new(1.0, 1.0, 1.0));

        bound.update_bound(&world);

        let BoundVolume::Sphere(live) = bound.live() else {
            panic!("expected sphere");
        };
        assert_relative_eq!(live.center, Vec3::new(1.0, 5.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(live.radius, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_radius_uses_max_scale() {
        let mut bound = Bound::sphere(Vec3::zeros(), 1.0);
        let world = resolved(Vec3::zeros(), Quat::identity(), Vec3::new(1.0, 3.0, 2.0));

        bound.update_bound(&world);

        let BoundVolume::Sphere(live) = bound.live() else {
            panic!("expected sphere");
        };
        assert_relative_eq!(live.radius, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_original_is_untouched() {
        let mut bound = Bound::sphere(Vec3::zeros(), 1.0);
        let world = resolved(Vec3::new(4.0, 0.0, 0.0), Quat::identity(), Vec3::new(2.0, 2.0, 2.0));

        bound.update_bound(&world);
        bound.update_bound(&world);

        let BoundVolume::Sphere(original) = bound.original() else {
            panic!("expected sphere");
        };
        let BoundVolume::Sphere(live) = bound.live() else {
            panic!("expected sphere");
        };
        assert_relative_eq!(original.center, Vec3::zeros(), epsilon = 1e-6);
        assert_relative_eq!(original.radius, 1.0, epsilon = 1e-6);
        // Two updates from the same transform agree: live is a pure
        // function of (original, transform).
        assert_relative_eq!(live.center, Vec3::new(4.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(live.radius, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_aabb_update_under_rotation() {
        let mut bound = Bound::aabb(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let world = resolved(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4),
            Vec3::new(1.0, 1.0, 1.0),
        );

        bound.update_bound(&world);

        let BoundVolume::Aabb(live) = bound.live() else {
            panic!("expected aabb");
        };
        assert_relative_eq!(live.max.x, 2.0_f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_obb_update_captures_nonuniform_scale() {
        let obb = Obb::new(
            Vec3::zeros(),
            [Vec3::x(), Vec3::y(), Vec3::z()],
            Vec3::new(1.0, 1.0, 1.0),
        );
        let mut bound = Bound::obb(obb);
        let world = resolved(
            Vec3::new(0.0, 0.0, 3.0),
            Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
            Vec3::new(2.0, 1.0, 1.0),
        );

        bound.update_bound(&world);

        let BoundVolume::Obb(live) = bound.live() else {
            panic!("expected obb");
        };
        assert_relative_eq!(live.center, Vec3::new(0.0, 0.0, 3.0), epsilon = 1e-5);
        // Local X is scaled by 2 then rotated onto -Z.
        assert_relative_eq!(live.extents.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(live.axes[0], Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_obb_zero_extent_is_degenerate_not_nan() {
        let obb = Obb::new(
            Vec3::zeros(),
            [Vec3::x(), Vec3::y(), Vec3::z()],
            Vec3::new(0.0, 1.0, 1.0),
        );
        let mut bound = Bound::obb(obb);
        bound.update_bound(&Transform::identity());

        let BoundVolume::Obb(live) = bound.live() else {
            panic!("expected obb");
        };
        assert_relative_eq!(live.extents.x, 0.0, epsilon = 1e-6);
        assert!(live.axes[0].magnitude() > 0.9);
    }

    #[test]
    fn test_symmetry_across_all_kind_pairs() {
        let proj = Mat4::orthographic(-4.0, 4.0, -4.0, 4.0, 0.0, 8.0);
        let bounds = [
            Bound::sphere(Vec3::new(0.5, 0.0, 1.0), 1.5),
            Bound::aabb(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 2.0)),
            Bound::obb(Obb::new(
                Vec3::new(0.0, 0.5, 1.0),
                [Vec3::new(1.0, 1.0, 0.0), Vec3::new(-1.0, 1.0, 0.0), Vec3::z()],
                Vec3::new(1.0, 0.5, 1.0),
            )),
            Bound::frustum(Frustum::from_view_proj(&proj)),
            // A second, disjoint set to exercise the negative direction.
            Bound::sphere(Vec3::new(50.0, 0.0, 0.0), 1.0),
            Bound::aabb(Vec3::new(60.0, 0.0, 0.0), Vec3::new(61.0, 1.0, 1.0)),
        ];

        for a in &bounds {
            for b in &bounds {
                assert_eq!(
                    a.test(b),
                    b.test(a),
                    "asymmetric result for {:?} vs {:?}",
                    a.live(),
                    b.live()
                );
            }
        }
    }

    #[test]
    fn test_collision_group_filtering() {
        let mut source = Bound::sphere(Vec3::zeros(), 1.0);
        source.set_collision_source(true);
        source.set_group_id(1);

        let mut same_group = Bound::sphere(Vec3::new(0.5, 0.0, 0.0), 1.0);
        same_group.set_group_id(1);

        let mut other_group = Bound::sphere(Vec3::new(0.5, 0.0, 0.0), 1.0);
        other_group.set_group_id(2);

        assert!(!source.collides_with(&same_group));
        assert!(source.collides_with(&other_group));

        // Passive bounds never initiate.
        assert!(!other_group.collides_with(&source));

        source.set_enabled(false);
        assert!(!source.collides_with(&other_group));
    }

    #[test]
    fn test_disabled_bound_still_tests_geometrically() {
        // test() is pure geometry; enablement is a collision/culling policy
        // applied by the callers.
        let mut a = Bound::sphere(Vec3::zeros(), 1.0);
        a.set_enabled(false);
        let b = Bound::sphere(Vec3::new(1.0, 0.0, 0.0), 1.0);
        assert!(a.test(&b));
    }
}

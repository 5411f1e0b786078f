//! Pairwise intersection predicates for bounding volumes
//!
//! One symmetric function per unordered pair of volume kinds; the bound
//! dispatch table calls the same function for `a.test(b)` and `b.test(a)`,
//! so symmetry holds by construction.
//!
//! Boundary policy: touching counts as intersecting. Every predicate uses
//! non-strict comparisons, so a zero-radius sphere or zero-extent box
//! intersects exactly the volumes it touches and nothing else.

use super::{Aabb, Frustum, Obb, Plane, Sphere};
use crate::foundation::math::Vec3;

const AXIS_EPSILON: f32 = 1e-6;

/// Sphere vs. sphere: center distance against summed radii
#[must_use]
pub fn sphere_sphere(a: &Sphere, b: &Sphere) -> bool {
    let distance_squared = (a.center - b.center).magnitude_squared();
    let radius_sum = a.radius + b.radius;
    distance_squared <= radius_sum * radius_sum
}

/// Sphere vs. AABB: closest point on the box against the radius
#[must_use]
pub fn sphere_aabb(sphere: &Sphere, aabb: &Aabb) -> bool {
    let closest = Vec3::new(
        sphere.center.x.clamp(aabb.min.x, aabb.max.x),
        sphere.center.y.clamp(aabb.min.y, aabb.max.y),
        sphere.center.z.clamp(aabb.min.z, aabb.max.z),
    );
    (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
}

/// Sphere vs. OBB: the AABB test in the box's local frame
#[must_use]
pub fn sphere_obb(sphere: &Sphere, obb: &Obb) -> bool {
    let offset = sphere.center - obb.center;

    let mut closest = obb.center;
    for i in 0..3 {
        let extent = obb.extents[i];
        let projection = offset.dot(&obb.axes[i]).clamp(-extent, extent);
        closest += obb.axes[i] * projection;
    }

    (closest - sphere.center).magnitude_squared() <= sphere.radius * sphere.radius
}

/// Sphere vs. frustum: signed distance to every plane against the radius
#[must_use]
pub fn sphere_frustum(sphere: &Sphere, frustum: &Frustum) -> bool {
    frustum
        .planes
        .iter()
        .all(|plane| plane.distance_to_point(sphere.center) >= -sphere.radius)
}

/// AABB vs. AABB: per-axis interval overlap
#[must_use]
pub fn aabb_aabb(a: &Aabb, b: &Aabb) -> bool {
    a.min.x <= b.max.x
        && a.max.x >= b.min.x
        && a.min.y <= b.max.y
        && a.max.y >= b.min.y
        && a.min.z <= b.max.z
        && a.max.z >= b.min.z
}

/// AABB vs. OBB: separating-axis test with the AABB promoted to an OBB
#[must_use]
pub fn aabb_obb(aabb: &Aabb, obb: &Obb) -> bool {
    obb_obb(&Obb::from_aabb(aabb), obb)
}

/// AABB vs. frustum: positive-vertex test per plane
///
/// For each plane, picks the box corner farthest along the plane normal; if
/// that corner is behind the plane the whole box is outside. Conservative:
/// never produces a false negative.
#[must_use]
pub fn aabb_frustum(aabb: &Aabb, frustum: &Frustum) -> bool {
    for plane in &frustum.planes {
        let mut p = aabb.min;
        if plane.normal.x >= 0.0 {
            p.x = aabb.max.x;
        }
        if plane.normal.y >= 0.0 {
            p.y = aabb.max.y;
        }
        if plane.normal.z >= 0.0 {
            p.z = aabb.max.z;
        }

        if plane.distance_to_point(p) < 0.0 {
            return false;
        }
    }

    true
}

/// OBB vs. OBB: separating-axis test over the 15 candidate axes
///
/// Tests the 3 + 3 face normals and the 9 edge-edge cross products.
/// Near-parallel edge pairs produce a degenerate cross product, which is
/// skipped (it can never be the only separating axis).
#[must_use]
pub fn obb_obb(a: &Obb, b: &Obb) -> bool {
    let offset = b.center - a.center;

    let separated_on = |axis: Vec3| -> bool {
        let length_squared = axis.magnitude_squared();
        if length_squared < AXIS_EPSILON {
            return false;
        }

        let axis = axis / length_squared.sqrt();
        let distance = offset.dot(&axis).abs();
        distance > a.projected_radius(axis) + b.projected_radius(axis)
    };

    for axis in &a.axes {
        if separated_on(*axis) {
            return false;
        }
    }

    for axis in &b.axes {
        if separated_on(*axis) {
            return false;
        }
    }

    for axis_a in &a.axes {
        for axis_b in &b.axes {
            if separated_on(axis_a.cross(axis_b)) {
                return false;
            }
        }
    }

    true
}

/// OBB vs. frustum: effective-radius test per plane
#[must_use]
pub fn obb_frustum(obb: &Obb, frustum: &Frustum) -> bool {
    for plane in &frustum.planes {
        let radius = obb.projected_radius(plane.normal);
        if plane.distance_to_point(obb.center) < -radius {
            return false;
        }
    }

    true
}

/// Frustum vs. frustum: mutual corner rejection
///
/// Two frusta are reported disjoint only when all corners of one lie
/// strictly outside a single plane of the other. Falls back to intersecting
/// (conservative) when corner data is unavailable.
#[must_use]
pub fn frustum_frustum(a: &Frustum, b: &Frustum) -> bool {
    let (Some(corners_a), Some(corners_b)) = (&a.corners, &b.corners) else {
        return true;
    };

    !(all_outside_one_plane(&a.planes, corners_b) || all_outside_one_plane(&b.planes, corners_a))
}

fn all_outside_one_plane(planes: &[Plane; 6], corners: &[Vec3; 8]) -> bool {
    planes.iter().any(|plane| {
        corners
            .iter()
            .all(|corner| plane.distance_to_point(*corner) < 0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext};

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_extents(center, Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_sphere_sphere_overlap_and_miss() {
        let a = Sphere::new(Vec3::zeros(), 1.0);
        let b = Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let c = Sphere::new(Vec3::new(5.0, 0.0, 0.0), 1.0);

        assert!(sphere_sphere(&a, &b));
        assert!(!sphere_sphere(&a, &c));
    }

    #[test]
    fn test_sphere_sphere_touching_counts() {
        let a = Sphere::new(Vec3::zeros(), 1.0);
        let b = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(sphere_sphere(&a, &b));
    }

    #[test]
    fn test_zero_radius_sphere() {
        let point = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 0.0);
        let sphere = Sphere::new(Vec3::zeros(), 1.0);
        let touching = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 0.0);

        assert!(!sphere_sphere(&point, &sphere));
        assert!(sphere_sphere(&touching, &sphere));
    }

    #[test]
    fn test_sphere_inside_aabb_always_intersects() {
        let aabb = unit_box_at(Vec3::zeros());
        let inside = Sphere::new(Vec3::new(0.2, -0.1, 0.3), 0.25);
        assert!(sphere_aabb(&inside, &aabb));
    }

    #[test]
    fn test_sphere_far_from_aabb_never_intersects() {
        let aabb = unit_box_at(Vec3::zeros());
        // Center-to-box distance exceeds radius + half-diagonal.
        let far = Sphere::new(Vec3::new(10.0, 10.0, 10.0), 1.0);
        assert!(!sphere_aabb(&far, &aabb));
    }

    #[test]
    fn test_sphere_aabb_touching_face() {
        let aabb = unit_box_at(Vec3::zeros());
        let touching = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        assert!(sphere_aabb(&touching, &aabb));
    }

    #[test]
    fn test_aabb_aabb_touching_and_disjoint() {
        let a = unit_box_at(Vec3::zeros());
        let touching = unit_box_at(Vec3::new(2.0, 0.0, 0.0));
        let disjoint = unit_box_at(Vec3::new(2.1, 0.0, 0.0));

        assert!(aabb_aabb(&a, &touching));
        assert!(!aabb_aabb(&a, &disjoint));
    }

    #[test]
    fn test_zero_extent_aabb() {
        let point_box = Aabb::from_center_extents(Vec3::new(1.0, 0.0, 0.0), Vec3::zeros());
        let unit = unit_box_at(Vec3::zeros());
        let far_point = Aabb::from_center_extents(Vec3::new(3.0, 0.0, 0.0), Vec3::zeros());

        assert!(aabb_aabb(&point_box, &unit));
        assert!(!aabb_aabb(&far_point, &unit));
    }

    #[test]
    fn test_sphere_obb_rotated() {
        // Box rotated 45 degrees around Z; its corner reaches sqrt(2) along X.
        let axes = [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::z(),
        ];
        let obb = Obb::new(Vec3::zeros(), axes, Vec3::new(1.0, 1.0, 1.0));

        let near = Sphere::new(Vec3::new(1.6, 0.0, 0.0), 0.3);
        let far = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 0.3);

        assert!(sphere_obb(&near, &obb));
        assert!(!sphere_obb(&far, &obb));
    }

    #[test]
    fn test_obb_obb_rotated_overlap() {
        let a = Obb::from_aabb(&unit_box_at(Vec3::zeros()));
        let axes = [
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
            Vec3::z(),
        ];
        let near = Obb::new(Vec3::new(2.3, 0.0, 0.0), axes, Vec3::new(1.0, 1.0, 1.0));
        let far = Obb::new(Vec3::new(3.0, 0.0, 0.0), axes, Vec3::new(1.0, 1.0, 1.0));

        // Rotated box corner reaches back to x = 2.3 - sqrt(2).
        assert!(obb_obb(&a, &near));
        assert!(!obb_obb(&a, &far));
    }

    #[test]
    fn test_obb_obb_parallel_axes_skip_degenerate_cross() {
        let a = Obb::from_aabb(&unit_box_at(Vec3::zeros()));
        let b = Obb::from_aabb(&unit_box_at(Vec3::new(1.5, 0.0, 0.0)));
        assert!(obb_obb(&a, &b));
    }

    #[test]
    fn test_frustum_tests_against_region() {
        let proj = Mat4::orthographic(-10.0, 10.0, 0.0, 10.0, 0.0, 10.0);
        let frustum = Frustum::from_view_proj(&proj);

        assert!(sphere_frustum(&Sphere::new(Vec3::new(0.0, 5.0, 2.0), 1.0), &frustum));
        assert!(!sphere_frustum(&Sphere::new(Vec3::new(0.0, -5.0, 2.0), 1.0), &frustum));

        assert!(aabb_frustum(&unit_box_at(Vec3::new(0.0, 5.0, 5.0)), &frustum));
        assert!(!aabb_frustum(&unit_box_at(Vec3::new(0.0, 20.0, 5.0)), &frustum));

        let obb = Obb::from_aabb(&unit_box_at(Vec3::new(0.0, 9.5, 5.0)));
        assert!(obb_frustum(&obb, &frustum));
    }

    #[test]
    fn test_sphere_frustum_touching_plane() {
        let proj = Mat4::orthographic(-10.0, 10.0, 0.0, 10.0, 0.0, 10.0);
        let frustum = Frustum::from_view_proj(&proj);

        // Sphere center one radius below the bottom plane: touching.
        assert!(sphere_frustum(&Sphere::new(Vec3::new(0.0, -1.0, 5.0), 1.0), &frustum));
        assert!(!sphere_frustum(&Sphere::new(Vec3::new(0.0, -1.1, 5.0), 1.0), &frustum));
    }

    #[test]
    fn test_frustum_frustum_overlap_and_miss() {
        let a = Frustum::from_view_proj(&Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.0, 1.0));
        let b = Frustum::from_view_proj(&Mat4::orthographic(0.5, 2.0, -1.0, 1.0, 0.0, 1.0));
        let c = Frustum::from_view_proj(&Mat4::orthographic(5.0, 6.0, -1.0, 1.0, 0.0, 1.0));

        assert!(frustum_frustum(&a, &b));
        assert!(!frustum_frustum(&a, &c));
    }

    #[test]
    fn test_frustum_frustum_without_corners_is_conservative() {
        let planes = Frustum::from_view_proj(&Mat4::orthographic(-1.0, 1.0, -1.0, 1.0, 0.0, 1.0));
        let blind = Frustum::from_planes(planes.planes);
        assert!(frustum_frustum(&blind, &planes));
    }
}

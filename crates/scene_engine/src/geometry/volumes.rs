//! Bounding volume shapes
//!
//! Plain geometric data with constructors and transform helpers; the
//! pairwise tests live in [`super::intersect`].

use crate::foundation::math::{Mat4, Point3, Vec3, Vec4};

/// Plane defined by normal and distance from origin
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Normal vector (normalized)
    pub normal: Vec3,
    /// Distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a new plane from normal and distance; the normal is normalized
    #[must_use]
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize(),
            distance,
        }
    }

    /// Build a plane from the raw `(nx, ny, nz, d)` coefficients of a
    /// clip-space row combination, normalizing so signed distances are
    /// meaningful. Degenerate coefficients are kept as-is.
    #[must_use]
    pub fn from_coefficients(coefficients: Vec4) -> Self {
        let normal = Vec3::new(coefficients.x, coefficients.y, coefficients.z);
        let len = normal.magnitude();
        if len > 1e-6 {
            Self {
                normal: normal / len,
                distance: coefficients.w / len,
            }
        } else {
            Self {
                normal,
                distance: coefficients.w,
            }
        }
    }

    /// Calculate signed distance from plane to point
    #[must_use]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.distance
    }
}

/// Bounding sphere
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    #[must_use]
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    #[must_use]
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Returns a new world-aligned AABB enclosing this box under `transform`.
    ///
    /// Transforms center + half-extents instead of looping over the 8
    /// corners (Arvo's method); the absolute value of the upper-left 3x3
    /// rotates the half-extents.
    #[must_use]
    pub fn transformed_by(&self, transform: &Mat4) -> Self {
        let center = self.center();
        let half = self.extents();

        let new_center = transform.transform_point(&Point3::from(center)).coords;

        let new_half = Vec3::new(
            half.x * transform[(0, 0)].abs()
                + half.y * transform[(0, 1)].abs()
                + half.z * transform[(0, 2)].abs(),
            half.x * transform[(1, 0)].abs()
                + half.y * transform[(1, 1)].abs()
                + half.z * transform[(1, 2)].abs(),
            half.x * transform[(2, 0)].abs()
                + half.y * transform[(2, 1)].abs()
                + half.z * transform[(2, 2)].abs(),
        );

        Self {
            min: new_center - new_half,
            max: new_center + new_half,
        }
    }
}

/// Oriented bounding box
#[derive(Debug, Clone, Copy)]
pub struct Obb {
    /// Center of the box
    pub center: Vec3,
    /// The three local box axes (normalized, mutually orthogonal)
    pub axes: [Vec3; 3],
    /// Half-size along each axis
    pub extents: Vec3,
}

impl Obb {
    /// Create a new OBB; the axes are normalized
    #[must_use]
    pub fn new(center: Vec3, axes: [Vec3; 3], extents: Vec3) -> Self {
        Self {
            center,
            axes: [axes[0].normalize(), axes[1].normalize(), axes[2].normalize()],
            extents,
        }
    }

    /// Build an axis-aligned OBB from an AABB
    #[must_use]
    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self {
            center: aabb.center(),
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
            extents: aabb.extents(),
        }
    }

    /// Half-length of the projection of this box onto a unit axis
    #[must_use]
    pub fn projected_radius(&self, axis: Vec3) -> f32 {
        self.extents.x * self.axes[0].dot(&axis).abs()
            + self.extents.y * self.axes[1].dot(&axis).abs()
            + self.extents.z * self.axes[2].dot(&axis).abs()
    }
}

/// View frustum: six planes plus the eight corner points
///
/// The corners are carried alongside the planes so frustum-frustum tests
/// can check point containment symmetrically; they are `None` when the
/// frustum was built from explicit planes or a non-invertible matrix.
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Six planes (left, right, bottom, top, near, far), normals pointing inward
    pub planes: [Plane; 6],
    /// The eight corner points, when recoverable
    pub corners: Option<[Vec3; 8]>,
}

impl Frustum {
    /// Create a frustum from six planes (no corner information)
    #[must_use]
    pub fn from_planes(planes: [Plane; 6]) -> Self {
        Self {
            planes,
            corners: None,
        }
    }

    /// Extract the six frustum planes from a view-projection matrix
    ///
    /// Uses the Gribb-Hartmann row-combination method, for projections that
    /// map depth to `[0, 1]`. Corners are recovered by unprojecting the
    /// clip-space cube through the matrix inverse.
    #[must_use]
    pub fn from_view_proj(view_proj: &Mat4) -> Self {
        let row = |r: usize| {
            Vec4::new(
                view_proj[(r, 0)],
                view_proj[(r, 1)],
                view_proj[(r, 2)],
                view_proj[(r, 3)],
            )
        };

        let r0 = row(0);
        let r1 = row(1);
        let r2 = row(2);
        let r3 = row(3);

        let planes = [
            Plane::from_coefficients(r3 + r0), // left
            Plane::from_coefficients(r3 - r0), // right
            Plane::from_coefficients(r3 + r1), // bottom
            Plane::from_coefficients(r3 - r1), // top
            Plane::from_coefficients(r2),      // near (depth in [0, 1])
            Plane::from_coefficients(r3 - r2), // far
        ];

        let corners = view_proj.try_inverse().map(|inv| {
            let mut corners = [Vec3::zeros(); 8];
            let mut i = 0;
            for &z in &[0.0_f32, 1.0] {
                for &y in &[-1.0_f32, 1.0] {
                    for &x in &[-1.0_f32, 1.0] {
                        corners[i] = inv.transform_point(&Point3::new(x, y, z)).coords;
                        i += 1;
                    }
                }
            }
            corners
        });

        Self { planes, corners }
    }

    /// Check whether a point lies inside or on every plane
    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= 0.0)
    }
}

//! Camera: projection parameters, view matrix, and the frustum bound

use crate::bound::Bound;
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::geometry::Frustum;
use crate::scene::node::CameraMask;

/// Projection parameters for a camera.
///
/// Both variants map view-space depth along +Z into clip depth `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        /// Width over height
        aspect: f32,
        /// Near plane distance
        near: f32,
        /// Far plane distance
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Left clip boundary
        left: f32,
        /// Right clip boundary
        right: f32,
        /// Bottom clip boundary
        bottom: f32,
        /// Top clip boundary
        top: f32,
        /// Near plane distance
        near: f32,
        /// Far plane distance
        far: f32,
    },
}

impl Projection {
    /// Build the projection matrix
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective(fov_y, aspect, near, far),
            Self::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic(left, right, bottom, top, near, far),
        }
    }
}

/// A camera: the frustum bound used for culling plus the visibility mask
/// that gates which nodes it sees.
///
/// The frustum is not derived from a spatial transform like the other
/// bounds; it is rebuilt from the view-projection matrix whenever the view
/// or projection changes.
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Projection,
    view: Mat4,
    mask: CameraMask,
    bound: Bound,
}

impl Camera {
    /// Create a camera with an identity view matrix
    #[must_use]
    pub fn new(projection: Projection, mask: CameraMask) -> Self {
        let mut camera = Self {
            projection,
            view: Mat4::identity(),
            mask,
            bound: Bound::frustum(Frustum::from_view_proj(&projection.matrix())),
        };
        camera.update_bound();
        camera
    }

    /// Current projection parameters
    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Replace the projection and rebuild the frustum bound
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.update_bound();
    }

    /// Current view matrix
    #[must_use]
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Replace the view matrix and rebuild the frustum bound
    pub fn set_view(&mut self, view: Mat4) {
        self.view = view;
        self.update_bound();
    }

    /// Point the camera at a target and rebuild the frustum bound
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.set_view(Mat4::look_at(eye, target, up));
    }

    /// Visibility mask this camera renders
    #[must_use]
    pub fn mask(&self) -> CameraMask {
        self.mask
    }

    /// Set the visibility mask
    pub fn set_mask(&mut self, mask: CameraMask) {
        self.mask = mask;
    }

    /// The camera's frustum bound
    #[must_use]
    pub fn bound(&self) -> &Bound {
        &self.bound
    }

    /// Rebuild the frustum bound from the current view-projection matrix
    pub fn update_bound(&mut self) {
        let view_proj = self.projection.matrix() * self.view;
        self.bound.set_frustum(Frustum::from_view_proj(&view_proj));
    }
}

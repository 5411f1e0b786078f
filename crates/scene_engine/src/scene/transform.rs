//! TRS transform with a cached affine matrix

use crate::foundation::math::{Mat4, Quat, Vec3};

/// Translation, rotation, and scaling triple with a derived affine matrix.
///
/// The matrix is cached: field setters do not recompute it, and the owner is
/// responsible for calling [`Transform::update`] before trusting
/// [`Transform::affine_matrix`] again. The scene graph drives this through
/// its versioned resolution pass, so a resolved node's matrix is always the
/// `T * R * S` composition of the current fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    translation: Vec3,
    scaling: Vec3,
    orientation: Quat,
    affine_matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            scaling: Vec3::new(1.0, 1.0, 1.0),
            orientation: Quat::identity(),
            affine_matrix: Mat4::identity(),
        }
    }
}

impl Transform {
    /// Create an identity transform
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform from TRS fields with the matrix already computed
    #[must_use]
    pub fn new(translation: Vec3, orientation: Quat, scaling: Vec3) -> Self {
        let mut transform = Self {
            translation,
            scaling,
            orientation,
            affine_matrix: Mat4::identity(),
        };
        transform.update();
        transform
    }

    /// Current translation
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Current scaling
    #[must_use]
    pub fn scaling(&self) -> Vec3 {
        self.scaling
    }

    /// Current orientation
    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Cached affine matrix; only valid after [`Transform::update`]
    #[must_use]
    pub fn affine_matrix(&self) -> &Mat4 {
        &self.affine_matrix
    }

    /// Set the translation without recomputing the matrix
    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    /// Set the scaling without recomputing the matrix
    pub fn set_scaling(&mut self, scaling: Vec3) {
        self.scaling = scaling;
    }

    /// Set the orientation without recomputing the matrix
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Recompute the affine matrix as `T * R * S` from the current fields
    pub fn update(&mut self) {
        self.affine_matrix = Mat4::new_translation(&self.translation)
            * self.orientation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scaling);
    }

    /// Compose a parent's resolved transform with local TRS into this one.
    ///
    /// The composition law: the child's orientation and scaling combine
    /// multiplicatively, and the local translation is scaled by the parent's
    /// scaling, rotated by the parent's orientation, then offset by the
    /// parent's translation. Existing hierarchies depend on this exact
    /// order.
    pub fn apply_transform(
        &mut self,
        parent: &Transform,
        translation: Vec3,
        orientation: Quat,
        scaling: Vec3,
    ) {
        self.orientation = parent.orientation * orientation;
        self.scaling = parent.scaling.component_mul(&scaling);
        self.translation = parent.translation
            + parent.orientation * translation.component_mul(&parent.scaling);
        self.update();
    }
}

//! Placement transforms for grown segments

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Translation, rotation and non-uniform scale of a placed segment
///
/// The rotation is normalized on construction. Scale components are expected
/// to be positive; growth configs reject anything else before a build starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform, normalizing `rotation`
    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation: rotation.normalize(),
            scale,
        }
    }

    /// Affine matrix applying scale, then rotation, then translation
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Matrix for transforming normals (inverse-transpose of the linear part)
    #[inline]
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.matrix()).inverse().transpose()
    }

    /// Map a point from segment-local space into the parent frame
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * local)
    }

    /// Map a normal from segment-local space into the parent frame
    #[inline]
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        (self.normal_matrix() * normal).normalize_or_zero()
    }
}

/// Build a rotation from Euler angles given in degrees
///
/// Angles apply about z first, then x, then y, which is the convention
/// the growth angle ranges were authored in.
pub fn euler_degrees(x: f32, y: f32, z: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        y.to_radians(),
        x.to_radians(),
        z.to_radians(),
    )
}

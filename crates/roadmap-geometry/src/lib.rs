#![warn(missing_docs)]
#![doc = "Rigid transforms and rotators for road map rasterization."]
#![doc = ""]
#![doc = "World space is right-handed with +Z up. Yaw turns +X towards +Y, positive pitch"]
#![doc = "raises the forward vector towards +Z and roll spins about the forward axis."]
#![doc = "All angles on the public API are in degrees, all lengths in centimeters."]

use core::fmt;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::GeometryError;

/// A rotation expressed as pitch, yaw and roll, in degrees.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotator {
    /// Rotation about the right axis (degrees). Positive looks up.
    pub pitch: f32,
    /// Rotation about the up axis (degrees). Positive turns +X towards +Y.
    pub yaw: f32,
    /// Rotation about the forward axis (degrees).
    pub roll: f32,
}

impl Rotator {
    /// The identity rotation.
    pub const ZERO: Rotator = Rotator::new(0.0, 0.0, 0.0);

    /// Construct a new rotator.
    ///
    /// # Arguments
    ///
    /// * `pitch`: Rotation about the right axis in degrees.
    /// * `yaw`: Rotation about the up axis in degrees.
    /// * `roll`: Rotation about the forward axis in degrees.
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Rotator { pitch, yaw, roll }
    }

    /// Construct a rotator that only turns about the up axis.
    pub const fn from_yaw(yaw: f32) -> Self {
        Rotator::new(0.0, yaw, 0.0)
    }

    /// Normalize an angle in degrees to be within `(-180, 180]`.
    ///
    /// Angles at `-180` will be normalized to `180`.
    ///
    /// # Arguments
    ///
    /// * `angle`: The angle in degrees to normalize.
    ///
    /// # Returns
    ///
    /// The normalized angle in degrees.
    pub fn normalize_axis(angle: f32) -> f32 {
        let a = angle % 360.0;
        if a > 180.0 {
            a - 360.0
        } else if a <= -180.0 {
            a + 360.0
        } else {
            a
        }
    }

    /// Returns a copy with every axis normalized to `(-180, 180]`.
    pub fn normalized(&self) -> Self {
        Rotator::new(
            Self::normalize_axis(self.pitch),
            Self::normalize_axis(self.yaw),
            Self::normalize_axis(self.roll),
        )
    }

    /// Returns `true` if no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }

    /// Converts this rotator into a unit quaternion.
    ///
    /// The rotation is applied roll first, then pitch, then yaw.
    pub fn to_quaternion(&self) -> UnitQuaternion<f32> {
        // nalgebra pitches +X towards -Z, so the sign is flipped to keep
        // positive pitch looking up.
        UnitQuaternion::from_euler_angles(
            self.roll.to_radians(),
            -self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }

    /// Recovers pitch, yaw and roll from a unit quaternion.
    pub fn from_quaternion(rotation: &UnitQuaternion<f32>) -> Self {
        let (roll, pitch, yaw) = rotation.euler_angles();
        Rotator::new(-pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
    }

    /// Unit vector pointing along the rotated +X axis.
    pub fn forward_vector(&self) -> Vector3<f32> {
        forward_vector(&self.to_quaternion())
    }
}

impl fmt::Display for Rotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(P: {:.2}°, Y: {:.2}°, R: {:.2}°)",
            self.pitch, self.yaw, self.roll
        )
    }
}

/// Unit vector pointing along the +X axis of `rotation`.
pub fn forward_vector(rotation: &UnitQuaternion<f32>) -> Vector3<f32> {
    rotation * Vector3::x()
}

/// Rotates `vector` about the world up axis by `degrees`.
///
/// Adding an offset to the yaw of a rotator and taking its forward vector is
/// the same as rotating the original forward vector with this function.
pub fn rotate_yaw(vector: &Vector3<f32>, degrees: f32) -> Vector3<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), degrees.to_radians()) * vector
}

/// A rigid transform: a rotation followed by a translation.
///
/// Positions are mapped from the local frame of the transform into the
/// parent frame, `p' = R * p + t`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    isometry: Isometry3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    /// The transform that leaves every position unchanged.
    pub fn identity() -> Self {
        Transform {
            isometry: Isometry3::identity(),
        }
    }

    /// Construct a transform from a translation and a rotation.
    pub fn new(translation: Vector3<f32>, rotation: UnitQuaternion<f32>) -> Self {
        Transform {
            isometry: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    /// Construct a pure translation.
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Transform::new(translation, UnitQuaternion::identity())
    }

    /// Construct a transform from a location and a rotator.
    pub fn from_rotator(location: Vector3<f32>, rotator: Rotator) -> Self {
        Transform::new(location, rotator.to_quaternion())
    }

    /// Construct a transform from a location and a rotator, rejecting
    /// non-finite components.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeometryError::NonFiniteLocation)` if any location component is NaN or infinite.
    /// Returns `Err(GeometryError::NonFiniteRotation)` if any rotator component is NaN or infinite.
    pub fn try_new(location: Vector3<f32>, rotator: Rotator) -> Result<Self, GeometryError> {
        if !location.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFiniteLocation(
                "location components must be finite",
            ));
        }
        if !rotator.is_finite() {
            return Err(GeometryError::NonFiniteRotation(
                "pitch, yaw and roll must be finite",
            ));
        }
        Ok(Transform::from_rotator(location, rotator))
    }

    /// Wraps an existing isometry.
    pub fn from_isometry(isometry: Isometry3<f32>) -> Self {
        Transform { isometry }
    }

    /// Returns the underlying isometry.
    pub fn isometry(&self) -> &Isometry3<f32> {
        &self.isometry
    }

    /// Returns the rotation part.
    pub fn rotation(&self) -> &UnitQuaternion<f32> {
        &self.isometry.rotation
    }

    /// Returns the translation part.
    pub fn translation(&self) -> Vector3<f32> {
        self.isometry.translation.vector
    }

    /// Returns the rotation part as a rotator.
    pub fn rotator(&self) -> Rotator {
        Rotator::from_quaternion(&self.isometry.rotation)
    }

    /// Unit vector pointing along the +X axis of this transform's rotation.
    pub fn forward_vector(&self) -> Vector3<f32> {
        forward_vector(&self.isometry.rotation)
    }

    /// Maps a position from the local frame into the parent frame.
    pub fn transform_position(&self, position: &Point3<f32>) -> Point3<f32> {
        self.isometry.transform_point(position)
    }

    /// Maps a position from the parent frame back into the local frame.
    pub fn inverse_transform_position(&self, position: &Point3<f32>) -> Point3<f32> {
        self.isometry.inverse_transform_point(position)
    }

    /// Rotates a direction into the parent frame, ignoring translation.
    pub fn transform_vector(&self, vector: &Vector3<f32>) -> Vector3<f32> {
        self.isometry.transform_vector(vector)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.translation();
        write!(
            f,
            "Transform (location: ({:.2}, {:.2}, {:.2}) cm, rotation: {})",
            t.x,
            t.y,
            t.z,
            self.rotator()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_normalize_axis() {
        assert_relative_eq!(Rotator::normalize_axis(0.0), 0.0);
        assert_relative_eq!(Rotator::normalize_axis(180.0), 180.0);
        assert_relative_eq!(Rotator::normalize_axis(-180.0), 180.0); // -180 maps to 180 for (-180, 180]
        assert_relative_eq!(Rotator::normalize_axis(270.0), -90.0);
        assert_relative_eq!(Rotator::normalize_axis(540.0), 180.0);
        assert_relative_eq!(Rotator::normalize_axis(-450.0), -90.0);
    }

    #[test]
    fn test_forward_vector_yaw() {
        let forward = Rotator::from_yaw(0.0).forward_vector();
        assert_relative_eq!(forward, Vector3::new(1.0, 0.0, 0.0), epsilon = EPSILON);

        let left = Rotator::from_yaw(90.0).forward_vector();
        assert_relative_eq!(left, Vector3::new(0.0, 1.0, 0.0), epsilon = EPSILON);

        let back = Rotator::from_yaw(180.0).forward_vector();
        assert_relative_eq!(back, Vector3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_forward_vector_pitch_looks_up() {
        let up = Rotator::new(90.0, 0.0, 0.0).forward_vector();
        assert_relative_eq!(up, Vector3::new(0.0, 0.0, 1.0), epsilon = EPSILON);

        let tilted = Rotator::new(30.0, 0.0, 0.0).forward_vector();
        assert!(tilted.z > 0.0);
        assert_relative_eq!(tilted.norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_roll_does_not_change_forward() {
        let plain = Rotator::new(10.0, 35.0, 0.0).forward_vector();
        let rolled = Rotator::new(10.0, 35.0, 70.0).forward_vector();
        assert_relative_eq!(plain, rolled, epsilon = EPSILON);
    }

    #[test]
    fn test_quaternion_round_trip() {
        let rotator = Rotator::new(20.0, -135.0, 45.0);
        let recovered = Rotator::from_quaternion(&rotator.to_quaternion());
        assert_relative_eq!(recovered.pitch, rotator.pitch, epsilon = 1e-3);
        assert_relative_eq!(recovered.yaw, rotator.yaw, epsilon = 1e-3);
        assert_relative_eq!(recovered.roll, rotator.roll, epsilon = 1e-3);
    }

    #[test]
    fn test_rotate_yaw_matches_rotator_offset() {
        let rotator = Rotator::new(0.0, 30.0, 0.0);
        for offset in [90.0, 180.0, 270.0] {
            let shifted = Rotator::new(0.0, rotator.yaw + offset, 0.0).forward_vector();
            let rotated = rotate_yaw(&rotator.forward_vector(), offset);
            assert_relative_eq!(shifted, rotated, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_transform_position_inverse() {
        let transform =
            Transform::from_rotator(Vector3::new(100.0, -50.0, 10.0), Rotator::from_yaw(90.0));

        // Local +X points along world +Y after a 90° yaw.
        let world = transform.transform_position(&Point3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(world, Point3::new(100.0, -40.0, 10.0), epsilon = 1e-4);

        let local = transform.inverse_transform_position(&world);
        assert_relative_eq!(local, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let transform =
            Transform::from_rotator(Vector3::new(5.0, 5.0, 5.0), Rotator::from_yaw(180.0));
        let v = transform.transform_vector(&Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(v, Vector3::new(-1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(transform.forward_vector(), v, epsilon = EPSILON);
    }

    #[test]
    fn test_identity_default() {
        let transform = Transform::default();
        assert_eq!(transform, Transform::identity());
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(transform.transform_position(&p), p);
    }

    #[test]
    fn test_try_new_rejects_non_finite() {
        let result = Transform::try_new(Vector3::new(f32::NAN, 0.0, 0.0), Rotator::ZERO);
        assert!(matches!(result, Err(GeometryError::NonFiniteLocation(_))));

        let result = Transform::try_new(Vector3::zeros(), Rotator::from_yaw(f32::INFINITY));
        assert!(matches!(result, Err(GeometryError::NonFiniteRotation(_))));

        assert!(Transform::try_new(Vector3::new(1.0, 2.0, 3.0), Rotator::from_yaw(45.0)).is_ok());
    }

    #[test]
    fn test_display() {
        let transform = Transform::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let text = format!("{}", transform);
        assert!(text.contains("(1.00, 2.00, 3.00) cm"));
        assert!(text.contains("Y: 0.00°"));
    }
}

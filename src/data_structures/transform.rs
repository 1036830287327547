//! Editable transforms: position, orientation and scale.
//!
//! Both the model root and every mesh override carry a [`Transform`]. The world
//! matrix is built as `T * R * S`, so scale is applied first and translation last.

use cgmath::{Deg, InnerSpace, One, Quaternion, Rad, Rotation3};
use serde::{Deserialize, Serialize};

/// Imported geometry is authored in centimetre-ish units, the viewer world is not.
pub const DEFAULT_SCALE: f32 = 0.01;

/// Position, rotation (as quaternion) and scale of an editable node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub orientation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// No translation, no rotation and the viewer's default down-scale.
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            orientation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(DEFAULT_SCALE, DEFAULT_SCALE, DEFAULT_SCALE),
        }
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.orientation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// The single value shown while editing in uniform mode.
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = cgmath::Vector3::new(scale, scale, scale);
    }

    pub fn yaw_pitch_roll(&self) -> YawPitchRoll {
        YawPitchRoll::from_quaternion(self.orientation)
    }

    pub fn set_yaw_pitch_roll(&mut self, angles: YawPitchRoll) {
        self.orientation = angles.to_quaternion();
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// How scale is edited. Switching modes leaves the stored vector untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleMode {
    #[default]
    Uniform,
    NonUniform,
}

/// Euler angles in degrees: yaw about +Y, pitch about +X, roll about +Z.
///
/// The rotation applies roll first, then pitch, then yaw, i.e.
/// `q = q_yaw * q_pitch * q_roll`. Several angle triples map to the same
/// orientation; [`from_quaternion`](Self::from_quaternion) returns one of them
/// with pitch in `[-90, 90]`. At the poles roll is folded into yaw and reads zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct YawPitchRoll {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl YawPitchRoll {
    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }

    pub fn to_quaternion(&self) -> Quaternion<f32> {
        let yaw = Quaternion::from_angle_y(Rad::from(Deg(self.yaw)));
        let pitch = Quaternion::from_angle_x(Rad::from(Deg(self.pitch)));
        let roll = Quaternion::from_angle_z(Rad::from(Deg(self.roll)));
        yaw * pitch * roll
    }

    pub fn from_quaternion(q: Quaternion<f32>) -> Self {
        let q = if q.magnitude2() > 0.0 { q.normalize() } else { Quaternion::one() };
        let (w, x, y, z) = (q.s, q.v.x, q.v.y, q.v.z);

        // Matrix entries of R = Ry(yaw) * Rx(pitch) * Rz(roll):
        // m12 = -sin(pitch), m02 / m22 give yaw, m10 / m11 give roll.
        let sin_pitch = (2.0 * (w * x - y * z)).clamp(-1.0, 1.0);
        let pitch = sin_pitch.asin();

        let (yaw, roll) = if sin_pitch.abs() > GIMBAL_THRESHOLD {
            let m00 = 1.0 - 2.0 * (y * y + z * z);
            let m20 = 2.0 * (x * z - w * y);
            ((-m20).atan2(m00), 0.0)
        } else {
            let m02 = 2.0 * (x * z + w * y);
            let m22 = 1.0 - 2.0 * (x * x + y * y);
            let m10 = 2.0 * (x * y + w * z);
            let m11 = 1.0 - 2.0 * (x * x + z * z);
            (m02.atan2(m22), m10.atan2(m11))
        };

        Self {
            yaw: Deg::from(Rad(yaw)).0,
            pitch: Deg::from(Rad(pitch)).0,
            roll: Deg::from(Rad(roll)).0,
        }
    }
}

// close enough to the pole that f32 rounding of an exact +-90 degree pitch still folds
const GIMBAL_THRESHOLD: f32 = 1.0 - 1e-6;

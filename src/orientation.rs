//! Device orientation math.
//!
//! Stateless quaternion/Euler conversions used by the remote-control
//! signal path alongside the stick output. Euler angles are in degrees;
//! the quaternion convention is Hamilton (w, x, y, z).
//!
//! Independent of the input engine; nothing here touches engine state.

use serde::{Deserialize, Serialize};

/// Orientation as yaw/pitch/roll in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl Euler {
    pub fn new(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self { yaw, pitch, roll }
    }
}

/// Unit quaternion, Hamilton convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

impl std::ops::Mul for Quat {
    type Output = Quat;

    /// Hamilton product.
    fn mul(self, q: Quat) -> Quat {
        Quat {
            w: self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
            x: self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            y: self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            z: self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
        }
    }
}

/// Convert yaw/pitch/roll degrees to a quaternion.
pub fn euler_to_quat(euler: Euler) -> Quat {
    let cy = (euler.yaw.to_radians() * 0.5).cos();
    let sy = (euler.yaw.to_radians() * 0.5).sin();
    let cp = (euler.pitch.to_radians() * 0.5).cos();
    let sp = (euler.pitch.to_radians() * 0.5).sin();
    let cr = (euler.roll.to_radians() * 0.5).cos();
    let sr = (euler.roll.to_radians() * 0.5).sin();

    Quat {
        w: cr * cp * cy + sr * sp * sy,
        x: sr * cp * cy - cr * sp * sy,
        y: cr * sp * cy + sr * cp * sy,
        z: cr * cp * sy - sr * sp * cy,
    }
}

/// Convert a quaternion back to yaw/pitch/roll degrees.
///
/// Pitch is clamped to ±90° at the gimbal singularity.
pub fn quat_to_euler(q: Quat) -> Euler {
    // yaw (Z)
    let siny_cosp = 2.0 * (q.w * q.z + q.x * q.y);
    let cosy_cosp = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
    let yaw = siny_cosp.atan2(cosy_cosp);

    // pitch (Y)
    let sinp = 2.0 * (q.w * q.y - q.z * q.x);
    let pitch = if sinp.abs() >= 1.0 {
        (std::f32::consts::FRAC_PI_2).copysign(sinp)
    } else {
        sinp.asin()
    };

    // roll (X)
    let sinr_cosp = 2.0 * (q.w * q.x + q.y * q.z);
    let cosr_cosp = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);
    let roll = sinr_cosp.atan2(cosr_cosp);

    Euler {
        yaw: yaw.to_degrees(),
        pitch: pitch.to_degrees(),
        roll: roll.to_degrees(),
    }
}

/// Compose two rotations given as Euler angles.
pub fn rotate_euler(a: Euler, b: Euler) -> Euler {
    quat_to_euler(euler_to_quat(a) * euler_to_quat(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_identity_product() {
        let q = euler_to_quat(Euler::new(30.0, 10.0, -45.0));
        let r = q * Quat::IDENTITY;
        assert!(close(r.w, q.w) && close(r.x, q.x) && close(r.y, q.y) && close(r.z, q.z));
    }

    #[test]
    fn test_euler_round_trip() {
        let e = Euler::new(47.0, 20.0, -63.0);
        let back = quat_to_euler(euler_to_quat(e));
        assert!(close(back.yaw, e.yaw), "yaw {} vs {}", back.yaw, e.yaw);
        assert!(close(back.pitch, e.pitch));
        assert!(close(back.roll, e.roll));
    }

    #[test]
    fn test_gimbal_clamp() {
        let back = quat_to_euler(euler_to_quat(Euler::new(0.0, 90.0, 0.0)));
        assert!((back.pitch - 90.0).abs() < 0.1);

        let back = quat_to_euler(euler_to_quat(Euler::new(0.0, -90.0, 0.0)));
        assert!((back.pitch + 90.0).abs() < 0.1);
    }

    #[test]
    fn test_rotation_composition() {
        let a = Euler::new(30.0, 0.0, 0.0);
        let b = Euler::new(60.0, 0.0, 0.0);
        let r = rotate_euler(a, b);
        assert!(close(r.yaw, 90.0), "yaw {}", r.yaw);
        assert!(close(r.pitch, 0.0));
        assert!(close(r.roll, 0.0));
    }
}

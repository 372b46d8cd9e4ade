/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::{EARTH_MEAN_ANGULAR_VELOCITY_RAD_S, SECONDS_PER_DAY};
use crate::linalg::{Matrix3, Vector3};
use crate::time::JD_J2000;
use crate::utils::{between_0_tau, r1, r2, r3};
use std::fmt;

/// Provides the orientation of the Earth fixed frame with respect to the inertial frame.
///
/// This is the celestial information the orbit borrows for every frame conversion; it is never owned by the orbit.
pub trait EarthRotation: Send + Sync + fmt::Debug {
    /// Direction cosine matrix from the inertial frame to the Earth fixed frame at the provided Julian day (UT1).
    fn dcm_i2ecef(&self, julian_day: f64) -> Matrix3<f64>;

    /// Angular velocity of the Earth fixed frame expressed in the inertial frame, in rad/s.
    fn angular_velocity_i(&self) -> Vector3<f64> {
        Vector3::new(0.0, 0.0, EARTH_MEAN_ANGULAR_VELOCITY_RAD_S)
    }
}

/// Greenwich mean sidereal time (IAU-82) of the provided Julian day (UT1), in radians in [0, 2π).
///
/// Reference: Vallado, 4th Ed., Eq. 3-47 (same as `gstime` of the SGP4 reference implementation).
pub fn gmst_rad(julian_day_ut1: f64) -> f64 {
    let tut1 = (julian_day_ut1 - JD_J2000) / 36_525.0;
    let gmst_s = -6.2e-6 * tut1.powi(3)
        + 0.093_104 * tut1.powi(2)
        + (876_600.0 * 3_600.0 + 8_640_184.812_866) * tut1
        + 67_310.548_41;
    // 360 degrees per 86400 seconds, i.e. 1/240 degrees per second
    between_0_tau((gmst_s / 240.0).to_radians())
}

/// Earth rotation modeled as a rotation about the pole by the Greenwich mean sidereal time.
///
/// Precession, nutation and polar motion are neglected.
#[derive(Copy, Clone, Debug, Default)]
pub struct SiderealRotation;

impl EarthRotation for SiderealRotation {
    fn dcm_i2ecef(&self, julian_day: f64) -> Matrix3<f64> {
        r3(gmst_rad(julian_day))
    }
}

/// Earth rotation with a constant rate starting from a fixed angle at a reference epoch.
///
/// A zero rate yields a frozen Earth, which is handy when checking frame transformations.
#[derive(Copy, Clone, Debug)]
pub struct FixedRotation {
    /// Rotation angle at the reference epoch, in radians
    pub angle_rad: f64,
    /// Julian day of the reference epoch
    pub epoch_jd: f64,
    /// Rotation rate, in rad/s
    pub rate_rad_s: f64,
}

impl FixedRotation {
    /// A non rotating Earth fixed frame aligned with the inertial frame.
    pub fn aligned() -> Self {
        Self {
            angle_rad: 0.0,
            epoch_jd: JD_J2000,
            rate_rad_s: 0.0,
        }
    }

    /// Uniform rotation at the Earth mean angular velocity, starting at `angle_rad` at `epoch_jd`.
    pub fn uniform(angle_rad: f64, epoch_jd: f64) -> Self {
        Self {
            angle_rad,
            epoch_jd,
            rate_rad_s: EARTH_MEAN_ANGULAR_VELOCITY_RAD_S,
        }
    }

    pub fn angle_at(&self, julian_day: f64) -> f64 {
        between_0_tau(
            self.angle_rad + self.rate_rad_s * (julian_day - self.epoch_jd) * SECONDS_PER_DAY,
        )
    }
}

impl EarthRotation for FixedRotation {
    fn dcm_i2ecef(&self, julian_day: f64) -> Matrix3<f64> {
        r3(self.angle_at(julian_day))
    }

    fn angular_velocity_i(&self) -> Vector3<f64> {
        Vector3::new(0.0, 0.0, self.rate_rad_s)
    }
}

/// Defines an Euler rotation, angle must be in radians
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EulerRotation {
    R1(f64),
    R2(f64),
    R3(f64),
}

impl EulerRotation {
    /// Get the DCM from this Euler rotation
    pub fn dcm(&self) -> Matrix3<f64> {
        match *self {
            Self::R1(angle) => r1(angle),
            Self::R2(angle) => r2(angle),
            Self::R3(angle) => r3(angle),
        }
    }
}

/// A fixed three-axis Euler rotation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Euler3Axis {
    /// The first rotation (e.g. R3)
    pub first: EulerRotation,
    /// The second rotation (e.g. R1)
    pub second: EulerRotation,
    /// The third and final rotation (e.g. R3, to complete a 3-1-3 rotation)
    pub third: EulerRotation,
}

impl Euler3Axis {
    /// The 3-1-3 rotation from the inertial frame to the perifocal frame of an orbit.
    pub fn perifocal(raan_rad: f64, inclination_rad: f64, arg_perigee_rad: f64) -> Self {
        Self {
            first: EulerRotation::R3(raan_rad),
            second: EulerRotation::R1(inclination_rad),
            third: EulerRotation::R3(arg_perigee_rad),
        }
    }

    /// DCM of the full rotation, i.e. third * second * first.
    pub fn dcm(&self) -> Matrix3<f64> {
        self.third.dcm() * self.second.dcm() * self.first.dcm()
    }
}

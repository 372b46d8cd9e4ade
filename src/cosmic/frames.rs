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

//! Stateless transformations between the inertial (ECI), Earth fixed (ECEF), geodetic and
//! local orbital (LVLH) representations.
//!
//! Attitude quaternions follow the "frame A to frame B" convention: `q_a2b` rotates the axes of A
//! onto the axes of B, so that coordinates transform as `v_b = q_a2b.inverse_transform_vector(&v_a)`.

use super::{AstroError, EarthRotation, GeodeticPosition, LocalFrameUndefinedSnafu};
use crate::linalg::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use crate::utils::tilde_matrix;
use snafu::ensure;

/// Expresses a vector given in frame A into frame B.
pub fn rotate_to_frame(q_a2b: &UnitQuaternion<f64>, v_a: &Vector3<f64>) -> Vector3<f64> {
    q_a2b.inverse_transform_vector(v_a)
}

/// Expresses a vector given in frame B back into frame A.
pub fn rotate_from_frame(q_a2b: &UnitQuaternion<f64>, v_b: &Vector3<f64>) -> Vector3<f64> {
    q_a2b.transform_vector(v_b)
}

/// Builds the quaternion `q_a2b` from the direction cosine matrix `C_a2b` (such that `v_b = C_a2b * v_a`).
pub fn quaternion_from_dcm(dcm_a2b: &Matrix3<f64>) -> UnitQuaternion<f64> {
    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(dcm_a2b.transpose()))
}

/// Transforms an inertial position and velocity into the Earth fixed frame.
///
/// The velocity accounts for the rotation of the Earth fixed frame: `v_ecef = C (v_i - ω⊕ × r_i)`.
pub fn eci_to_ecef(
    position_i_m: &Vector3<f64>,
    velocity_i_m_s: &Vector3<f64>,
    julian_day: f64,
    rotation: &dyn EarthRotation,
) -> (Vector3<f64>, Vector3<f64>) {
    let dcm = rotation.dcm_i2ecef(julian_day);
    let transport = tilde_matrix(&rotation.angular_velocity_i()) * position_i_m;
    (dcm * position_i_m, dcm * (velocity_i_m_s - transport))
}

/// Transforms an Earth fixed position and velocity into the inertial frame (inverse of [eci_to_ecef]).
pub fn ecef_to_eci(
    position_ecef_m: &Vector3<f64>,
    velocity_ecef_m_s: &Vector3<f64>,
    julian_day: f64,
    rotation: &dyn EarthRotation,
) -> (Vector3<f64>, Vector3<f64>) {
    let dcm_t = rotation.dcm_i2ecef(julian_day).transpose();
    let position_i_m = dcm_t * position_ecef_m;
    let transport = tilde_matrix(&rotation.angular_velocity_i()) * position_i_m;
    (position_i_m, dcm_t * velocity_ecef_m_s + transport)
}

/// Transforms an Earth fixed position into its geodetic representation.
pub fn ecef_to_geodetic(position_ecef_m: &Vector3<f64>) -> Result<GeodeticPosition, AstroError> {
    GeodeticPosition::try_from_ecef(position_ecef_m)
}

/// Returns the DCM from the inertial frame to the LVLH frame of the provided orbit.
///
/// X is along the position vector, Z along the orbital angular momentum and Y completes the triad
/// (roughly along the velocity for near circular orbits).
pub fn dcm_i2lvlh(
    position_i_m: &Vector3<f64>,
    velocity_i_m_s: &Vector3<f64>,
) -> Result<Matrix3<f64>, AstroError> {
    let h = position_i_m.cross(velocity_i_m_s);
    ensure!(
        position_i_m.norm() > f64::EPSILON,
        LocalFrameUndefinedSnafu {
            details: "zero position"
        }
    );
    ensure!(
        h.norm() > f64::EPSILON,
        LocalFrameUndefinedSnafu {
            details: "position and velocity are colinear"
        }
    );
    let ex = position_i_m.normalize();
    let ez = h.normalize();
    let ey = ez.cross(&ex).normalize();
    Ok(Matrix3::from_rows(&[
        ex.transpose(),
        ey.transpose(),
        ez.transpose(),
    ]))
}

/// Returns the quaternion from the inertial frame to the LVLH frame of the provided orbit.
pub fn quaternion_i2lvlh(
    position_i_m: &Vector3<f64>,
    velocity_i_m_s: &Vector3<f64>,
) -> Result<UnitQuaternion<f64>, AstroError> {
    Ok(quaternion_from_dcm(&dcm_i2lvlh(
        position_i_m,
        velocity_i_m_s,
    )?))
}

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
use crate::linalg::{Matrix3, Vector3};
use std::f64::consts::{PI, TAU};

/// Returns the tilde matrix from the provided Vector3, such that `tilde_matrix(a) * b == a.cross(&b)`.
pub fn tilde_matrix(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0,
        -v[(2, 0)],
        v[(1, 0)],
        v[(2, 0)],
        0.0,
        -v[(0, 0)],
        -v[(1, 0)],
        v[(0, 0)],
        0.0,
    )
}

/// Returns the provided angle bounded between 0.0 and 2π (radians).
pub fn between_0_tau(angle_rad: f64) -> f64 {
    let bounded = angle_rad % TAU;
    if bounded < 0.0 {
        bounded + TAU
    } else {
        bounded
    }
}

/// Returns the provided angle bounded between -π and +π (radians).
pub fn between_pm_pi(angle_rad: f64) -> f64 {
    let bounded = between_0_tau(angle_rad);
    if bounded > PI {
        bounded - TAU
    } else {
        bounded
    }
}

/// Rotation matrix around the X axis (frame rotation, as used in astrodynamics texts).
pub fn r1(angle_rad: f64) -> Matrix3<f64> {
    let (s, c) = angle_rad.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// Rotation matrix around the Y axis.
pub fn r2(angle_rad: f64) -> Matrix3<f64> {
    let (s, c) = angle_rad.sin_cos();
    Matrix3::new(c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c)
}

/// Rotation matrix around the Z axis.
pub fn r3(angle_rad: f64) -> Matrix3<f64> {
    let (s, c) = angle_rad.sin_cos();
    Matrix3::new(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0)
}
